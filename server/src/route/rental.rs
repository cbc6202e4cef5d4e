use application::service::{
    GetRentalService, RentalFulfillmentService, RentalRequestService, ReturnDateChangeService,
};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::Query;
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    ActorId, ApproveRentalRequest, CancelRentalRequest, ChangeDatesRequest,
    CompleteRentalRequest, CreateRentalRequest, GetRentalRequest, ListRentalsQuery,
    RejectDatesRequest, RejectRentalRequest, RentalAction, RentalTransformer,
};
use crate::response::{CreatedRentalPresenter, RentalPresenter};

pub trait RentalRouter {
    fn route_rental(self) -> Self;
}

impl RentalRouter for Router<AppModule> {
    fn route_rental(self) -> Self {
        self.route(
            "/rentals",
            get(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Query(query): Query<ListRentalsQuery>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake((actor, query))
                        .handle(|dto| async move { module.list_my_rentals(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Json(req): Json<CreateRentalRequest>| async move {
                    Controller::new(RentalTransformer, CreatedRentalPresenter)
                        .intake((actor, req))
                        .handle(|dto| async move { module.create_rental_request(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/lendings",
            get(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Query(query): Query<ListRentalsQuery>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake((actor, query))
                        .handle(|dto| async move { module.list_my_lendings(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/tools/:id/rentals",
            get(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>,
                 Query(query): Query<ListRentalsQuery>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake((actor, id, query))
                        .handle(|dto| async move { module.list_tool_rentals(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id",
            get(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake(GetRentalRequest::new(actor, id))
                        .handle(|dto| async move { module.get_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/approve",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<ApproveRentalRequest>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake((RentalAction::new(actor, id), req))
                        .handle(|dto| async move { module.approve_rental_request(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/reject",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<RejectRentalRequest>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake((RentalAction::new(actor, id), req))
                        .handle(|dto| async move { module.reject_rental_request(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/finalize",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake(RentalAction::new(actor, id))
                        .handle(|dto| async move { module.finalize_rental_request(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/activate",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake(RentalAction::new(actor, id))
                        .handle(|dto| async move { module.activate_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/complete",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<CompleteRentalRequest>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake((RentalAction::new(actor, id), req))
                        .handle(|dto| async move { module.complete_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/cancel",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<CancelRentalRequest>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake((RentalAction::new(actor, id), req))
                        .handle(|dto| async move { module.cancel_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/dates",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<ChangeDatesRequest>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake((RentalAction::new(actor, id), req))
                        .handle(|dto| async move { module.change_rental_dates(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/dates/approve",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake(RentalAction::new(actor, id))
                        .handle(|dto| async move { module.approve_return_date_change(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/dates/reject",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<RejectDatesRequest>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake((RentalAction::new(actor, id), req))
                        .handle(|dto| async move { module.reject_return_date_change(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/dates/acknowledge",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake(RentalAction::new(actor, id))
                        .handle(|dto| async move {
                            module.acknowledge_return_date_rejection(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id/dates/cancel",
            post(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake(RentalAction::new(actor, id))
                        .handle(|dto| async move { module.cancel_return_date_change(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
