use application::service::GetLedgerService;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::Query;
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{ActorId, LedgerTransformer, ListTransactionsQuery};
use crate::response::LedgerPresenter;

pub trait LedgerRouter {
    fn route_ledger(self) -> Self;
}

impl LedgerRouter for Router<AppModule> {
    fn route_ledger(self) -> Self {
        self.route(
            "/organizations/:id/ledger/balance",
            get(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(LedgerTransformer, LedgerPresenter)
                        .intake((actor, id))
                        .handle(|dto| async move { module.get_balance(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/organizations/:id/ledger/transactions",
            get(
                |State(module): State<AppModule>,
                 TypedHeader(actor): TypedHeader<ActorId>,
                 Path(id): Path<Uuid>,
                 Query(query): Query<ListTransactionsQuery>| async move {
                    Controller::new(LedgerTransformer, LedgerPresenter)
                        .intake((actor, id, query))
                        .handle(|dto| async move { module.list_transactions(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
