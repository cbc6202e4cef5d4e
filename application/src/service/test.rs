use std::sync::Arc;

use error_stack::Report;
use time::macros::date;
use time::Date;
use tokio::sync::Mutex;
use uuid::Uuid;

use driver::database::{
    MemoryDatabase, MemoryLedgerRepository, MemoryRentalRepository, MemoryToolRepository,
    MemoryUserRepository,
};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::notify::{DependOnRentalNotifier, RentalNotification, RentalNotifier};
use kernel::interface::policy::{BalancePolicy, DependOnBalancePolicy};
use kernel::interface::query::{
    DependOnLedgerQuery, DependOnMembershipQuery, DependOnRentalQuery, DependOnToolQuery,
    DependOnUserQuery, LedgerQuery, MembershipQuery, ToolQuery,
};
use kernel::interface::update::{
    DependOnLedgerModifier, DependOnRentalModifier, DependOnToolModifier,
};
use kernel::prelude::entity::{
    Cents, DurationUnit, OrganizationId, RentalId, Tool, ToolId, ToolName, ToolStatus, User,
    UserEmail, UserId, UserName,
};
use kernel::KernelError;

use crate::service::{
    GetLedgerService, GetRentalService, OverdueSweepService, RentalFulfillmentService,
    RentalRequestService, ReturnDateChangeService,
};
use crate::transfer::{
    ApproveRentalDto, CancelRentalDto, ChangeRentalDatesDto, CompleteRentalDto, CreateRentalDto,
    GetBalanceDto, GetRentalDto, ListLedgerTransactionsDto, ListToolRentalsDto,
    RejectDateChangeDto, RentalActionDto, RentalDto,
};

#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<RentalNotification>>>,
    broken: bool,
}

#[async_trait::async_trait]
impl RentalNotifier for RecordingNotifier {
    async fn notify(
        &self,
        notification: RentalNotification,
    ) -> error_stack::Result<(), KernelError> {
        if self.broken {
            return Err(Report::new(KernelError::Internal).attach_printable("mailer is down"));
        }
        self.sent.lock().await.push(notification);
        Ok(())
    }
}

struct TestModule {
    db: MemoryDatabase,
    notifier: RecordingNotifier,
    policy: BalancePolicy,
}

impl DependOnDatabaseConnection for TestModule {
    type DatabaseConnection = MemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.db
    }
}

impl DependOnRentalQuery for TestModule {
    type RentalQuery = MemoryRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &MemoryRentalRepository
    }
}

impl DependOnRentalModifier for TestModule {
    type RentalModifier = MemoryRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &MemoryRentalRepository
    }
}

impl DependOnToolQuery for TestModule {
    type ToolQuery = MemoryToolRepository;
    fn tool_query(&self) -> &Self::ToolQuery {
        &MemoryToolRepository
    }
}

impl DependOnToolModifier for TestModule {
    type ToolModifier = MemoryToolRepository;
    fn tool_modifier(&self) -> &Self::ToolModifier {
        &MemoryToolRepository
    }
}

impl DependOnUserQuery for TestModule {
    type UserQuery = MemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &MemoryUserRepository
    }
}

impl DependOnMembershipQuery for TestModule {
    type MembershipQuery = MemoryUserRepository;
    fn membership_query(&self) -> &Self::MembershipQuery {
        &MemoryUserRepository
    }
}

impl DependOnLedgerQuery for TestModule {
    type LedgerQuery = MemoryLedgerRepository;
    fn ledger_query(&self) -> &Self::LedgerQuery {
        &MemoryLedgerRepository
    }
}

impl DependOnLedgerModifier for TestModule {
    type LedgerModifier = MemoryLedgerRepository;
    fn ledger_modifier(&self) -> &Self::LedgerModifier {
        &MemoryLedgerRepository
    }
}

impl DependOnRentalNotifier for TestModule {
    type RentalNotifier = RecordingNotifier;
    fn rental_notifier(&self) -> &Self::RentalNotifier {
        &self.notifier
    }
}

impl DependOnBalancePolicy for TestModule {
    fn balance_policy(&self) -> &BalancePolicy {
        &self.policy
    }
}

/// One org with a tool owner and however many renters a test asks for.
struct Fixture {
    module: Arc<TestModule>,
    org_id: OrganizationId,
    owner: Uuid,
    tool_id: Uuid,
}

impl Fixture {
    async fn new(policy: BalancePolicy, notifier: RecordingNotifier) -> Self {
        let module = Arc::new(TestModule {
            db: MemoryDatabase::new(),
            notifier,
            policy,
        });
        let org_id = OrganizationId::new(Uuid::new_v4());
        let owner = Uuid::new_v4();
        let tool_id = Uuid::new_v4();
        let fixture = Self {
            module,
            org_id,
            owner,
            tool_id,
        };
        fixture.member(owner).await;
        fixture
            .module
            .db
            .insert_tool(Tool::new(
                ToolId::new(tool_id),
                fixture.org_id.clone(),
                UserId::new(owner),
                ToolName::new("Hammer drill"),
                DurationUnit::Day,
                Cents::new(1000),
                Cents::new(4500),
                Cents::new(13500),
                Cents::new(30000),
                ToolStatus::Available,
            ))
            .await;
        fixture
    }

    async fn open() -> Self {
        Self::new(BalancePolicy::default(), RecordingNotifier::default()).await
    }

    async fn member(&self, id: Uuid) {
        self.module
            .db
            .insert_user(User::new(
                UserId::new(id),
                UserName::new(format!("member-{id}")),
                UserEmail::new(format!("{id}@example.com")),
            ))
            .await;
        self.module
            .db
            .insert_membership(self.org_id.clone(), UserId::new(id))
            .await;
    }

    async fn renter(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.member(id).await;
        id
    }

    async fn request(
        &self,
        renter: Uuid,
        start: &str,
        end: &str,
    ) -> error_stack::Result<RentalDto, KernelError> {
        self.module
            .create_rental_request(CreateRentalDto {
                actor: renter,
                tool_id: self.tool_id,
                start_date: start.to_string(),
                end_date: end.to_string(),
            })
            .await
    }

    async fn approved(&self, renter: Uuid) -> error_stack::Result<RentalDto, KernelError> {
        let rental = self.request(renter, "2024-05-01", "2024-05-12").await?;
        self.module
            .approve_rental_request(ApproveRentalDto {
                actor: self.owner,
                rental_id: rental.id,
                pickup_note: Some("Side door".to_string()),
            })
            .await
    }

    async fn active(&self, renter: Uuid) -> error_stack::Result<RentalDto, KernelError> {
        let rental = self.approved(renter).await?;
        self.module
            .finalize_rental_request(RentalActionDto {
                actor: renter,
                rental_id: rental.id,
            })
            .await?;
        self.module
            .activate_rental(RentalActionDto {
                actor: self.owner,
                rental_id: rental.id,
            })
            .await
    }

    async fn balance(&self, user: Uuid) -> error_stack::Result<i64, KernelError> {
        let balance = self
            .module
            .get_balance(GetBalanceDto {
                actor: user,
                org_id: *self.org_id.as_ref(),
            })
            .await?;
        Ok(balance.balance_cents)
    }

    async fn tool_status(&self) -> error_stack::Result<ToolStatus, KernelError> {
        let mut connection = self.module.db.transact().await?;
        let tool = MemoryToolRepository
            .find_by_id(&mut connection, &ToolId::new(self.tool_id))
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound))?;
        Ok(*tool.status())
    }
}

fn date_change(
    actor: Uuid,
    rental: &RentalDto,
    new_start: Date,
    new_end: Date,
) -> ChangeRentalDatesDto {
    ChangeRentalDatesDto {
        actor,
        rental_id: rental.id,
        new_start_date: new_start.to_string(),
        new_end_date: new_end.to_string(),
        old_start_date: rental.start_date.to_string(),
        old_end_date: rental.end_date.to_string(),
    }
}

#[tokio::test]
async fn happy_path_debits_once_and_credits_once() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;
    assert_eq!(rental.status, "ACTIVE");
    assert_eq!(rental.total_cost_cents, 8500);
    assert_eq!(fixture.tool_status().await?, ToolStatus::Rented);

    let completed = fixture
        .module
        .complete_rental(CompleteRentalDto {
            actor: fixture.owner,
            rental_id: rental.id,
            return_condition: "GOOD".to_string(),
            surcharge_or_credit_cents: 0,
            notes: None,
        })
        .await?;
    assert_eq!(completed.status, "COMPLETED");
    assert_eq!(completed.completed_by, Some(fixture.owner));
    assert_eq!(fixture.tool_status().await?, ToolStatus::Available);

    let mut connection = fixture.module.db.transact().await?;
    let postings = MemoryLedgerRepository
        .find_by_rental(
            &mut connection,
            &RentalId::new(rental.id),
        )
        .await?;
    drop(connection);
    assert_eq!(postings.len(), 2);
    assert_eq!(postings[0].amount(), &Cents::new(-8500));
    assert_eq!(postings[0].user_id(), &UserId::new(renter));
    assert_eq!(postings[1].amount(), &Cents::new(8500));
    assert_eq!(postings[1].user_id(), &UserId::new(fixture.owner));

    assert_eq!(fixture.balance(renter).await?, -8500);
    assert_eq!(fixture.balance(fixture.owner).await?, 8500);
    Ok(())
}

#[tokio::test]
async fn surcharge_moves_both_sides() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;
    fixture
        .module
        .complete_rental(CompleteRentalDto {
            actor: fixture.owner,
            rental_id: rental.id,
            return_condition: "DAMAGED".to_string(),
            surcharge_or_credit_cents: 1500,
            notes: Some("Chipped bit".to_string()),
        })
        .await?;
    assert_eq!(fixture.balance(fixture.owner).await?, 10000);
    assert_eq!(fixture.balance(renter).await?, -10000);
    Ok(())
}

#[tokio::test]
async fn completing_twice_posts_nothing_more() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;
    let complete = || CompleteRentalDto {
        actor: fixture.owner,
        rental_id: rental.id,
        return_condition: "GOOD".to_string(),
        surcharge_or_credit_cents: 0,
        notes: None,
    };
    fixture.module.complete_rental(complete()).await?;
    let error = fixture.module.complete_rental(complete()).await.unwrap_err();
    assert_eq!(error.current_context(), &KernelError::InvalidState);
    assert_eq!(fixture.balance(fixture.owner).await?, 8500);
    Ok(())
}

#[tokio::test]
async fn out_of_range_surcharge_posts_nothing() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;
    for surcharge in [i64::MAX, i64::MIN] {
        let error = fixture
            .module
            .complete_rental(CompleteRentalDto {
                actor: fixture.owner,
                rental_id: rental.id,
                return_condition: "LOST".to_string(),
                surcharge_or_credit_cents: surcharge,
                notes: None,
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidInput);
    }

    let mut connection = fixture.module.db.transact().await?;
    let postings = MemoryLedgerRepository
        .find_by_rental(&mut connection, &RentalId::new(rental.id))
        .await?;
    drop(connection);
    assert_eq!(postings.len(), 1);
    assert_eq!(fixture.balance(fixture.owner).await?, 0);
    assert_eq!(fixture.balance(renter).await?, -8500);
    assert_eq!(fixture.tool_status().await?, ToolStatus::Rented);

    let unchanged = fixture
        .module
        .get_rental(GetRentalDto {
            actor: renter,
            rental_id: rental.id,
        })
        .await?;
    assert_eq!(unchanged.status, "ACTIVE");
    assert_eq!(unchanged.completed_by, None);
    Ok(())
}

#[tokio::test]
async fn finalize_reports_competing_requests() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let winner = fixture.renter().await;
    let pending = fixture.renter().await;
    let approved = fixture.renter().await;

    let rental = fixture.approved(winner).await?;
    let other_pending = fixture.request(pending, "2024-05-03", "2024-05-08").await?;
    let other_approved = fixture.approved(approved).await?;

    let result = fixture
        .module
        .finalize_rental_request(RentalActionDto {
            actor: winner,
            rental_id: rental.id,
        })
        .await?;
    assert_eq!(result.rental.status, "SCHEDULED");
    assert_eq!(result.rental.last_agreed_end_date, Some(result.rental.end_date));

    let mut siblings = result.siblings.iter().map(|s| s.id).collect::<Vec<_>>();
    siblings.sort();
    let mut expected = vec![other_pending.id, other_approved.id];
    expected.sort();
    assert_eq!(siblings, expected);

    for sibling in [&other_pending, &other_approved] {
        let reloaded = fixture
            .module
            .get_rental(GetRentalDto {
                actor: fixture.owner,
                rental_id: sibling.id,
            })
            .await?;
        assert_eq!(reloaded.status, sibling.status);
        assert_eq!(reloaded.version, sibling.version);
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_finalize_has_one_winner() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let first = fixture.renter().await;
    let second = fixture.renter().await;
    let a = fixture.approved(first).await?;
    let b = fixture.approved(second).await?;

    let module_a = Arc::clone(&fixture.module);
    let module_b = Arc::clone(&fixture.module);
    let (left, right) = tokio::join!(
        module_a.finalize_rental_request(RentalActionDto {
            actor: first,
            rental_id: a.id,
        }),
        module_b.finalize_rental_request(RentalActionDto {
            actor: second,
            rental_id: b.id,
        }),
    );
    let outcomes = [left.is_ok(), right.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    let loser = if left.is_ok() { right } else { left };
    assert_eq!(
        loser.unwrap_err().current_context(),
        &KernelError::InvalidState
    );

    assert_eq!(fixture.tool_status().await?, ToolStatus::Rented);
    let rentals = fixture
        .module
        .list_tool_rentals(ListToolRentalsDto {
            actor: fixture.owner,
            tool_id: fixture.tool_id,
            statuses: vec!["SCHEDULED".to_string()],
            page: 1,
            page_size: 10,
        })
        .await?;
    assert_eq!(rentals.len(), 1);
    Ok(())
}

#[tokio::test]
async fn cancelling_a_scheduled_rental_refunds() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.approved(renter).await?;
    fixture
        .module
        .finalize_rental_request(RentalActionDto {
            actor: renter,
            rental_id: rental.id,
        })
        .await?;
    assert_eq!(fixture.balance(renter).await?, -8500);

    let cancelled = fixture
        .module
        .cancel_rental(CancelRentalDto {
            actor: renter,
            rental_id: rental.id,
            reason: Some("Plans changed".to_string()),
        })
        .await?;
    assert_eq!(cancelled.status, "CANCELLED");
    assert_eq!(fixture.balance(renter).await?, 0);
    assert_eq!(fixture.tool_status().await?, ToolStatus::Available);
    Ok(())
}

#[tokio::test]
async fn counter_with_requested_date_is_rejected() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;
    let proposed = fixture
        .module
        .change_rental_dates(date_change(
            renter,
            &rental,
            date!(2024 - 05 - 01),
            date!(2024 - 05 - 15),
        ))
        .await?;
    assert_eq!(proposed.status, "RETURN_DATE_CHANGED");

    let error = fixture
        .module
        .reject_return_date_change(RejectDateChangeDto {
            actor: fixture.owner,
            rental_id: rental.id,
            reason: None,
            counter_end_date: "2024-05-15".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(error.current_context(), &KernelError::InvalidInput);

    let unchanged = fixture
        .module
        .get_rental(GetRentalDto {
            actor: renter,
            rental_id: rental.id,
        })
        .await?;
    assert_eq!(unchanged.status, proposed.status);
    assert_eq!(unchanged.version, proposed.version);
    assert!(unchanged.counter_proposal.is_none());
    Ok(())
}

#[tokio::test]
async fn acknowledged_counter_settles_the_difference() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;
    fixture
        .module
        .change_rental_dates(date_change(
            renter,
            &rental,
            date!(2024 - 05 - 01),
            date!(2024 - 05 - 20),
        ))
        .await?;
    let countered = fixture
        .module
        .reject_return_date_change(RejectDateChangeDto {
            actor: fixture.owner,
            rental_id: rental.id,
            reason: Some("Needed back sooner".to_string()),
            counter_end_date: "2024-05-15".to_string(),
        })
        .await?;
    assert_eq!(countered.status, "RETURN_DATE_CHANGE_REJECTED");
    // 14 days: 2 weeks.
    assert_eq!(
        countered.counter_proposal.as_ref().map(|c| c.total_cost_cents),
        Some(9000)
    );

    let settled = fixture
        .module
        .acknowledge_return_date_rejection(RentalActionDto {
            actor: renter,
            rental_id: rental.id,
        })
        .await?;
    assert_eq!(settled.end_date, date!(2024 - 05 - 15));
    assert_eq!(settled.total_cost_cents, 9000);
    assert!(settled.date_change.is_none());
    assert_eq!(fixture.balance(renter).await?, -9000);
    Ok(())
}

#[tokio::test]
async fn withdrawn_proposal_restores_the_rental() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;
    fixture
        .module
        .change_rental_dates(date_change(
            renter,
            &rental,
            date!(2024 - 05 - 01),
            date!(2024 - 05 - 20),
        ))
        .await?;
    let restored = fixture
        .module
        .cancel_return_date_change(RentalActionDto {
            actor: renter,
            rental_id: rental.id,
        })
        .await?;
    assert_eq!(restored.status, rental.status);
    assert_eq!(restored.start_date, rental.start_date);
    assert_eq!(restored.end_date, rental.end_date);
    assert_eq!(restored.total_cost_cents, rental.total_cost_cents);
    assert!(restored.date_change.is_none());
    assert_eq!(fixture.balance(renter).await?, -8500);
    Ok(())
}

#[tokio::test]
async fn approved_extension_charges_the_renter() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.approved(renter).await?;
    fixture
        .module
        .finalize_rental_request(RentalActionDto {
            actor: renter,
            rental_id: rental.id,
        })
        .await?;
    fixture
        .module
        .change_rental_dates(date_change(
            renter,
            &rental,
            date!(2024 - 05 - 01),
            date!(2024 - 05 - 15),
        ))
        .await?;
    let approved = fixture
        .module
        .approve_return_date_change(RentalActionDto {
            actor: fixture.owner,
            rental_id: rental.id,
        })
        .await?;
    assert_eq!(approved.status, "SCHEDULED");
    assert_eq!(approved.total_cost_cents, 9000);
    assert_eq!(fixture.balance(renter).await?, -9000);
    Ok(())
}

#[tokio::test]
async fn balance_floor_blocks_requests() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::new(
        BalancePolicy::new(Some(Cents::new(-5000))),
        RecordingNotifier::default(),
    )
    .await;
    let renter = fixture.renter().await;
    let error = fixture
        .request(renter, "2024-05-01", "2024-05-12")
        .await
        .unwrap_err();
    assert_eq!(error.current_context(), &KernelError::InsufficientBalance);

    let cheap = fixture.request(renter, "2024-05-01", "2024-05-03").await?;
    assert_eq!(cheap.total_cost_cents, 2000);
    Ok(())
}

#[tokio::test]
async fn outsiders_are_turned_away() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let outsider = Uuid::new_v4();

    let error = fixture
        .request(outsider, "2024-05-01", "2024-05-03")
        .await
        .unwrap_err();
    assert_eq!(error.current_context(), &KernelError::Unauthorized);

    let rental = fixture.request(renter, "2024-05-01", "2024-05-03").await?;
    let error = fixture
        .module
        .approve_rental_request(ApproveRentalDto {
            actor: renter,
            rental_id: rental.id,
            pickup_note: None,
        })
        .await
        .unwrap_err();
    assert_eq!(error.current_context(), &KernelError::Unauthorized);

    let error = fixture
        .module
        .get_rental(GetRentalDto {
            actor: outsider,
            rental_id: rental.id,
        })
        .await
        .unwrap_err();
    assert_eq!(error.current_context(), &KernelError::Unauthorized);

    let error = fixture
        .module
        .list_transactions(ListLedgerTransactionsDto {
            actor: outsider,
            org_id: *fixture.org_id.as_ref(),
            page: 1,
            page_size: 10,
        })
        .await
        .unwrap_err();
    assert_eq!(error.current_context(), &KernelError::Unauthorized);
    Ok(())
}

#[tokio::test]
async fn notifications_follow_transitions() -> error_stack::Result<(), KernelError> {
    let notifier = RecordingNotifier::default();
    let fixture = Fixture::new(BalancePolicy::default(), notifier.clone()).await;
    let renter = fixture.renter().await;
    fixture.approved(renter).await?;

    let sent = notifier.sent.lock().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].recipient().id(), &UserId::new(fixture.owner));
    assert_eq!(sent[1].recipient().id(), &UserId::new(renter));
    Ok(())
}

#[tokio::test]
async fn broken_notifier_does_not_undo_transition() -> error_stack::Result<(), KernelError> {
    let notifier = RecordingNotifier {
        broken: true,
        ..RecordingNotifier::default()
    };
    let fixture = Fixture::new(BalancePolicy::default(), notifier).await;
    let renter = fixture.renter().await;
    let rental = fixture.approved(renter).await?;
    assert_eq!(rental.status, "APPROVED");
    Ok(())
}

#[tokio::test]
async fn ledger_sum_matches_cached_balance() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;
    fixture
        .module
        .complete_rental(CompleteRentalDto {
            actor: fixture.owner,
            rental_id: rental.id,
            return_condition: "GOOD".to_string(),
            surcharge_or_credit_cents: -500,
            notes: None,
        })
        .await?;

    for user in [renter, fixture.owner] {
        let history = fixture
            .module
            .list_transactions(ListLedgerTransactionsDto {
                actor: user,
                org_id: *fixture.org_id.as_ref(),
                page: 1,
                page_size: 100,
            })
            .await?;
        let sum: i64 = history.iter().map(|t| t.amount_cents).sum();
        assert_eq!(fixture.balance(user).await?, sum);

        let mut connection = fixture.module.db.transact().await?;
        let membership = MemoryUserRepository
            .find(&mut connection, &fixture.org_id, &UserId::new(user))
            .await?;
        let ledger = MemoryLedgerRepository
            .balance(&mut connection, &fixture.org_id, &UserId::new(user))
            .await?;
        assert_eq!(membership.map(|m| *m.balance()), Some(ledger));
    }
    Ok(())
}

#[tokio::test]
async fn sweep_marks_overdue_once() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;

    assert_eq!(fixture.module.sweep_overdue(date!(2024 - 05 - 12)).await?, 0);
    assert_eq!(fixture.module.sweep_overdue(date!(2024 - 05 - 13)).await?, 1);
    assert_eq!(fixture.module.sweep_overdue(date!(2024 - 05 - 13)).await?, 0);

    let overdue = fixture
        .module
        .get_rental(GetRentalDto {
            actor: renter,
            rental_id: rental.id,
        })
        .await?;
    assert_eq!(overdue.status, "OVERDUE");
    Ok(())
}

#[tokio::test]
async fn overdue_rental_keeps_its_dates() -> error_stack::Result<(), KernelError> {
    let fixture = Fixture::open().await;
    let renter = fixture.renter().await;
    let rental = fixture.active(renter).await?;
    assert_eq!(fixture.module.sweep_overdue(date!(2024 - 05 - 13)).await?, 1);

    let error = fixture
        .module
        .change_rental_dates(date_change(
            renter,
            &rental,
            date!(2024 - 05 - 01),
            date!(2024 - 05 - 20),
        ))
        .await
        .unwrap_err();
    assert_eq!(error.current_context(), &KernelError::InvalidState);

    let overdue = fixture
        .module
        .get_rental(GetRentalDto {
            actor: renter,
            rental_id: rental.id,
        })
        .await?;
    assert_eq!(overdue.status, "OVERDUE");
    assert_eq!(overdue.end_date, rental.end_date);
    assert_eq!(overdue.total_cost_cents, rental.total_cost_cents);
    assert!(overdue.date_change.is_none());
    Ok(())
}
