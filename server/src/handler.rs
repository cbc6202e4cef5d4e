use std::ops::Deref;
use std::sync::Arc;

use driver::database::{
    PostgresDatabase, PostgresLedgerRepository, PostgresRentalRepository, PostgresToolRepository,
    PostgresUserRepository,
};
use driver::notify::TracingNotifier;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::notify::DependOnRentalNotifier;
use kernel::interface::policy::{BalancePolicy, DependOnBalancePolicy};
use kernel::interface::query::{
    DependOnLedgerQuery, DependOnMembershipQuery, DependOnRentalQuery, DependOnToolQuery,
    DependOnUserQuery,
};
use kernel::interface::update::{
    DependOnLedgerModifier, DependOnRentalModifier, DependOnToolModifier,
};
use kernel::KernelError;

use crate::config::Config;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new(config: &Config) -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init(config).await?)))
    }

    pub fn handler(&self) -> &Arc<Handler> {
        &self.0
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler {
    pgpool: PostgresDatabase,
    rentals: PostgresRentalRepository,
    tools: PostgresToolRepository,
    users: PostgresUserRepository,
    ledger: PostgresLedgerRepository,
    notifier: TracingNotifier,
    balance_policy: BalancePolicy,
}

impl Handler {
    pub async fn init(config: &Config) -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;

        Ok(Self {
            pgpool,
            rentals: PostgresRentalRepository,
            tools: PostgresToolRepository,
            users: PostgresUserRepository,
            ledger: PostgresLedgerRepository,
            notifier: TracingNotifier,
            balance_policy: BalancePolicy::new(config.min_allowed_balance),
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.pgpool
    }
}

impl DependOnRentalQuery for Handler {
    type RentalQuery = PostgresRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &self.rentals
    }
}

impl DependOnRentalModifier for Handler {
    type RentalModifier = PostgresRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &self.rentals
    }
}

impl DependOnToolQuery for Handler {
    type ToolQuery = PostgresToolRepository;
    fn tool_query(&self) -> &Self::ToolQuery {
        &self.tools
    }
}

impl DependOnToolModifier for Handler {
    type ToolModifier = PostgresToolRepository;
    fn tool_modifier(&self) -> &Self::ToolModifier {
        &self.tools
    }
}

impl DependOnUserQuery for Handler {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &self.users
    }
}

impl DependOnMembershipQuery for Handler {
    type MembershipQuery = PostgresUserRepository;
    fn membership_query(&self) -> &Self::MembershipQuery {
        &self.users
    }
}

impl DependOnLedgerQuery for Handler {
    type LedgerQuery = PostgresLedgerRepository;
    fn ledger_query(&self) -> &Self::LedgerQuery {
        &self.ledger
    }
}

impl DependOnLedgerModifier for Handler {
    type LedgerModifier = PostgresLedgerRepository;
    fn ledger_modifier(&self) -> &Self::LedgerModifier {
        &self.ledger
    }
}

impl DependOnRentalNotifier for Handler {
    type RentalNotifier = TracingNotifier;
    fn rental_notifier(&self) -> &Self::RentalNotifier {
        &self.notifier
    }
}

impl DependOnBalancePolicy for Handler {
    fn balance_policy(&self) -> &BalancePolicy {
        &self.balance_policy
    }
}
