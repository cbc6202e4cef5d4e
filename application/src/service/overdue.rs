use time::Date;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnRentalQuery, RentalQuery};
use kernel::interface::update::{DependOnRentalModifier, RentalModifier};
use kernel::KernelError;

use crate::service::rental::lock_rental;

#[async_trait::async_trait]
pub trait OverdueSweepService:
    'static + Sync + Send + DependOnRentalQuery + DependOnRentalModifier
{
    /// Moves every ACTIVE rental due before `today` to OVERDUE. Returns how
    /// many rentals changed; running it again on the same day changes none.
    async fn sweep_overdue(&self, today: Date) -> error_stack::Result<usize, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let candidates = self
            .rental_query()
            .find_overdue(&mut connection, today)
            .await?;

        let mut swept = 0;
        for candidate in candidates {
            let mut rental = lock_rental(self, &mut connection, candidate.id()).await?;
            if rental.mark_overdue(today) {
                self.rental_modifier()
                    .update(&mut connection, &rental)
                    .await?;
                tracing::debug!("Rental {} is overdue", rental.id());
                swept += 1;
            }
        }
        connection.commit().await?;
        tracing::info!("Marked {swept} rental(s) overdue as of {today}");
        Ok(swept)
    }
}

impl<T> OverdueSweepService for T where T: DependOnRentalQuery + DependOnRentalModifier {}
