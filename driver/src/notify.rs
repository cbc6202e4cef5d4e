use kernel::interface::notify::{RentalNotification, RentalNotifier};
use kernel::KernelError;

/// Writes each notification to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait::async_trait]
impl RentalNotifier for TracingNotifier {
    async fn notify(
        &self,
        notification: RentalNotification,
    ) -> error_stack::Result<(), KernelError> {
        let recipient = notification.recipient();
        tracing::info!(
            rental_id = %notification.rental_id(),
            status = %notification.status(),
            "Notify {} <{}>: {}",
            recipient.name().as_ref(),
            recipient.email().as_ref(),
            notification.kind()
        );
        Ok(())
    }
}
