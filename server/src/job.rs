use std::sync::Arc;
use std::time::Duration;

use application::service::OverdueSweepService;
use kernel::prelude::entity::today;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::handler::Handler;

/// Runs the overdue sweep every `every`, starting immediately. A failed pass
/// is logged and retried on the next tick.
pub fn init_overdue_sweeper(handler: &Arc<Handler>, every: Duration) -> JoinHandle<()> {
    let handler = Arc::clone(handler);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match handler.sweep_overdue(today()).await {
                Ok(swept) => debug!("Overdue sweep finished; {swept} rental(s) changed"),
                Err(report) => error!("{report:?}"),
            }
        }
    })
}
