use std::io::Write;
use std::time::Duration;
use tracing::info;

use crate::console::Console;
use crate::discovery::{PodProbe, RETRY_INTERVAL};
use crate::error::RunlogError;
use crate::kubernetes::{ClusterCommand, PodLister};
use crate::record::RunRecordStore;
use crate::relay::{LineFilter, RelayMode, RelayOutcome, relay};
use crate::types::{CorrelationKey, RetryBudget};

/// A subcommand handler.
#[allow(async_fn_in_trait)]
pub trait Action {
    async fn action<W: Write>(&self, console: &mut Console<W>) -> Result<(), RunlogError>;
}

/// Resolves once the operator hits Ctrl-C.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn log_outcome(outcome: RelayOutcome) {
    match outcome {
        RelayOutcome::Completed(status) => info!("Stream finished with {}", status),
        RelayOutcome::Interrupted => info!("Stream interrupted"),
    }
}

/// `logs`: wait for the run's pods, then tail them through kubetail.
pub struct LogsCommand<L> {
    pub store: RunRecordStore,
    pub lister: L,
    pub kubetail: String,
    pub since: String,
    pub retries: u32,
    pub interval: Duration,
}

impl<L: PodLister> LogsCommand<L> {
    pub fn new(
        store: RunRecordStore,
        lister: L,
        kubetail: String,
        since: String,
        retries: u32,
    ) -> Self {
        LogsCommand {
            store,
            lister,
            kubetail,
            since,
            retries,
            interval: RETRY_INTERVAL,
        }
    }
}

impl<L: PodLister> Action for LogsCommand<L> {
    async fn action<W: Write>(&self, console: &mut Console<W>) -> Result<(), RunlogError> {
        let record = self.store.load()?;
        let key = CorrelationKey::from_record(&record);

        let report = PodProbe::new(&self.lister, &record.namespace, &key)
            .with_interval(self.interval)
            .await_ready(RetryBudget::new(self.retries), console)
            .await?;
        if !report.found() {
            return Err(RunlogError::NoPodsForJob);
        }
        info!(
            "{} pods ready after {}/{} attempts",
            report.ready_pods().count(),
            report.budget.attempts_made(),
            report.budget.max_attempts()
        );

        let command =
            ClusterCommand::kubetail(&self.kubetail, &key, &self.since, &record.namespace);
        let outcome = relay(
            &command,
            LineFilter::new(RelayMode::Logs, key),
            console,
            interrupted(),
        )
        .await?;
        log_outcome(outcome);
        Ok(())
    }
}

/// `events`: scheduler events of the namespace, narrowed to the run.
pub struct EventsCommand {
    pub store: RunRecordStore,
    pub kubectl: String,
    pub watch: bool,
}

impl Action for EventsCommand {
    async fn action<W: Write>(&self, console: &mut Console<W>) -> Result<(), RunlogError> {
        let record = self.store.load()?;
        let key = CorrelationKey::from_record(&record);

        let command = ClusterCommand::events(&self.kubectl, &record.namespace, self.watch);
        let outcome = relay(
            &command,
            LineFilter::new(RelayMode::Events, key),
            console,
            interrupted(),
        )
        .await?;
        log_outcome(outcome);
        Ok(())
    }
}
