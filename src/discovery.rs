use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::console::Console;
use crate::error::RunlogError;
use crate::kubernetes::{PodLister, find_pod, parse_pods};
use crate::types::{CorrelationKey, PodDescriptor, PodReadiness, PodStatus, RetryBudget};

pub const RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of polling the namespace for the run's pods.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub matches: Vec<PodDescriptor>,
    pub budget: RetryBudget,
}

impl Discovery {
    pub fn found(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn attempts_used(&self) -> u32 {
        self.budget.attempts_made()
    }
}

#[derive(Debug, Clone)]
pub struct ReadinessReport {
    pub pods: Vec<PodStatus>,
    pub budget: RetryBudget,
}

impl ReadinessReport {
    pub fn found(&self) -> bool {
        !self.pods.is_empty()
    }

    pub fn ready_pods(&self) -> impl Iterator<Item = &str> {
        self.pods
            .iter()
            .filter(|p| p.readiness == PodReadiness::Running)
            .map(|p| p.name.as_str())
    }

    pub fn all_ready(&self) -> bool {
        self.ready_pods().count() == self.pods.len()
    }
}

/// Polls the pod listing of one namespace for pods carrying a correlation key.
pub struct PodProbe<'a, L> {
    lister: &'a L,
    namespace: &'a str,
    key: &'a CorrelationKey,
    interval: Duration,
}

impl<'a, L: PodLister> PodProbe<'a, L> {
    pub fn new(lister: &'a L, namespace: &'a str, key: &'a CorrelationKey) -> Self {
        PodProbe {
            lister,
            namespace,
            key,
            interval: RETRY_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Lists pods until one matches the key or the budget runs out.
    ///
    /// An empty listing means the namespace itself is wrong and fails at
    /// once without consuming budget.
    pub async fn discover<W: Write>(
        &self,
        mut budget: RetryBudget,
        console: &mut Console<W>,
    ) -> Result<Discovery, RunlogError> {
        loop {
            let listing = self.lister.list_pods(self.namespace).await?;
            if listing.trim().is_empty() {
                return Err(RunlogError::NoPodsInNamespace {
                    namespace: self.namespace.to_string(),
                });
            }

            let matches = parse_pods(&listing, self.key);
            if !matches.is_empty() {
                info!(
                    "Found {} pods for {} after {} retries",
                    matches.len(),
                    self.key,
                    budget.attempts_made()
                );
                return Ok(Discovery { matches, budget });
            }

            let attempt = budget.record_attempt();
            if budget.is_exhausted() {
                console.line("Max retries reached.")?;
                return Ok(Discovery {
                    matches: Vec::new(),
                    budget,
                });
            }
            console.line(format!("Retrying {}/{}", attempt, budget.max_attempts()))?;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Discovers the run's pods, then waits for each to reach `Running`.
    ///
    /// The budget left over from discovery is shared by all pods. A pod that
    /// never comes up is reported `NotReady` and checking moves on.
    pub async fn await_ready<W: Write>(
        &self,
        budget: RetryBudget,
        console: &mut Console<W>,
    ) -> Result<ReadinessReport, RunlogError> {
        let discovery = self.discover(budget, console).await?;
        debug!("Discovery used {} attempts", discovery.attempts_used());
        let mut budget = discovery.budget;
        if !discovery.found() {
            return Ok(ReadinessReport {
                pods: Vec::new(),
                budget,
            });
        }
        let mut pods = Vec::with_capacity(discovery.matches.len());

        for pod in discovery.matches {
            console.line(format!(
                "Checking for pod readiness: {}",
                console.pod(&pod.name)
            ))?;
            let mut current = pod;
            let mut readiness = PodReadiness::Unknown;
            while readiness == PodReadiness::Unknown {
                if current.is_running() {
                    console.line(format!("{} is UP", console.pod(&current.name)))?;
                    readiness = PodReadiness::Running;
                } else if budget.is_exhausted() {
                    console.line("Max retries reached.")?;
                    readiness = PodReadiness::NotReady;
                } else {
                    let attempt = budget.record_attempt();
                    console.line(format!("Retrying {}/{}", attempt, budget.max_attempts()))?;
                    tokio::time::sleep(self.interval).await;
                    current = self.requery(&current.name).await?;
                }
            }
            pods.push(PodStatus {
                name: current.name,
                readiness,
            });
        }

        let report = ReadinessReport { pods, budget };
        if report.found() && !report.all_ready() {
            console.line("Tailing logs from pods which are UP")?;
        }
        Ok(report)
    }

    async fn requery(&self, name: &str) -> Result<PodDescriptor, RunlogError> {
        // A pod deleted between polls fails kubectl for that pod only; it
        // stays not running. A missing kubectl is still fatal.
        let listing = match self.lister.get_pod(self.namespace, name).await {
            Ok(listing) => listing,
            Err(RunlogError::Tool(text)) => {
                warn!("Failed to query pod {}: {}", name, text);
                String::new()
            }
            Err(e) => return Err(e),
        };
        Ok(find_pod(&listing, name).unwrap_or_else(|| {
            debug!("Pod {} missing from listing", name);
            PodDescriptor {
                name: name.to_string(),
                status_phase: "Unknown".to_string(),
            }
        }))
    }
}
