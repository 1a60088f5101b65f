use std::process::Stdio;
use tracing::debug;

use crate::error::RunlogError;
use crate::types::{CorrelationKey, PodDescriptor};

/// An external cluster command as a program plus discrete arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ClusterCommand {
    fn new(program: &str, args: &[&str]) -> Self {
        ClusterCommand {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn list_pods(kubectl: &str, namespace: &str) -> Self {
        Self::new(kubectl, &["get", "pods", "--namespace", namespace])
    }

    pub fn get_pod(kubectl: &str, namespace: &str, pod: &str) -> Self {
        Self::new(kubectl, &["get", "pods", "--namespace", namespace, pod])
    }

    pub fn events(kubectl: &str, namespace: &str, watch: bool) -> Self {
        let mut cmd = Self::new(kubectl, &["get", "events", "--namespace", namespace]);
        if watch {
            cmd.args.push("--watch".to_string());
        }
        cmd
    }

    pub fn kubetail(kubetail: &str, key: &CorrelationKey, since: &str, namespace: &str) -> Self {
        Self::new(
            kubetail,
            &[key.as_str(), "--since", since, "--namespace", namespace],
        )
    }

    /// Value of the `--namespace` argument, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == "--namespace")
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Source of pod listings. Each call returns the raw table text.
#[allow(async_fn_in_trait)]
pub trait PodLister {
    async fn list_pods(&self, namespace: &str) -> Result<String, RunlogError>;

    async fn get_pod(&self, namespace: &str, pod: &str) -> Result<String, RunlogError>;
}

/// `PodLister` backed by the kubectl binary.
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: String,
}

impl Kubectl {
    pub fn new(program: impl Into<String>) -> Self {
        Kubectl {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn output(&self, command: ClusterCommand) -> Result<String, RunlogError> {
        debug!("Running {} {}", command.program, command.args.join(" "));
        let output = command
            .to_command()
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| RunlogError::launch(&command.program, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() && !stderr.trim().is_empty() {
            return Err(RunlogError::from_tool_output(&stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl PodLister for Kubectl {
    async fn list_pods(&self, namespace: &str) -> Result<String, RunlogError> {
        self.output(ClusterCommand::list_pods(&self.program, namespace))
            .await
    }

    async fn get_pod(&self, namespace: &str, pod: &str) -> Result<String, RunlogError> {
        self.output(ClusterCommand::get_pod(&self.program, namespace, pod))
            .await
    }
}

/// Rows of `listing` whose text contains the key, in listing order.
pub fn parse_pods(listing: &str, key: &CorrelationKey) -> Vec<PodDescriptor> {
    listing
        .lines()
        .filter(|line| key.matches(line))
        .filter_map(PodDescriptor::from_row)
        .collect()
}

/// The row describing exactly `name`, skipping headers and other pods.
pub fn find_pod(listing: &str, name: &str) -> Option<PodDescriptor> {
    listing
        .lines()
        .filter_map(PodDescriptor::from_row)
        .find(|pod| pod.name == name)
}
