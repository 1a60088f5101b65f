use std::future::Future;
use std::io::Write;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, warn};

use crate::console::Console;
use crate::error::RunlogError;
use crate::kubernetes::ClusterCommand;
use crate::types::CorrelationKey;
use crate::utils::{NO_MATCHING_PODS_MARKER, is_column_header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    Logs,
    Events,
}

/// Decides which lines of the relayed stream reach the operator.
#[derive(Debug)]
pub struct LineFilter {
    mode: RelayMode,
    key: CorrelationKey,
    first_line: bool,
    header: Option<String>,
}

impl LineFilter {
    pub fn new(mode: RelayMode, key: CorrelationKey) -> Self {
        LineFilter {
            mode,
            key,
            first_line: true,
            header: None,
        }
    }

    /// Returns the lines to write for one line read, in output order.
    pub fn admit(&mut self, line: String) -> Vec<String> {
        let first_line = std::mem::replace(&mut self.first_line, false);
        match self.mode {
            RelayMode::Logs => {
                if line.trim().is_empty() || line.contains(NO_MATCHING_PODS_MARKER) {
                    Vec::new()
                } else {
                    vec![line]
                }
            }
            RelayMode::Events => {
                if self.key.matches(&line) {
                    // The held header goes out once, right before the first match.
                    self.header.take().into_iter().chain([line]).collect()
                } else {
                    if first_line && is_column_header(&line) {
                        self.header = Some(line);
                    }
                    Vec::new()
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum RelayOutcome {
    Completed(ExitStatus),
    Interrupted,
}

/// Streams `command`'s stdout through `filter` until the process exits or
/// `shutdown` resolves. Stderr output fails the relay once stdout is done,
/// even if lines were already forwarded.
pub async fn relay<W, F>(
    command: &ClusterCommand,
    mut filter: LineFilter,
    console: &mut Console<W>,
    shutdown: F,
) -> Result<RelayOutcome, RunlogError>
where
    W: Write,
    F: Future<Output = ()>,
{
    debug!(
        "Relaying {} {} (namespace {})",
        command.program,
        command.args.join(" "),
        command.namespace().unwrap_or("-")
    );
    let mut child = command
        .to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| RunlogError::launch(&command.program, e))?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(RunlogError::Tool(format!(
            "{} started without output pipes",
            command.program
        )));
    };

    // Drained concurrently so a chatty stderr never stalls stdout.
    let stderr_task = tokio::spawn(async move {
        let mut raw = Vec::new();
        BufReader::new(stderr)
            .read_to_end(&mut raw)
            .await
            .map(|_| String::from_utf8_lossy(&raw).into_owned())
    });

    let mut stdout = BufReader::new(stdout);
    let mut buf = Vec::new();
    tokio::pin!(shutdown);

    loop {
        buf.clear();
        let read = tokio::select! {
            read = stdout.read_until(b'\n', &mut buf) => read,
            _ = &mut shutdown => {
                debug!("Interrupted, stopping {}", command.program);
                if let Err(e) = child.kill().await {
                    warn!("Failed to stop {}: {}", command.program, e);
                }
                stderr_task.abort();
                return Ok(RelayOutcome::Interrupted);
            }
        };
        if read.map_err(|e| RunlogError::Tool(e.to_string()))? == 0 {
            break;
        }
        for out in filter.admit(decode_line(&buf)) {
            console.line(out)?;
        }
    }

    let status = child
        .wait()
        .await
        .map_err(|e| RunlogError::Tool(e.to_string()))?;
    let stderr_text = stderr_task
        .await
        .map_err(|e| RunlogError::Tool(e.to_string()))?
        .map_err(|e| RunlogError::Tool(e.to_string()))?;

    if !stderr_text.trim().is_empty() {
        return Err(RunlogError::from_tool_output(&stderr_text));
    }
    if !status.success() {
        warn!("{} exited with {}", command.program, status);
    }
    Ok(RelayOutcome::Completed(status))
}

/// One stdout line without its terminator. Tools may print bytes that are
/// not UTF-8; those are replaced rather than ending the stream.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
