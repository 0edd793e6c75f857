//! Production mode: hand the skill handler to a serverless host runtime.
//!
//! In production the skill does not own a connection.  The function host
//! delivers invocations and collects the results; the dispatcher only plugs the
//! handler into whatever runtime it is given through [`HostRuntime`].
//!
//! [`StreamHostRuntime`] is the runtime shipped with this crate.  It speaks a
//! line protocol over any async byte stream:
//!
//! ```text
//! in : {"request":{"type":"LaunchRequest"}}          one JSON invocation per line
//! out: {"version":"1.0","response":{...}}             the handler's response
//! out: {"errorMessage":"...","errorType":"HandlerError"}   on failure
//! ```
//!
//! [`StdioHostRuntime`] runs it over stdin/stdout, which is how a custom
//! function runtime pipes invocations into a process.

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{
    stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin,
    Stdout,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::{HandlerContext, SkillHandler};

/// A host that delivers invocations to a skill handler.
#[async_trait]
pub trait HostRuntime: Send {
    /// Serves invocations with `handler` until the host is done or `cancel`
    /// fires.
    async fn serve<H>(&mut self, handler: &H, cancel: CancellationToken) -> anyhow::Result<()>
    where
        H: SkillHandler + ?Sized;
}

/// Line-delimited JSON host runtime over an arbitrary reader and writer.
pub struct StreamHostRuntime<R, W> {
    reader: R,
    writer: W,
}

/// [`StreamHostRuntime`] over the process's standard streams.
pub type StdioHostRuntime = StreamHostRuntime<BufReader<Stdin>, Stdout>;

impl StdioHostRuntime {
    /// Reads invocations from stdin and writes results to stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(stdin()), stdout())
    }
}

impl<R, W> StreamHostRuntime<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consumes the runtime and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<R, W> HostRuntime for StreamHostRuntime<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn serve<H>(&mut self, handler: &H, cancel: CancellationToken) -> anyhow::Result<()>
    where
        H: SkillHandler + ?Sized,
    {
        info!("serving invocations from host runtime");
        let mut line = String::new();
        let mut served: u64 = 0;

        loop {
            line.clear();
            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                read = self.reader.read_line(&mut line) => {
                    read.context("failed to read invocation from host")?
                }
            };
            if read == 0 {
                debug!("host closed the invocation stream");
                break;
            }

            let invocation = line.trim();
            if invocation.is_empty() {
                continue;
            }

            let Some(output) = invoke(handler, &cancel, invocation).await else {
                break;
            };
            self.writer
                .write_all(output.as_bytes())
                .await
                .context("failed to write result to host")?;
            self.writer.write_all(b"\n").await?;
            self.writer.flush().await?;
            served += 1;
        }

        info!(invocations = served, "host runtime finished");
        Ok(())
    }
}

/// Runs one invocation and returns the line to write back.  `None` means
/// the session was cancelled while the handler was running.
async fn invoke<H>(
    handler: &H,
    cancel: &CancellationToken,
    invocation: &str,
) -> Option<String>
where
    H: SkillHandler + ?Sized,
{
    let request_id = Uuid::new_v4().to_string();

    let request: H::Request = match serde_json::from_str(invocation) {
        Ok(request) => request,
        Err(e) => {
            warn!(request_id = %request_id, "invalid invocation: {e}");
            return Some(error_line(&e.to_string(), "InvalidRequest"));
        }
    };

    let ctx = HandlerContext::new(cancel.clone(), request_id.clone());
    let handled = tokio::select! {
        biased;
        _ = cancel.cancelled() => return None,
        handled = handler.handle(&ctx, request) => handled,
    };

    let response = match handled {
        Ok(response) => response,
        Err(e) => {
            warn!(request_id = %request_id, "failed to handle skill request: {e:#}");
            return Some(error_line(&format!("{e:#}"), "HandlerError"));
        }
    };

    match serde_json::to_string(&response) {
        Ok(json) => {
            debug!(request_id = %request_id, bytes = json.len(), "invocation answered");
            Some(json)
        }
        Err(e) => {
            warn!(request_id = %request_id, "failed to marshal skill response: {e}");
            Some(error_line(&e.to_string(), "EncodeError"))
        }
    }
}

fn error_line(message: &str, error_type: &str) -> String {
    serde_json::json!({ "errorMessage": message, "errorType": error_type }).to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{handler_fn, HandlerError};
    use anyhow::anyhow;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;
    use tokio_test::io::Builder;

    #[derive(Debug, Serialize, Deserialize)]
    struct Counter {
        x: i64,
    }

    fn output_lines(bytes: Vec<u8>) -> Vec<Value> {
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_each_line_is_answered_in_order() {
        // Arrange: the second invocation arrives split across two reads
        let input = Builder::new()
            .read(b"{\"x\":1}\n{\"x\":")
            .read(b"41}\n")
            .build();
        let mut runtime = StreamHostRuntime::new(BufReader::new(input), Vec::new());
        let handler = handler_fn(|_ctx: &HandlerContext, c: Counter| Ok(Counter { x: c.x + 1 }));

        // Act
        runtime.serve(&handler, CancellationToken::new()).await.unwrap();

        // Assert
        let lines = output_lines(runtime.into_writer());
        assert_eq!(lines, vec![serde_json::json!({"x":2}), serde_json::json!({"x":42})]);
    }

    #[tokio::test]
    async fn test_handler_error_is_reported_to_host() {
        let input = Builder::new().read(b"{\"x\":1}\n").build();
        let mut runtime = StreamHostRuntime::new(BufReader::new(input), Vec::new());
        let handler = handler_fn(|_ctx: &HandlerContext, _c: Counter| -> Result<Counter, HandlerError> {
            Err(anyhow!("skill exploded"))
        });

        runtime.serve(&handler, CancellationToken::new()).await.unwrap();

        let lines = output_lines(runtime.into_writer());
        assert_eq!(lines[0]["errorType"], "HandlerError");
        assert_eq!(lines[0]["errorMessage"], "skill exploded");
    }

    #[tokio::test]
    async fn test_invalid_invocation_is_reported_and_serving_continues() {
        // Arrange
        let input = Builder::new().read(b"not json\n\n{\"x\":7}\n").build();
        let mut runtime = StreamHostRuntime::new(BufReader::new(input), Vec::new());
        let handler = handler_fn(|_ctx: &HandlerContext, c: Counter| Ok(c));

        // Act
        runtime.serve(&handler, CancellationToken::new()).await.unwrap();

        // Assert: blank lines are skipped, bad lines get an error result
        let lines = output_lines(runtime.into_writer());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["errorType"], "InvalidRequest");
        assert_eq!(lines[1], serde_json::json!({"x":7}));
    }

    #[tokio::test]
    async fn test_cancelled_runtime_reads_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut runtime = StreamHostRuntime::new(BufReader::new(Builder::new().build()), Vec::new());
        let handler = handler_fn(|_ctx: &HandlerContext, c: Counter| Ok(c));

        runtime.serve(&handler, cancel).await.unwrap();

        assert!(runtime.into_writer().is_empty());
    }

    #[tokio::test]
    async fn test_read_error_is_propagated() {
        let input = Builder::new()
            .read_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            .build();
        let mut runtime = StreamHostRuntime::new(BufReader::new(input), Vec::new());
        let handler = handler_fn(|_ctx: &HandlerContext, c: Counter| Ok(c));

        let result = runtime.serve(&handler, CancellationToken::new()).await;

        assert!(result.is_err());
    }
}
