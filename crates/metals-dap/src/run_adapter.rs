//! A debug adapter that "runs and exits".
//!
//! When a program is started without debugging the editor still wants a debug
//! adapter to talk to. This one acknowledges the handshake, reports an
//! immediate exit on `launch`, and otherwise stays silent.

use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::dap::codec::{DapReader, DapWriter};
use crate::dap::messages::{Event, Outgoing, Request, Response};
use crate::error::DapError;

#[derive(Debug)]
pub struct RunDebugAdapter {
    next_seq: u64,
}

impl Default for RunDebugAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunDebugAdapter {
    pub fn new() -> Self {
        Self { next_seq: 1 }
    }

    fn alloc_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        seq
    }

    /// Handle one incoming protocol message. Anything that is not a
    /// well-formed request is ignored.
    pub fn handle_message(&mut self, message: &Value) -> Vec<Outgoing> {
        match parse_request(message) {
            Some(request) => self.dispatch_request(&request),
            None => Vec::new(),
        }
    }

    pub fn dispatch_request(&mut self, request: &Request) -> Vec<Outgoing> {
        match request.command.as_str() {
            "initialize" => {
                let response = Response::success(self.alloc_seq(), request, Some(json!({})));
                vec![Outgoing::Response(response)]
            }
            "launch" => {
                let response = Response::success(self.alloc_seq(), request, None);
                let exited = Event::exited(self.alloc_seq(), 0);
                let terminated = Event::terminated(self.alloc_seq(), false);
                vec![
                    Outgoing::Response(response),
                    Outgoing::Event(exited),
                    Outgoing::Event(terminated),
                ]
            }
            "disconnect" | "terminate" => {
                let response = Response::success(self.alloc_seq(), request, None);
                vec![Outgoing::Response(response)]
            }
            other => {
                tracing::trace!(target: "metals.dap", command = other, "no reply for command");
                Vec::new()
            }
        }
    }

    /// Serve the adapter over a byte stream until EOF or `disconnect`.
    pub async fn serve<R, W>(mut self, reader: R, writer: W) -> Result<(), DapError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = DapReader::new(reader);
        let mut writer = DapWriter::new(writer);

        while let Some(message) = reader.read_value().await? {
            let Some(request) = parse_request(&message) else {
                continue;
            };

            for outgoing in self.dispatch_request(&request) {
                writer.write_message(&outgoing).await?;
            }

            if request.command == "disconnect" {
                tracing::debug!(target: "metals.dap", "client disconnected");
                break;
            }
        }

        Ok(())
    }

    /// Serve the adapter over stdin/stdout.
    pub async fn serve_stdio(self) -> Result<(), DapError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }
}

fn parse_request(message: &Value) -> Option<Request> {
    if message.get("type").and_then(Value::as_str) != Some("request") {
        return None;
    }
    match serde_json::from_value::<Request>(message.clone()) {
        Ok(request) => Some(request),
        Err(err) => {
            tracing::debug!(
                target: "metals.dap",
                error = %DapError::from(err),
                "ignoring malformed request"
            );
            None
        }
    }
}
