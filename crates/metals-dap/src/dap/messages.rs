use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub seq: u64,
    #[serde(rename = "type")]
    pub type_: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub seq: u64,
    #[serde(rename = "type")]
    pub type_: String,
    pub request_seq: u64,
    pub success: bool,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Response {
    pub fn success(seq: u64, request: &Request, body: Option<Value>) -> Self {
        Self {
            seq,
            type_: "response".to_owned(),
            request_seq: request.seq,
            success: true,
            command: request.command.clone(),
            message: None,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub seq: u64,
    #[serde(rename = "type")]
    pub type_: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Event {
    pub fn new(seq: u64, event: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            seq,
            type_: "event".to_owned(),
            event: event.into(),
            body,
        }
    }

    /// `exited` event carrying the debuggee's exit code.
    pub fn exited(seq: u64, exit_code: i64) -> Self {
        Self::new(seq, "exited", Some(json!({ "exitCode": exit_code })))
    }

    /// `terminated` event; `restart` asks the client to restart the session.
    pub fn terminated(seq: u64, restart: bool) -> Self {
        Self::new(seq, "terminated", Some(json!({ "restart": restart })))
    }
}

/// A message the adapter sends to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outgoing {
    Response(Response),
    Event(Event),
}

impl Outgoing {
    pub fn seq(&self) -> u64 {
        match self {
            Outgoing::Response(response) => response.seq,
            Outgoing::Event(event) => event.seq,
        }
    }
}
