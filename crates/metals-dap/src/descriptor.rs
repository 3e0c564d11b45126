use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DescriptorError;

/// Address of a debug adapter server the editor should connect to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebugAdapterServer {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for DebugAdapterServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse the debug adapter URI returned by the language server, such as
/// `tcp://127.0.0.1:61234`.
///
/// Only the authority matters; scheme and path are ignored. IPv6 hosts keep
/// their brackets (`[::1]`).
pub fn debug_server_from_uri(uri: &str) -> Result<DebugAdapterServer, DescriptorError> {
    let url = Url::parse(uri).map_err(|err| DescriptorError::InvalidUri(format!("{uri:?}: {err}")))?;

    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| DescriptorError::MissingHost(uri.to_owned()))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| DescriptorError::MissingPort(uri.to_owned()))?;

    Ok(DebugAdapterServer {
        host: host.to_owned(),
        port,
    })
}
