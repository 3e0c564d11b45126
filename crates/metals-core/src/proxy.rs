//! Derivation of `*_proxy` environment variables from JVM system properties.
//!
//! Build tools launched on behalf of a JVM program expect proxy settings in the
//! conventional `http_proxy` / `https_proxy` / `ftp_proxy` environment
//! variables, while users usually configure them as `-D<scheme>.proxyHost=...`
//! and `-D<scheme>.proxyPort=...` JVM options. [`derive_proxy_environment`]
//! bridges the two.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Proxy protocol class recognized in JVM proxy properties.
///
/// The set is closed: JVM networking only defines proxy properties for these
/// three schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProxyScheme {
    Http,
    Https,
    Ftp,
}

impl ProxyScheme {
    pub const ALL: [ProxyScheme; 3] = [ProxyScheme::Http, ProxyScheme::Https, ProxyScheme::Ftp];

    pub fn as_str(self) -> &'static str {
        match self {
            ProxyScheme::Http => "http",
            ProxyScheme::Https => "https",
            ProxyScheme::Ftp => "ftp",
        }
    }

    /// Name of the environment variable carrying this scheme's proxy, e.g. `http_proxy`.
    pub fn env_var_name(self) -> &'static str {
        match self {
            ProxyScheme::Http => "http_proxy",
            ProxyScheme::Https => "https_proxy",
            ProxyScheme::Ftp => "ftp_proxy",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "http" => Some(ProxyScheme::Http),
            "https" => Some(ProxyScheme::Https),
            "ftp" => Some(ProxyScheme::Ftp),
            _ => None,
        }
    }

    fn port_regex(self) -> &'static Regex {
        static HTTP: OnceLock<Regex> = OnceLock::new();
        static HTTPS: OnceLock<Regex> = OnceLock::new();
        static FTP: OnceLock<Regex> = OnceLock::new();

        let cell = match self {
            ProxyScheme::Http => &HTTP,
            ProxyScheme::Https => &HTTPS,
            ProxyScheme::Ftp => &FTP,
        };
        cell.get_or_init(|| {
            Regex::new(&format!(r"-D{}\.proxyPort=([0-9]+)", self.as_str())).expect("valid regex")
        })
    }
}

impl fmt::Display for ProxyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn host_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-D(http|https|ftp)\.proxyHost=(\S+)").expect("valid regex"))
}

/// Proxy environment derived from a property list: at most one value per scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyEnvironment {
    entries: BTreeMap<ProxyScheme, String>,
}

impl ProxyEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value for `scheme`, either `host` or `host:port`.
    pub fn get(&self, scheme: ProxyScheme) -> Option<&str> {
        self.entries.get(&scheme).map(String::as_str)
    }

    /// Value for an environment variable name such as `https_proxy`.
    pub fn get_env(&self, name: &str) -> Option<&str> {
        ProxyScheme::ALL
            .into_iter()
            .find(|scheme| scheme.env_var_name() == name)
            .and_then(|scheme| self.get(scheme))
    }

    /// Iterate `(environment variable name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(scheme, value)| (scheme.env_var_name(), value.as_str()))
    }

    /// `NAME=value` strings suitable for a process launcher.
    pub fn into_env_assignments(self) -> Vec<String> {
        self.entries
            .into_iter()
            .map(|(scheme, value)| format!("{}={value}", scheme.env_var_name()))
            .collect()
    }

    fn insert(&mut self, scheme: ProxyScheme, value: String) {
        self.entries.insert(scheme, value);
    }
}

/// Derive `*_proxy` environment variables from JVM `-D` system properties.
///
/// Every `-D<scheme>.proxyHost=<host>` entry yields a `<scheme>_proxy` value.
/// The port comes from the first `-D<scheme>.proxyPort=<digits>` entry
/// anywhere in `properties`; without one the value is the bare host. When a
/// scheme has several host entries the last one wins. Entries that match
/// neither pattern are ignored, so this never fails.
pub fn derive_proxy_environment<S: AsRef<str>>(properties: &[S]) -> ProxyEnvironment {
    let mut env = ProxyEnvironment::new();

    for property in properties {
        let Some(captures) = host_regex().captures(property.as_ref()) else {
            continue;
        };
        let (Some(scheme), Some(host)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let Some(scheme) = ProxyScheme::from_token(scheme.as_str()) else {
            continue;
        };
        let host = host.as_str();

        let value = match find_port(properties, scheme) {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        };

        tracing::trace!(
            target: "metals.proxy",
            scheme = scheme.as_str(),
            value = %value,
            "derived proxy environment entry"
        );
        env.insert(scheme, value);
    }

    env
}

fn find_port<S: AsRef<str>>(properties: &[S], scheme: ProxyScheme) -> Option<&str> {
    let re = scheme.port_regex();
    let property = properties
        .iter()
        .map(|property| property.as_ref())
        .find(|property| re.is_match(property))?;

    // A matching property without a digit capture degrades to host-only.
    re.captures(property)
        .and_then(|captures| captures.get(1))
        .map(|port| port.as_str())
}

/// Split a JVM options string (e.g. the value of `JAVA_OPTS`) into individual
/// options on whitespace.
pub fn split_jvm_options(options: &str) -> Vec<&str> {
    options.split_whitespace().collect()
}
