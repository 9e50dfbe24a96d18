//! Client connection configuration
//!
//! Settings come from explicit values or `PANOS_*` environment variables,
//! and may be filled in from a JSON credentials file. The file has the
//! lowest priority: only settings still at their zero value are taken
//! from it.

use crate::error::PanosError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Which API traffic is logged by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFlags {
    /// Configuration changes (set, edit, delete, import)
    pub action: bool,
    /// Configuration reads
    pub query: bool,
    /// Operational commands
    pub op: bool,
    /// Request xpath
    pub xpath: bool,
    /// Outgoing request form
    pub send: bool,
    /// Raw response body
    pub receive: bool,
}

impl LogFlags {
    /// No logging at all
    pub const QUIET: LogFlags = LogFlags {
        action: false,
        query: false,
        op: false,
        xpath: false,
        send: false,
        receive: false,
    };

    /// Parse logging artifact names (`quiet`, `action`, `query`, `op`,
    /// `xpath`, `send`, `receive`).
    ///
    /// An empty list yields the default flags; `quiet` alone disables
    /// everything.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, PanosError> {
        if names.is_empty() {
            return Ok(Self::default());
        }
        let mut flags = Self::QUIET;
        for name in names {
            match name.as_ref().trim() {
                "quiet" => {}
                "action" => flags.action = true,
                "query" => flags.query = true,
                "op" => flags.op = true,
                "xpath" => flags.xpath = true,
                "send" => flags.send = true,
                "receive" => flags.receive = true,
                other => {
                    return Err(PanosError::InvalidConfig(format!(
                        "Unknown logging artifact requested: {}",
                        other
                    )));
                }
            }
        }
        Ok(flags)
    }
}

impl Default for LogFlags {
    fn default() -> Self {
        Self {
            action: true,
            ..Self::QUIET
        }
    }
}

/// API protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TLS, port 443 by default
    #[default]
    Https,
    /// Plain text, port 80 by default
    Http,
}

impl Protocol {
    /// URL scheme
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Https => "https",
            Protocol::Http => "http",
        }
    }
}

impl FromStr for Protocol {
    type Err = PanosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "https" => Ok(Protocol::Https),
            "http" => Ok(Protocol::Http),
            other => Err(PanosError::InvalidConfig(format!(
                "protocol must be https or http, got {:?}",
                other
            ))),
        }
    }
}

/// JSON credentials file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredsSpec {
    /// Device hostname or address
    pub hostname: String,
    /// Administrator username
    pub username: String,
    /// Administrator password
    pub password: String,
    /// API key; skips key generation when set
    pub api_key: String,
    /// `https` or `http`
    pub protocol: String,
    /// Port, 0 for the protocol default
    pub port: u16,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Logging artifact names
    pub logging: Vec<String>,
}

/// Connection settings for [`XapiClient`](crate::XapiClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Device hostname or address
    pub hostname: String,
    /// Administrator username
    pub username: String,
    /// Administrator password
    pub password: String,
    /// API key; generated from username and password when empty
    pub api_key: String,
    /// API protocol
    pub protocol: Protocol,
    /// Non-standard port; `None` uses the protocol default
    pub port: Option<u16>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Which API traffic is logged
    pub logging: LogFlags,
    /// Verify the device's TLS certificate
    pub verify_certificate: bool,
    // Whether protocol/timeout/logging were set explicitly, so a
    // credentials file only fills in what is still unset.
    protocol_set: bool,
    timeout_set: bool,
    logging_set: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            username: String::new(),
            password: String::new(),
            api_key: String::new(),
            protocol: Protocol::default(),
            port: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            logging: LogFlags::default(),
            verify_certificate: false,
            protocol_set: false,
            timeout_set: false,
            logging_set: false,
        }
    }
}

impl ClientConfig {
    /// Create a config for a hostname with an API key
    pub fn with_api_key(hostname: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load settings from `PANOS_*` environment variables
    ///
    /// Reads `PANOS_HOSTNAME`, `PANOS_USERNAME`, `PANOS_PASSWORD`,
    /// `PANOS_API_KEY`, `PANOS_PROTOCOL`, `PANOS_PORT`, `PANOS_TIMEOUT`
    /// (seconds) and `PANOS_LOGGING` (comma separated artifacts).
    pub fn from_env() -> Result<Self, PanosError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, PanosError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get("PANOS_HOSTNAME") {
            config.hostname = v;
        }
        if let Some(v) = get("PANOS_USERNAME") {
            config.username = v;
        }
        if let Some(v) = get("PANOS_PASSWORD") {
            config.password = v;
        }
        if let Some(v) = get("PANOS_API_KEY") {
            config.api_key = v;
        }
        if let Some(v) = get("PANOS_PROTOCOL") {
            config.protocol = v.parse()?;
            config.protocol_set = true;
        }
        if let Some(v) = get("PANOS_PORT") {
            let port = v.trim().parse::<u16>().map_err(|e| {
                PanosError::InvalidConfig(format!("PANOS_PORT {:?}: {}", v, e))
            })?;
            config.port = Some(port);
        }
        if let Some(v) = get("PANOS_TIMEOUT") {
            let secs = v.trim().parse::<u64>().map_err(|e| {
                PanosError::InvalidConfig(format!("PANOS_TIMEOUT {:?}: {}", v, e))
            })?;
            config.set_timeout(Duration::from_secs(secs));
        }
        if let Some(v) = get("PANOS_LOGGING") {
            let names: Vec<&str> = v.split(',').filter(|s| !s.trim().is_empty()).collect();
            config.set_logging(LogFlags::parse(&names)?);
        }

        Ok(config)
    }

    /// Set the protocol explicitly
    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.protocol = protocol;
        self.protocol_set = true;
    }

    /// Set the timeout explicitly
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
        self.timeout_set = true;
    }

    /// Set the logging flags explicitly
    pub fn set_logging(&mut self, logging: LogFlags) {
        self.logging = logging;
        self.logging_set = true;
    }

    /// Fill unset settings from a JSON credentials file
    pub fn merge_json_file(&mut self, path: impl AsRef<Path>) -> Result<(), PanosError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PanosError::InvalidConfig(format!("reading {}: {}", path.display(), e))
        })?;
        let creds: CredsSpec = serde_json::from_str(&contents)?;
        self.merge_credentials(creds)
    }

    /// Fill unset settings from parsed credentials
    pub fn merge_credentials(&mut self, creds: CredsSpec) -> Result<(), PanosError> {
        if self.hostname.is_empty() && !creds.hostname.is_empty() {
            self.hostname = creds.hostname;
        }
        if self.username.is_empty() && !creds.username.is_empty() {
            self.username = creds.username;
        }
        if self.password.is_empty() && !creds.password.is_empty() {
            self.password = creds.password;
        }
        if self.api_key.is_empty() && !creds.api_key.is_empty() {
            self.api_key = creds.api_key;
        }
        if !self.protocol_set && !creds.protocol.is_empty() {
            self.set_protocol(creds.protocol.parse()?);
        }
        if self.port.is_none() && creds.port != 0 {
            self.port = Some(creds.port);
        }
        if !self.timeout_set && creds.timeout != 0 {
            self.set_timeout(Duration::from_secs(creds.timeout));
        }
        if !self.logging_set && !creds.logging.is_empty() {
            self.set_logging(LogFlags::parse(&creds.logging)?);
        }
        Ok(())
    }

    /// Check that the config can be used to connect
    pub fn validate(&self) -> Result<(), PanosError> {
        if self.hostname.is_empty() {
            return Err(PanosError::InvalidConfig("hostname is required".to_string()));
        }
        if self.api_key.is_empty() && (self.username.is_empty() || self.password.is_empty()) {
            return Err(PanosError::InvalidConfig(
                "either api_key or username and password are required".to_string(),
            ));
        }
        Ok(())
    }

    /// API endpoint URL
    pub fn api_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}/api/", self.protocol.scheme(), self.hostname, port),
            None => format!("{}://{}/api/", self.protocol.scheme(), self.hostname),
        }
    }
}
