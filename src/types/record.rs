//! Connection record types.
//!
//! A `ConnectionRecord` is one named remote-desktop target. Records are
//! persisted keyed by name; the liveness flag is transient and recomputed
//! by the status refresher on every pass.

use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The full set of known connections, keyed by connection name.
///
/// A `BTreeMap` keeps iteration (and therefore every listing) in name order.
/// The set is a plain value: components receive it by reference for the
/// duration of one operation and never retain it across suspension points.
pub type RecordSet = BTreeMap<String, ConnectionRecord>;

/// A named, persisted remote-desktop connection target.
///
/// At least one of `hostname` and `ip_address` must be non-empty. The
/// password is stored in plaintext; this mirrors the viewer's own password
/// handling and is a documented limitation, not an invitation to put
/// anything sensitive in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Unique human-chosen identifier, also the store key.
    pub name: String,
    /// DNS name of the target, may be empty.
    #[serde(default)]
    pub hostname: String,
    /// Dotted-quad address of the target, may be empty.
    #[serde(default)]
    pub ip_address: String,
    /// Viewer password, may be empty. Stored in plaintext.
    #[serde(default)]
    pub password: String,
    /// TCP port the remote-desktop server listens on.
    #[serde(default)]
    pub port: Port,
    /// Whether the target answered the most recent probe.
    ///
    /// Never persisted; false on load and recomputed every refresh cycle.
    #[serde(skip)]
    pub is_alive: bool,
}

impl ConnectionRecord {
    /// Create a record with the given name and the default VNC port.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hostname: String::new(),
            ip_address: String::new(),
            password: String::new(),
            port: Port::default(),
            is_alive: false,
        }
    }

    /// Set the hostname.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Set the IP address.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = ip.into();
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the port.
    pub fn with_port(mut self, port: Port) -> Self {
        self.port = port;
        self
    }

    /// Whether the record satisfies the hostname-or-ip invariant.
    pub fn is_valid(&self) -> bool {
        !self.hostname.is_empty() || !self.ip_address.is_empty()
    }

    /// The address to probe or connect to: hostname if set, otherwise IP.
    ///
    /// Returns `None` when the record has neither, which a well-formed store
    /// never contains but a refresh pass must tolerate.
    pub fn target(&self) -> Option<&str> {
        if !self.hostname.is_empty() {
            Some(&self.hostname)
        } else if !self.ip_address.is_empty() {
            Some(&self.ip_address)
        } else {
            None
        }
    }
}

impl fmt::Display for ConnectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(target) => write!(f, "{} ({}:{})", self.name, target, self.port),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A host discovered by a range sweep.
///
/// Ephemeral: presented to the user and either discarded or converted into
/// a [`ConnectionRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discovery {
    /// Reverse-DNS name of the host, empty if resolution failed.
    pub name: String,
    /// Dotted-quad address that answered the probe.
    pub ip: String,
    /// Port that was probed.
    pub port: Port,
    /// Whether the host answered. Always true for emitted discoveries.
    pub alive: bool,
}

impl Discovery {
    /// Convert into a connection record, naming it after the reverse-DNS
    /// name when one was found and after the address otherwise.
    pub fn into_record(self) -> ConnectionRecord {
        let name = if self.name.is_empty() {
            self.ip.clone()
        } else {
            self.name.clone()
        };
        ConnectionRecord {
            name,
            hostname: self.name,
            ip_address: self.ip,
            password: String::new(),
            port: self.port,
            is_alive: self.alive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_prefers_hostname() {
        let record = ConnectionRecord::new("lab")
            .with_hostname("lab.local")
            .with_ip("192.168.1.40");
        assert_eq!(record.target(), Some("lab.local"));
    }

    #[test]
    fn test_target_falls_back_to_ip() {
        let record = ConnectionRecord::new("lab").with_ip("192.168.1.40");
        assert_eq!(record.target(), Some("192.168.1.40"));
    }

    #[test]
    fn test_validity() {
        assert!(!ConnectionRecord::new("empty").is_valid());
        assert!(ConnectionRecord::new("ok").with_hostname("h").is_valid());
        assert!(ConnectionRecord::new("ok").with_ip("10.0.0.1").is_valid());
    }

    #[test]
    fn test_is_alive_not_serialized() {
        let mut record = ConnectionRecord::new("lab").with_ip("192.168.1.40");
        record.is_alive = true;

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("is_alive"));

        let parsed: ConnectionRecord = serde_json::from_str(&json).unwrap();
        assert!(!parsed.is_alive);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        // A record written before password/port existed must still load.
        let json = r#"{"name":"old","hostname":"old.local","ip_address":""}"#;
        let parsed: ConnectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.password, "");
        assert_eq!(parsed.port, Port::VNC);
    }

    #[test]
    fn test_discovery_into_record() {
        let named = Discovery {
            name: "den-pc".to_string(),
            ip: "192.168.1.11".to_string(),
            port: Port::VNC,
            alive: true,
        };
        let record = named.into_record();
        assert_eq!(record.name, "den-pc");
        assert_eq!(record.hostname, "den-pc");
        assert_eq!(record.ip_address, "192.168.1.11");

        let anonymous = Discovery {
            name: String::new(),
            ip: "192.168.1.12".to_string(),
            port: Port::VNC,
            alive: true,
        };
        assert_eq!(anonymous.into_record().name, "192.168.1.12");
    }
}
