//! Port type with validation.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
///
/// Using a newtype prevents accidental misuse of raw u16 values
/// and ensures port numbers are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;
    /// Conventional VNC display port.
    pub const VNC: Port = Port(5900);

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Create a Port without validation. Use only when the value is known valid.
    #[inline]
    pub const fn new_unchecked(port: u16) -> Self {
        Self(port)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl Default for Port {
    fn default() -> Self {
        Self::VNC
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u16 = s
            .trim()
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        Self::try_from(value)
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ports() {
        assert_eq!(Port::new(1).unwrap().as_u16(), 1);
        assert_eq!(Port::new(5900).unwrap().as_u16(), 5900);
        assert_eq!(Port::new(65535).unwrap().as_u16(), 65535);
    }

    #[test]
    fn test_zero_is_invalid() {
        assert!(Port::new(0).is_none());
        assert!(matches!("0".parse::<Port>(), Err(PortError::OutOfRange(0))));
    }

    #[test]
    fn test_parse() {
        assert_eq!("5901".parse::<Port>().unwrap().as_u16(), 5901);
        assert!("vnc".parse::<Port>().is_err());
    }

    #[test]
    fn test_default_is_vnc() {
        assert_eq!(Port::default(), Port::VNC);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Port::VNC).unwrap();
        assert_eq!(json, "5900");
        let port: Port = serde_json::from_str("5901").unwrap();
        assert_eq!(port.as_u16(), 5901);
    }
}
