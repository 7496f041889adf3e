//! Core type definitions.

mod port;
mod record;

pub use port::{Port, PortError};
pub use record::{ConnectionRecord, Discovery, RecordSet};
