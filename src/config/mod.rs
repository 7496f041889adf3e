//! Configuration management.

mod settings;

pub use settings::{Paths, Settings};
