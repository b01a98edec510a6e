//! Common utilities shared between the driver and the stub server

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};
