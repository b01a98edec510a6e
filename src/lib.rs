//! bucketdb-driver - sequential request driver for a JSON-over-TCP bucket store
//!
//! This library holds the test case catalog, the newline-delimited JSON wire
//! codec, and the driver that runs each case on a fresh connection.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod common;
pub mod driver;
pub mod stub;
pub mod wire;

// Re-export commonly used types for tests
pub use catalog::{Catalog, Method, RequestDescriptor};
pub use common::{Error, Result};
pub use driver::Driver;
