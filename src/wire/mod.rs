//! Wire protocol for the bucket store
//!
//! Newline-delimited JSON over TCP: one connection carries exactly one
//! request line and one response.

pub mod codec;
pub mod transport;

pub use codec::{decode, encode};
