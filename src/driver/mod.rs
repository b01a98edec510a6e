//! Request driver
//!
//! Walks a catalog strictly in order. Every case gets its own connection,
//! and case N is fully closed before case N+1 connects.

mod runner;

use std::fmt;

pub use runner::{Driver, RunSummary};

/// Lifecycle of a single case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseState {
    Idle,
    Connecting,
    Sending,
    AwaitingResponse,
    Closing,
    Done,
}

impl CaseState {
    /// The state that follows this one; `Done` is terminal
    pub fn next(self) -> Self {
        match self {
            CaseState::Idle => CaseState::Connecting,
            CaseState::Connecting => CaseState::Sending,
            CaseState::Sending => CaseState::AwaitingResponse,
            CaseState::AwaitingResponse => CaseState::Closing,
            CaseState::Closing | CaseState::Done => CaseState::Done,
        }
    }
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseState::Idle => "IDLE",
            CaseState::Connecting => "CONNECTING",
            CaseState::Sending => "SENDING",
            CaseState::AwaitingResponse => "AWAITING_RESPONSE",
            CaseState::Closing => "CLOSING",
            CaseState::Done => "DONE",
        };
        f.write_str(name)
    }
}
