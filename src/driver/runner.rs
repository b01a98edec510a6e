//! Sequential connect, send, receive, close loop

use std::io::Write;

use tokio::io::AsyncWriteExt;

use crate::catalog::{Catalog, RequestDescriptor};
use crate::common::config::Settings;
use crate::common::{Error, Result};
use crate::wire::{codec, transport};

use super::CaseState;

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cases_run: usize,
}

/// Drives a catalog against one target, one connection per case
#[derive(Debug, Clone)]
pub struct Driver {
    settings: Settings,
}

impl Driver {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run every case, printing the transcript to stdout
    pub async fn run_all(&self, catalog: &Catalog) -> Result<RunSummary> {
        let mut stdout = std::io::stdout();
        self.run_all_to(catalog, &mut stdout).await
    }

    /// Run every case, writing the transcript to `out`
    ///
    /// The first failing case aborts the run; later cases are not attempted.
    pub async fn run_all_to<W: Write>(&self, catalog: &Catalog, out: &mut W) -> Result<RunSummary> {
        let mut cases_run = 0;

        for (position, descriptor) in catalog.cases() {
            let message = codec::encode(descriptor, self.settings.separators)?;

            writeln!(
                out,
                "Test case {}: sending {}",
                position,
                codec::decode(codec::body(&message))
            )?;
            out.flush()?;

            let response = self.exchange(position, &message).await?;

            writeln!(out, "Response: {}\n", response.trim())?;
            out.flush()?;
            cases_run += 1;
        }

        Ok(RunSummary { cases_run })
    }

    /// Send one descriptor on a fresh connection and return the decoded reply
    pub async fn send_request(&self, descriptor: &RequestDescriptor) -> Result<String> {
        let message = codec::encode(descriptor, self.settings.separators)?;
        self.exchange(0, &message).await
    }

    async fn exchange(&self, position: usize, message: &[u8]) -> Result<String> {
        let addr = self.settings.addr();
        let mut state = CaseState::Idle;
        let advance = |state: &mut CaseState| {
            *state = state.next();
            tracing::debug!(case = position, state = %state, "case state");
        };

        advance(&mut state);
        let mut stream = transport::connect(&addr, self.settings.connect_timeout).await?;

        advance(&mut state);
        transport::send_message(&mut stream, message).await?;
        tracing::trace!(case = position, bytes = message.len(), "request flushed");

        advance(&mut state);
        let limit = self.settings.max_response_bytes;
        let mode = self.settings.read_mode;
        let bytes = transport::with_timeout("Read", self.settings.read_timeout, async {
            transport::read_response(&mut stream, limit, mode)
                .await
                .map_err(Error::from)
        })
        .await?;
        tracing::trace!(case = position, bytes = bytes.len(), "response received");

        advance(&mut state);
        stream.shutdown().await?;
        drop(stream);

        advance(&mut state);
        Ok(codec::decode(&bytes))
    }
}
