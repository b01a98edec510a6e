//! CLI argument definitions

use clap::Args;
use std::path::PathBuf;

use crate::common::config::TargetOverride;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Target host (default: 127.0.0.1, or the config file's value)
    #[arg(long)]
    pub host: Option<String>,

    /// Target port (default: 8080, or the config file's value)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// YAML scenario to run instead of the built-in catalog
    #[arg(long, short)]
    pub scenario: Option<PathBuf>,

    /// Print the numbered cases without connecting
    #[arg(long)]
    pub list: bool,
}

impl RunArgs {
    pub fn target_override(&self) -> TargetOverride {
        TargetOverride {
            host: self.host.clone(),
            port: self.port,
        }
    }
}
