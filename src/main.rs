//! bucketdb-driver - sequential request driver for a JSON-over-TCP bucket store
//!
//! Sends each catalog case on its own connection and prints the request and
//! the raw response. Judging the responses is left to whoever reads them.

use clap::Parser;
use colored::Colorize;
use driver::cli;
use driver::commands::RunArgs;
use driver::common::logging;

#[derive(Parser)]
#[command(name = "bucketdb-driver", about = "Sequential request driver for a bucket store")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.run).await {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
