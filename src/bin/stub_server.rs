//! Stub bucket store for exercising the driver by hand
//!
//! Listens on a TCP port and answers every request according to `--mode`.

use clap::Parser;
use colored::Colorize;
use driver::common::logging;
use driver::stub::{self, StubMode};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "stub-server", about = "Stub bucket store for driver testing")]
#[command(version, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value_t = 8080)]
    port: u16,

    /// How to answer requests
    #[arg(long, value_enum, default_value_t = StubMode::Echo)]
    mode: StubMode,
}

#[tokio::main]
async fn main() {
    logging::init_stub();

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    let result = async {
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Stub listening on {} in {:?} mode", addr, args.mode);
        stub::serve(listener, args.mode).await
    }
    .await;

    if let Err(e) = result {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
