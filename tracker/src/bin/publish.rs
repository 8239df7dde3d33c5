use anyhow::{Context, Result};
use clap::Parser;
use exp_tracker::{config::Config, http::ReqwestClient, publisher::Publisher};
use std::path::PathBuf;
use tokio::io::{self, BufReader};
use tracing::info;

/// Send `key=value` records read from stdin to the experiment endpoint
#[derive(Parser, Debug)]
#[command(name = "publish", version)]
struct Args {
    /// Experiment id attached to every record
    experiment_id: u64,

    /// Any value enables debug mode: print request urls instead of sending
    debug: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    exp_tracker::init_tracing();

    let config = Config::resolve(args.config.as_deref())?;
    let debug = args.debug.is_some();
    if debug {
        info!("Debug mode, no requests will be sent");
    }

    let client = ReqwestClient::new(config.publisher.timeout())?;
    let publisher = Publisher::new(client, &config.publisher, args.experiment_id, debug)?;
    publisher
        .run(BufReader::new(io::stdin()), io::stdout())
        .await
        .context("reading records from stdin")?;
    Ok(())
}
