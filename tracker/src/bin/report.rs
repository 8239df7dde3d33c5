use anyhow::Result;
use clap::Parser;
use exp_tracker::{
    collector::{Collector, PsCommand},
    config::Config,
};
use std::path::PathBuf;

/// Print `rss=<kb> time=<seconds>` for a process
#[derive(Parser, Debug)]
#[command(name = "report", version)]
struct Args {
    /// Process id to sample
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pid: u32,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    exp_tracker::init_tracing();

    let config = Config::resolve(args.config.as_deref())?;
    let collector = Collector::new(PsCommand::new(&config.collector));
    let sample = collector.sample(args.pid).await;
    println!("{}", sample);
    Ok(())
}
