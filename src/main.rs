use std::{
    num::{NonZeroU64, NonZeroUsize},
    process::ExitCode,
    sync::Arc,
    time::{Duration, Instant},
};

use clap::Parser;
use tracing::{error, info, Level};

use chord_size::{
    rpc::DEFAULT_RPC_PORT, Config, Estimate, HttpRpc, Result, RingSpace, Sampler,
};

const DEFAULT_RPC_ADDRESS: &str = "http://seed.nkn.org:30003";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Initial rpc address of any ring node
    #[arg(long, default_value = DEFAULT_RPC_ADDRESS)]
    rpc: String,
    /// Number of concurrent walks
    #[arg(short, default_value = "8")]
    m: NonZeroUsize,
    /// Hop budget of each walk
    #[arg(short, default_value = "8")]
    n: NonZeroUsize,
    /// Print the result as json
    #[arg(long)]
    json: bool,
    /// Port ring nodes serve rpc on
    #[arg(long, default_value_t = DEFAULT_RPC_PORT)]
    rpc_port: u16,
    /// Rpc request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: NonZeroU64,
    /// Log every hop
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let started = Instant::now();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    // Logs go to stderr so stdout only carries the report.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(estimate) => {
            report(&cli, &estimate, started.elapsed());
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<Estimate> {
    let space = RingSpace::default();

    let rpc = HttpRpc::new(&Config {
        rpc_port: cli.rpc_port,
        request_timeout: Duration::from_secs(cli.timeout.get()),
        ..Default::default()
    })?;

    let aggregate = Sampler::new(space.clone(), Arc::new(rpc))
        .with_walks(cli.m.get())
        .with_hops(cli.n.get())
        .run(&cli.rpc)?;

    aggregate.estimate(&space)
}

fn report(cli: &Cli, estimate: &Estimate, elapsed: Duration) {
    if cli.json {
        match serde_json::to_value(estimate) {
            Ok(mut value) => {
                value["time"] = (elapsed.as_nanos() as f64).into();
                println!("{}", value);
            }
            Err(error) => error!("json formatter error: {}", error),
        }
    } else {
        info!("Total nodes visited: {}", estimate.visited);
        info!("Total area covered: {:.2}%", estimate.covered);
        info!(
            "Estimated total number of nodes in the network: {} +- {}",
            estimate.estimated, estimate.uncertainty
        );
        info!(
            "Estimated network relay per second: {:.0}",
            estimate.relay_per_second
        );
        info!("Time used: {:?}", elapsed);
    }
}
