//! Launches the Matsight API

use clap::Parser;

use matsight::args::Args;
use matsight::conf::Conf;

#[tokio::main]
async fn main() {
    // parse our command line args
    let args = Args::parse();
    // load our config
    let config = match Conf::new(&args.config) {
        Ok(config) => config,
        Err(error) => panic!("Failed to load config {}: {error}", args.config),
    };
    // setup our tracing subscriber
    matsight::utils::trace::setup(&config);
    // launch the API
    matsight::axum(config).await;
}
