//! The command line args for the Matsight API

use clap::Parser;

/// The command line args passed to the Matsight API
#[derive(Parser, Debug, Clone)]
#[clap(version, author)]
pub struct Args {
    /// The path to the config file to load
    #[clap(short, long, default_value = "matsight.yml")]
    pub config: String,
}
