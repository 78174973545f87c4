//! Binary entry point: resolve configuration, set up logging, open the
//! journal and run one command against it.
use clap::Parser;
use tracing_subscriber::EnvFilter;

use brewlog::{Journal, JournalConfig};

mod cli;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let config = JournalConfig::from_env()?;
    init_tracing(&config);

    let journal = Journal::open(&config)?;
    cli::run(&journal, args.command)
}

/// Logs go to stderr so JSON output on stdout stays clean.
fn init_tracing(config: &JournalConfig) {
    let env_filter = EnvFilter::new(&config.log_filter);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if config.json_logs {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}
