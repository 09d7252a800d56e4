use clap::Parser;
use patune::cli::Cli;
use patune::{commands, init_logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.log_level())?;

    commands::run(cli)
}
