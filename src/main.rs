use vcdedit::{config::Config, init_logging, run, Opts};

use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let config = Config::load();

    init_logging(&config, opts.verbose)
        .context("Can't set up logging")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(opts, &config, &mut out)?;

    Ok(())
}
