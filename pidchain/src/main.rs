mod logging;
mod options;
mod output;
mod usage;

use std::process::ExitCode;

use anyhow::{bail, Result};
use pidchain_config::{ConfigLoader, ConfigStore};
use pidchain_process::AncestryWalker;
use tracing::debug;

use options::{Bootstrap, RunOptions};
use usage::display_usage;

const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("pidchain: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let mut store = ConfigStore::new();
    // argv[0] is the program name, not an option
    ConfigLoader::new().load_args(&mut store, std::env::args().skip(1));

    let boot = Bootstrap::from_store(&store);
    logging::initialize_logging(boot.log_file.as_deref(), boot.verbose)?;

    if let Some(config) = &boot.config {
        let summary = ConfigLoader::new()
            .verbose(boot.verbose)
            .load_ini(&mut store, config)?;
        debug!("Config {} merged: {:?}", config.display(), summary);
    }

    let opts = RunOptions::from_store(&store)?;
    debug!("Run options: {:?}", opts);

    if opts.help {
        display_usage();
        return Ok(ExitCode::SUCCESS);
    }
    let Some(pid) = opts.pid else {
        display_usage();
        return Ok(ExitCode::from(EXIT_USAGE));
    };

    let walker = AncestryWalker::new().verbose(boot.verbose);
    if !walker.exists(pid) {
        bail!("no process with pid {pid}");
    }

    let chain = output::build_chain(&walker, pid, opts.mode);
    println!("{}", output::render(chain, &opts));
    Ok(ExitCode::SUCCESS)
}
