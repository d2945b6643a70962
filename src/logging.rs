//! Logging setup for the command-line runner.

use anyhow::Context as _;

/// A [`clap::Args`] struct for options controlling log output to stderr.
#[derive(Clone, Debug, clap::Args)]
pub struct LoggingArgs {
    /// Additional logging to stderr.
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Remove timestamps from logs so that runs can be diffed.
    #[arg(long = "simplify-log-format", hide = true)]
    pub simplify_log_format: bool,
}

/// Install a [`log`] global logger writing to stderr based on `options`.
pub fn install(options: &LoggingArgs) -> Result<(), anyhow::Error> {
    use log::LevelFilter::{Error, Info, Off, Trace};

    let &LoggingArgs {
        verbose,
        simplify_log_format,
    } = options;

    let logger = simplelog::WriteLogger::new(
        if verbose { Trace } else { Info },
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .set_time_level(if simplify_log_format { Off } else { Error })
            .build(),
        std::io::stderr(),
    );
    let max_level = simplelog::SharedLogger::level(&*logger);

    log::set_boxed_logger(logger).context("failed to initialize logging")?;
    log::set_max_level(max_level);
    Ok(())
}
