//! Logging to stderr.

use anyhow::Context as _;

/// A [`clap::Args`] struct for options controlling log output to stderr.
#[derive(Clone, Debug, clap::Args)]
pub(crate) struct LoggingArgs {
    /// Additional logging to stderr.
    #[arg(long = "verbose", short = 'v')]
    pub(crate) verbose: bool,

    /// Remove timestamps from logs so that they are deterministic.
    ///
    /// This option is intended for internal tests only.
    #[arg(long = "simplify-log-format", hide = true)]
    pub(crate) simplify_log_format: bool,
}

/// Install a [`log`] global logger based on user-provided `options`.
///
/// Only messages from the `genblocks` crates are shown.
pub(crate) fn install(options: &LoggingArgs) -> Result<(), anyhow::Error> {
    use log::LevelFilter::{Error, Info, Off, Trace};

    let &LoggingArgs {
        verbose,
        simplify_log_format,
    } = options;

    simplelog::WriteLogger::init(
        if verbose { Trace } else { Info },
        simplelog::ConfigBuilder::new()
            .add_filter_allow_str("genblocks")
            .set_target_level(Off)
            .set_location_level(Off)
            .set_thread_level(Off)
            .set_time_level(if simplify_log_format { Off } else { Error })
            .build(),
        std::io::stderr(),
    )
    .context("failed to initialize logging")
}
