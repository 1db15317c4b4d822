// src/logging.rs
// =============================================================================
// Sets up `tracing` output.
//
// Logs always go to stderr: stdout carries the progress lines and the report
// (or the JSON document with --json), and must stay clean for piping.
//
// RUST_LOG is honored first; the -v flags add a directive for this crate.
// =============================================================================

use anyhow::Result;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the logging system
///
/// verbosity: 0 = warnings only, 1 = info, 2+ = debug
pub fn init_logging(verbosity: u8) -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(crate_directive(verbosity).parse()?);

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn crate_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "link_check=warn",
        1 => "link_check=info",
        _ => "link_check=debug",
    }
}
