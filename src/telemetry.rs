use anyhow::{Context, Result};
use tracing::Level;

/// Install the global tracing subscriber and route `log` records into it.
///
/// Meant to be called once by the composing application. A second call
/// returns an error instead of replacing the installed subscriber.
pub fn init(max_level: Level) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("tracing subscriber already installed")?;

    // store and transport log through the `log` facade
    tracing_log::LogTracer::init().context("log bridge already installed")?;

    Ok(())
}
