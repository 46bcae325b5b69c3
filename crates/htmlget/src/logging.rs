use anyhow::{Context, anyhow};
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `filter` uses `EnvFilter` directive syntax.
pub fn init(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter).with_context(|| format!("invalid log filter '{filter}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
