use ferrous_lookup_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        timeout_secs = config.client.timeout_secs,
        blocked_hostnames = config.network.block_hostnames.len(),
        blacklisted_ranges = config.network.blacklist_ips.len(),
        "Configuration loaded"
    );

    Ok(config)
}
