//! Logging to stderr.

use log::LevelFilter;

use crate::config::LoggingConfig;
use crate::error::Result;

/// Parse a level name from the config, falling back to `Info`
pub fn level_filter(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}

/// Install a [`log`] global logger writing to stderr at the configured level.
pub fn install(config: &LoggingConfig) -> Result<()> {
    let level = level_filter(&config.level);
    simplelog::WriteLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .set_time_level(LevelFilter::Off)
            .build(),
        std::io::stderr(),
    )?;
    log::debug!("logging at {} level", level);
    Ok(())
}
