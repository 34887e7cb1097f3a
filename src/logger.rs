use crate::config::LogConfig;
use env_logger::{Builder, Env};

/// `RUST_LOG` wins over the configured default level.
pub fn init(config: &LogConfig) {
    Builder::from_env(Env::default().default_filter_or(config.level.as_str()))
        .format_timestamp(None)
        .init();
}
