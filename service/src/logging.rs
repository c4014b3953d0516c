//! Terminal logging for the service.
//!
//! Everything logs through the `log` facade; this module installs the
//! simplelog backend once at start-up.

use crate::config::Config;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// HTTP stack crates that log every accepted socket and polled body.
/// Their records only show up at `TRACE`.
const HTTP_STACK_MODULES: &[&str] = &["hyper", "axum", "tower", "tracing", "mio"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the configured level.
    ///
    /// Panics if a logger has already been installed.
    pub fn init_logger(config: &Config) {
        let level = config.log_level_filter;

        TermLogger::init(
            level,
            Self::build_log_config(level),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    fn quiets_http_stack(level: LevelFilter) -> bool {
        level < LevelFilter::Trace
    }

    // RFC 3339 timestamps so lines line up with the web server's access log.
    fn build_log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if Self::quiets_http_stack(level) {
            for module in HTTP_STACK_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
