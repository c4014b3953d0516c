use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the marker file the mosaic publisher touches after
/// writing new imagery under the web root.
pub const DEFAULT_TRIGGER_PATH: &str = "/var/www/goes/.trigger";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: String,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8090)]
    pub port: u16,

    /// Path of the marker file whose modification time signals new content
    #[arg(short, long, env, default_value = DEFAULT_TRIGGER_PATH)]
    trigger_path: PathBuf,

    /// How often, in milliseconds, the marker file's modification time is checked
    #[arg(
        long,
        env,
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_millis: u64,

    /// Seconds between SSE keep-alive comments sent to idle clients (0 disables them)
    #[arg(long, env, default_value_t = 15)]
    pub sse_keep_alive_secs: u64,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn trigger_path(&self) -> &Path {
        &self.trigger_path
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }

    /// Returns the keep-alive interval for SSE streams, or `None` when disabled.
    pub fn sse_keep_alive(&self) -> Option<Duration> {
        match self.sse_keep_alive_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// The `interface:port` pair the server binds to.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.interface, self.port)
    }
}
