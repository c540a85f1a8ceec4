//! Logging setup for the CLI and embedding hosts.
//!
//! `tracing` events go to stderr through a compact `fmt` subscriber. The
//! filter comes from `RUST_LOG` when set, otherwise from the `tracing` block of
//! the generator config, e.g.
//!
//! ```json
//! "tracing": { "level": "info", "modules": { "dungeon_core::legacy": "warn" } }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        })
    }
}

/// `tracing` block of the generator config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Level for every target without its own entry
    pub level: LogLevel,
    /// Per-target overrides, keyed by module path
    pub modules: BTreeMap<String, LogLevel>,
    pub show_targets: bool,
    pub show_thread_ids: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let modules = [
            ("dungeon_core::generation", LogLevel::Info),
            ("dungeon_core::legacy", LogLevel::Warn),
            ("dungeon_core::navigation", LogLevel::Warn),
        ]
        .into_iter()
        .map(|(target, level)| (target.to_string(), level))
        .collect();

        Self {
            level: LogLevel::Info,
            modules,
            show_targets: true,
            show_thread_ids: false,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    /// Apply a `-v` count: one raises everything to debug, two or more to
    /// trace. Per-module entries are lowered to match, never raised.
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        let floor = match verbose {
            0 => return self,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        self.level = self.level.min(floor);
        for level in self.modules.values_mut() {
            *level = (*level).min(floor);
        }
        self
    }

    /// `EnvFilter` directive string, e.g. `info,dungeon_core::legacy=warn`
    pub fn directives(&self) -> String {
        std::iter::once(self.level.to_string())
            .chain(self.modules.iter().map(|(target, level)| format!("{target}={level}")))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
        EnvFilter::try_new(self.directives())
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Only the first call has any effect, and a
/// subscriber already installed by the host is left alone.
pub fn init_tracing(config: &TracingConfig) {
    TRACING_INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(config.env_filter())
            .with_writer(std::io::stderr)
            .with_target(config.show_targets)
            .with_thread_ids(config.show_thread_ids)
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .compact();
        let _ = subscriber.try_init();
    });
}

/// Keeps an `operation` span entered until dropped
pub struct TimingSpan {
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(name: &str) -> Self {
        Self {
            _span: tracing::info_span!("operation", name).entered(),
        }
    }
}
