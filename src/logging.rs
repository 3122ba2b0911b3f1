#![cfg(feature = "std")]

use std::env;
use log::{self, LevelFilter, Metadata, Record};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // stdout belongs to the game prompts
            eprintln!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Level named by `var`, falling back to `info` when unset or unparsable.
pub fn level_from_env(var: &str) -> LevelFilter {
    env::var(var)
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Initialize logging with a level taken from the `BROADSIDE_LOG` environment variable.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let level = level_from_env("BROADSIDE_LOG");
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));
}
