//! Logging to the terminal.
//!
//! The level is read from the `CURVY_LOG` environment variable, which accepts `off`, `error`,
//! `warn`, `info`, `debug` and `trace`. The default level is `warn`.

use log::LevelFilter;
use simplelog::{ColorChoice, Config, ConfigBuilder, TermLogger, TerminalMode};
use std::env;

/// The environment variable that sets the log level.
const LOG_LEVEL_VAR: &str = "CURVY_LOG";

/// Returns the log level requested by the environment, falling back to `warn` if it is unset or
/// invalid.
fn level_from_env() -> LevelFilter {
    match env::var(LOG_LEVEL_VAR) {
        Ok(level) => level.trim().parse().unwrap_or_else(|_| {
            eprintln!("invalid {} level `{}`, using `warn`", LOG_LEVEL_VAR, level);
            LevelFilter::Warn
        }),
        Err(_) => LevelFilter::Warn,
    }
}

fn config() -> Config {
    ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build()
}

/// Initializes the terminal logger. Log messages go to stderr, so they never mix with the
/// analysis printed to stdout.
pub fn init() {
    let level = level_from_env();
    if let Err(err) = TermLogger::init(level, config(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("could not initialize logging: {}", err);
    }
}
