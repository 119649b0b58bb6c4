// terminal logger set up shared by the binary and the task loader

use log::{LevelFilter, info};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use std::str::FromStr;

/// Level filter from its name: `off` (or `none`), `error`, `warn`, `info`, `debug`, `trace`.
/// Case is ignored.
pub fn level_from_name(name: &str) -> Option<LevelFilter> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("none") {
        return Some(LevelFilter::Off);
    }
    LevelFilter::from_str(name).ok()
}

/// Starts a terminal logger with the given level. Returns `false` when logging is off or when
/// a logger was installed before; the earlier logger then stays in charge.
pub fn init_logger(level: LevelFilter) -> bool {
    if level == LevelFilter::Off {
        return false;
    }
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    match logger_instance {
        Ok(()) => {
            info!("logger started with level {}", level);
            true
        }
        Err(_) => false,
    }
}
