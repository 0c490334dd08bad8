//! Console logging built on log4rs. The kernel logs to stderr so drivers can
//! keep stdout for their own output.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use std::sync::Mutex;

static LOG_HANDLE: Mutex<Option<Handle>> = Mutex::new(None);

const LOG_PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l})} {t} - {m}{n}";

fn console_config(level: LevelFilter) -> Config {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .unwrap() // Will never panic; the config is static apart from the level
}

/// Installs the global logger at `level`, or reconfigures it if one is
/// already installed.
pub fn enable_logging(level: LevelFilter) {
    let mut handle = LOG_HANDLE.lock().unwrap();
    match handle.as_ref() {
        Some(existing) => existing.set_config(console_config(level)),
        None => {
            // init_config fails only when another global logger beat us to
            // registration, in which case there is nothing useful to do.
            if let Ok(new_handle) = log4rs::init_config(console_config(level)) {
                *handle = Some(new_handle);
            }
        }
    }
}

/// Adjusts the level of the installed logger, installing one if needed.
pub fn set_log_level(level: LevelFilter) {
    enable_logging(level);
}
