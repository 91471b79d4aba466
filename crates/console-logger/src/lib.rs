//! Console Logger
//!
//! `log` backend for the browser console, one timestamped line per record.

use std::sync::OnceLock;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

struct ConsoleLogger {
    app_name: String,
    level: LevelFilter,
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        let line = format_line(&timestamp, record.level(), &self.app_name, &record.args().to_string());
        emit(record.level(), &line);
    }

    fn flush(&self) {}
}

/// Install the logger. Call once from `main`.
pub fn init_logger(app_name: &str, level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| ConsoleLogger {
        app_name: app_name.to_string(),
        level,
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

fn format_line(timestamp: &str, level: Level, app_name: &str, message: &str) -> String {
    format!("{} {:<5} {}: {}", timestamp, level, app_name, message)
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug => web_sys::console::log_1(&value),
        Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}
