//! Logging: process-wide tracing setup and the per-request MCP logger.
//!
//! [`init_tracing`] installs the stderr/stdout/file subscriber for the binary.
//! [`Logger`] writes through tracing and, when a client is connected, also
//! forwards the message with `notifications/message`, filtered by a level the
//! client can change via `logging/setLevel`.

use anyhow::Result;
use rmcp::{
    RoleServer,
    model::{LoggingLevel, LoggingMessageNotificationParam},
    service::Peer,
};
use serde_json::{Value, json};
use std::fs::OpenOptions;
use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber.
///
/// `target` is `0`/`off`, `1`/`stdout`, `2`/`stderr`, or a file path to append to.
pub fn init_tracing(target: &str, verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    match target {
        "0" | "off" => {}
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}

/// Atomic level filter that can be adjusted via `logging/setLevel`.
pub struct LogLevelFilter(AtomicU8);

impl LogLevelFilter {
    pub fn new(level: LoggingLevel) -> Self {
        Self(AtomicU8::new(level_to_u8(level)))
    }

    pub fn get(&self) -> LoggingLevel {
        u8_to_level(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, level: LoggingLevel) {
        self.0.store(level_to_u8(level), Ordering::Relaxed);
    }

    pub fn should_log(&self, level: LoggingLevel) -> bool {
        level_to_u8(level) >= self.0.load(Ordering::Relaxed)
    }
}

impl Default for LogLevelFilter {
    fn default() -> Self {
        Self::new(LoggingLevel::Info)
    }
}

fn level_to_u8(level: LoggingLevel) -> u8 {
    match level {
        LoggingLevel::Debug => 0,
        LoggingLevel::Info => 1,
        LoggingLevel::Notice => 2,
        LoggingLevel::Warning => 3,
        LoggingLevel::Error => 4,
        LoggingLevel::Critical => 5,
        LoggingLevel::Alert => 6,
        LoggingLevel::Emergency => 7,
    }
}

fn u8_to_level(val: u8) -> LoggingLevel {
    match val {
        0 => LoggingLevel::Debug,
        1 => LoggingLevel::Info,
        2 => LoggingLevel::Notice,
        3 => LoggingLevel::Warning,
        4 => LoggingLevel::Error,
        5 => LoggingLevel::Critical,
        6 => LoggingLevel::Alert,
        _ => LoggingLevel::Emergency,
    }
}

/// Map an MCP level onto the closest tracing level.
pub fn logging_level_to_tracing(level: LoggingLevel) -> Level {
    match level {
        LoggingLevel::Debug => Level::DEBUG,
        LoggingLevel::Info | LoggingLevel::Notice => Level::INFO,
        LoggingLevel::Warning => Level::WARN,
        LoggingLevel::Error
        | LoggingLevel::Critical
        | LoggingLevel::Alert
        | LoggingLevel::Emergency => Level::ERROR,
    }
}

/// Logger for one tool call.
#[derive(Clone, Default)]
pub struct Logger {
    peer: Option<Peer<RoleServer>>,
    level_filter: Arc<LogLevelFilter>,
    name: Option<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_peer(mut self, peer: Peer<RoleServer>) -> Self {
        self.peer = Some(peer);
        self
    }

    pub fn with_level_filter(mut self, filter: Arc<LogLevelFilter>) -> Self {
        self.level_filter = filter;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Log to tracing and, if connected, to the client.
    pub fn log(&self, level: LoggingLevel, message: &str, data: Option<Value>) {
        if !self.level_filter.should_log(level) {
            return;
        }

        let logger = self.name.as_deref().unwrap_or("taskdoc");
        match logging_level_to_tracing(level) {
            Level::ERROR => tracing::error!(logger, "{}", message),
            Level::WARN => tracing::warn!(logger, "{}", message),
            Level::INFO => tracing::info!(logger, "{}", message),
            Level::DEBUG => tracing::debug!(logger, "{}", message),
            Level::TRACE => tracing::trace!(logger, "{}", message),
        }

        if let Some(ref peer) = self.peer {
            let param = LoggingMessageNotificationParam {
                level,
                logger: self.name.clone(),
                data: data.unwrap_or_else(|| json!({ "message": message })),
            };
            let peer = peer.clone();
            tokio::spawn(async move {
                let _ = peer.notify_logging_message(param).await;
            });
        }
    }

    pub fn debug(&self, msg: &str) {
        self.log(LoggingLevel::Debug, msg, None);
    }

    pub fn info(&self, msg: &str) {
        self.log(LoggingLevel::Info, msg, None);
    }

    pub fn warning(&self, msg: &str) {
        self.log(LoggingLevel::Warning, msg, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filter_threshold() {
        let filter = LogLevelFilter::new(LoggingLevel::Warning);

        assert!(!filter.should_log(LoggingLevel::Debug));
        assert!(!filter.should_log(LoggingLevel::Info));
        assert!(filter.should_log(LoggingLevel::Warning));
        assert!(filter.should_log(LoggingLevel::Emergency));

        filter.set(LoggingLevel::Debug);
        assert!(filter.should_log(LoggingLevel::Debug));
        assert_eq!(filter.get(), LoggingLevel::Debug);
    }

    #[test]
    fn level_mapping() {
        assert_eq!(logging_level_to_tracing(LoggingLevel::Notice), Level::INFO);
        assert_eq!(logging_level_to_tracing(LoggingLevel::Warning), Level::WARN);
        assert_eq!(logging_level_to_tracing(LoggingLevel::Alert), Level::ERROR);
    }

    #[test]
    fn logger_without_peer_does_not_panic() {
        let logger = Logger::new().with_name("test");
        logger.info("hello");
        logger.debug("filtered out by default");
    }
}
