mod logger;
pub use logger::{LoggerConfig, LoggerError, LoggerFormat, logger_init};

#[cfg(feature = "progress")]
mod progress;
#[cfg(feature = "progress")]
pub use progress::ProgressLog;
