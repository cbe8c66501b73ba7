use flexi_logger::{FileSpec, Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;
use std::path::Path;

use crate::error::AppError;

const LOG_FILE_BASENAME: &str = "goalflow";

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

// Idempotent: repeated calls after a successful init are no-ops.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), AppError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(log_dir).map_err(|err| AppError::io(err.to_string()))?;

    let logger = Logger::try_with_str(level)
        .map_err(|err| AppError::invalid_data(format!("invalid log level '{level}': {err}")))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .append()
        .start()
        .map_err(|err| AppError::io(format!("failed to start logger: {err}")))?;

    if LOGGER.set(logger).is_ok() {
        info!("logging started at level {level}");
    }

    Ok(())
}

pub fn logging_active() -> bool {
    LOGGER.get().is_some()
}
