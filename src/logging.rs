use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use std::path::Path;

/// Starts the global logger.
///
/// `RUST_LOG` overrides `level` when set. Without a directory, records go to stderr;
/// with one, they go to size-rotated files there.
pub fn setup_logging(level: &str, log_dir: Option<&Path>) -> crate::Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(level)?;

    let handle = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir).basename("uct_bot"))
            .format(flexi_logger::opt_format)
            .rotate(
                Criterion::Size(10 * 1024 * 1024), // Rotate logs after they reach 10 MB
                Naming::Numbers,
                Cleanup::KeepLogFiles(3),
            )
            .start()?,
        None => logger
            .format(flexi_logger::colored_default_format)
            .start()?,
    };

    Ok(handle)
}
