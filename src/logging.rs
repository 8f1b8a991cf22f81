use std::fs::{self, OpenOptions};
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::error::{FlowError, Result};

/// Send `log` output to `path`, appending. Level comes from `RUST_LOG`, default `info`.
pub fn init_file_logger(path: &Path) -> Result<()> {
    let io_err = |source: std::io::Error| FlowError::Log {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;

    // A second init (tests, repeated calls) keeps the first logger.
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    Ok(())
}
