use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// Build a logger that appends to `path`.
///
/// The terminal belongs to the TUI while a test runs, so nothing is ever
/// written to stderr. If the file cannot be opened, log output is discarded.
pub fn builder(path: Option<&Path>) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp_millis();

    let target: Box<dyn io::Write + Send> = match path.map(open_log_file) {
        Some(Ok(file)) => Box::new(file),
        _ => Box::new(io::sink()),
    };
    builder.target(Target::Pipe(target));
    builder
}

/// Install the file logger. Calling it twice is harmless.
pub fn init(path: Option<&Path>) {
    let _ = builder(path).try_init();
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;
    use tempfile::tempdir;

    #[test]
    fn log_lines_land_in_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("chaabi.log");

        let logger = builder(Some(path.as_path()))
            .filter_level(log::LevelFilter::Debug)
            .build();
        logger.log(
            &log::Record::builder()
                .args(format_args!("session started"))
                .level(log::Level::Info)
                .target("chaabi")
                .build(),
        );
        logger.flush();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("session started"));
    }

    #[test]
    fn unwritable_path_falls_back_to_sink() {
        let dir = tempdir().unwrap();
        // a directory can't be opened as the log file
        let logger = builder(Some(dir.path())).build();
        logger.log(
            &log::Record::builder()
                .args(format_args!("nowhere to go"))
                .level(log::Level::Warn)
                .target("chaabi")
                .build(),
        );
        logger.flush();

        assert!(dir.path().is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
