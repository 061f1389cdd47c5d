use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "school-atlas.log";

/// Where tracing output goes
pub enum LogTarget {
    /// Plain commands: stderr at `info`
    Stderr,
    /// Full-screen commands: append to a file so the screen stays intact
    File(PathBuf),
}

/// Default log file under the per-user data directory
pub fn default_log_file() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "school-atlas")
        .context("Could not determine data directory")?;
    let dir = dirs.data_local_dir();
    fs::create_dir_all(dir).context("Failed to create data directory")?;
    Ok(dir.join(LOG_FILE))
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber; `RUST_LOG` overrides the level
pub fn init(target: LogTarget) -> Result<()> {
    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
