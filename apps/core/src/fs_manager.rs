use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

pub struct PortablePathManager;

impl PortablePathManager {
    /// Root directory of the application: next to the executable.
    pub fn root_dir() -> PathBuf {
        let exe_dir = match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path
            }
            Err(e) => {
                error!(
                    "Failed to get current exe path: {}. Falling back to current_dir.",
                    e
                );
                return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            }
        };

        #[cfg(debug_assertions)]
        {
            // Debug builds run from target/debug at the workspace root; point at apps/core.
            if let Some(workspace) = exe_dir.parent().and_then(|p| p.parent()) {
                let core_path = workspace.join("apps").join("core");
                if core_path.exists() {
                    return core_path;
                }
            }
        }

        exe_dir
    }

    /// Main data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }

    /// Database directory (./data/db).
    pub fn db_dir() -> PathBuf {
        Self::data_dir().join("db")
    }

    /// Creates the data and db directories if they do not exist.
    pub fn init() -> Result<(), std::io::Error> {
        for dir in [Self::data_dir(), Self::db_dir()] {
            if !dir.exists() {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}
