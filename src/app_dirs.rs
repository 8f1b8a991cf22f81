use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the log file goes; the terminal itself is taken by the UI.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("flowtimer");
            Some(state_dir.join("flowtimer.log"))
        } else {
            ProjectDirs::from("", "", "flowtimer")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("flowtimer.log"))
        }
    }
}
