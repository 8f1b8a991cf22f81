// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod chime;
pub mod config;
pub mod curve;
pub mod durations;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod scheduler;
pub mod tasks;
pub mod timer;
pub mod ui;
pub mod view;

pub use app::{App, Control, InputMode};
pub use durations::{BreakChoice, SessionLength};
pub use error::FlowError;
