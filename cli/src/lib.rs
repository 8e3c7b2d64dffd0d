// Library root - exports for testing

pub mod args;
pub mod config;
pub mod report;

pub use args::{Args, RunOptions};
pub use config::Config;
pub use report::{render_event, DashboardView, EventDetail, Source};
