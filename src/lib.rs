//! Rotate the desktop wallpaper through a directory of images, keeping the
//! current position in a small settings file between runs.

pub mod apply;
pub mod commands;
pub mod config;
pub mod error;
pub mod selector;
pub mod settings;
pub mod wallpapers;

use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout only carries command output. `RUST_LOG`
/// overrides the default `warn` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
