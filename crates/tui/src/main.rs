mod app;
mod background;

use anyhow::Result;
use std::fs::{self, OpenOptions};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::background::MenuBackground;

fn main() -> Result<()> {
    init_logging()?;

    let background = MenuBackground::generate();
    let mut app = app::LesnyApp::new(background);
    app.run()
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("lesny.log");

    let env_filter = EnvFilter::from_default_env();

    // The alternate screen owns stdout, so everything goes to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
