mod error;
mod font;
mod models;
mod render;
mod utils;

use crate::models::IconSet;
use crate::utils::generate_icons;
use chrono::Local;
use std::fmt;
use tracing_subscriber::{
    Registry,
    filter::LevelFilter,
    fmt::{format::Writer, layer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log timestamps from the local wall clock.
struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

fn setup_logger() -> Result<(), Box<dyn std::error::Error>> {
    Registry::default()
        .with(LevelFilter::INFO)
        .with(
            layer()
                .with_target(false)
                .with_timer(LocalClock)
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger()?;
    generate_icons(&IconSet::default())?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
