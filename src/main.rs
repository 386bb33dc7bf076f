mod app;
mod audio;
mod border;
mod clock;
mod config;
mod drag;
mod hotkeys;
mod logging;
mod theme;
mod timer;
mod views;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    logging::init();
    app::run().context("overlay window failed")
}
