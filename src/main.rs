use std::io;

use anyhow::Context;
use lorenz_viewer::prompt::read_startup;
use lorenz_viewer::Simulation;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let startup = read_startup(io::stdin().lock(), io::stdout()).context("Failed to read startup values")?;

    let Some(mode) = startup.mode else {
        println!("exiting...");
        return Ok(());
    };

    Simulation::new(startup.seed, mode)
        .run()
        .context("Session failed")
}
