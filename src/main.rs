//! synthprog - Programs nRF5340 development kits as synth or headset
//!
//! Flashes the prebuilt network core and application core images onto a
//! development kit through an attached probe:
//!
//! 1. recover the network core
//! 2. program the shared network core image
//! 3. program the application core image for the selected device and board
//! 4. reset the device
//!
//! The actual programming is done by a tool backend (normally `nrfjprog`),
//! selected with `--tool`.

mod cli;
mod commands;
mod tools;

use clap::Parser;
use cli::Cli;
use synthprog_core::image::ImageSet;

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Dispatch the parsed command line
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.list_tools {
        commands::list_tools();
        return Ok(());
    }

    let mut tool = tools::open_tool(&cli.tool)?;

    if cli.list_probes {
        return commands::list_probes(tool.as_mut());
    }

    let Some(device) = cli.device else {
        return Err("No device selected (use --device)".into());
    };
    commands::program::run_program(
        tool.as_mut(),
        device,
        cli.board,
        cli.snr,
        ImageSet::new(&cli.images),
    )
}
