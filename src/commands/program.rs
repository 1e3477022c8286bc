//! Program command implementation

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use synthprog_core::image::ImageSet;
use synthprog_core::sequence::{self, FlashRequest, Step, StepProgress};
use synthprog_core::target::{Board, Device, Target};
use synthprog_core::tool::ProgrammerTool;
use synthprog_core::Error;

/// Create a standard spinner style
fn create_spinner_style() -> Result<ProgressStyle, Box<dyn std::error::Error>> {
    Ok(ProgressStyle::default_spinner().template("{spinner:.green} {prefix:.bold.dim} {msg}")?)
}

/// Progress reporter with one spinner per step
pub struct IndicatifProgress {
    current: Option<ProgressBar>,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        Self { current: None }
    }
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl StepProgress for IndicatifProgress {
    fn started(&mut self, step: Step, index: usize, total: usize) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(create_spinner_style().unwrap_or_else(|_| ProgressStyle::default_spinner()));
        pb.set_prefix(format!("[{}/{}]", index + 1, total));
        pb.set_message(format!("{}...", step.description()));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.current = Some(pb);
    }

    fn finished(&mut self, step: Step) {
        if let Some(pb) = self.current.take() {
            pb.finish_with_message(format!("{} done", step.description()));
        }
    }

    fn failed(&mut self, step: Step, _error: &Error) {
        if let Some(pb) = self.current.take() {
            pb.abandon_with_message(step.failure());
        }
    }
}

/// Run the program command
pub fn run_program(
    tool: &mut dyn ProgrammerTool,
    device: Device,
    board: Option<Board>,
    snr: Option<u32>,
    images: ImageSet,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = Target::from_parts(device, board)?;
    println!(
        "Programming {} using {} (images from {})",
        target,
        tool.name(),
        images.dir().display()
    );
    let request = FlashRequest::new(target, images).with_snr(snr);

    let stdin = std::io::stdin();
    let mut progress = IndicatifProgress::new();
    let snr = sequence::provision(
        tool,
        &request,
        stdin.lock(),
        std::io::stdout(),
        &mut progress,
    )?;

    println!("Programmed {} on probe {} successfully!", target, snr);
    Ok(())
}
