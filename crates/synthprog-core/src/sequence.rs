//! The flashing sequence
//!
//! Provisioning always runs the same four steps against a single probe:
//!
//! 1. recover (erase) the network core
//! 2. program the shared network core image
//! 3. program the target's application core image
//! 4. reset the device
//!
//! The first failing step aborts the sequence. Nothing is rolled back and
//! nothing is retried.

use crate::error::{Error, Result};
use crate::image::ImageSet;
use crate::probe;
use crate::target::Target;
use crate::tool::{Coprocessor, EraseMode, ProgrammerTool};
use std::fmt;
use std::io::{BufRead, Write};

/// One step of the flashing sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Recover the network core
    RecoverNetCore,
    /// Program the network core image
    ProgramNetCore,
    /// Program the application core image
    ProgramAppCore,
    /// Reset the device
    Reset,
}

impl Step {
    /// All steps in execution order
    pub const SEQUENCE: [Step; 4] = [
        Step::RecoverNetCore,
        Step::ProgramNetCore,
        Step::ProgramAppCore,
        Step::Reset,
    ];

    /// Progress message shown while the step runs
    pub fn description(&self) -> &'static str {
        match self {
            Self::RecoverNetCore => "Erasing net core",
            Self::ProgramNetCore => "Programming net core",
            Self::ProgramAppCore => "Programming app core",
            Self::Reset => "Restarting device",
        }
    }

    /// Reason reported when the step fails
    pub fn failure(&self) -> &'static str {
        match self {
            Self::RecoverNetCore => "failed to erase net core",
            Self::ProgramNetCore => "failed to program net core",
            Self::ProgramAppCore => "failed to program app core",
            Self::Reset => "failed to restart device",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Progress callbacks for [`FlashPlan::run`]
pub trait StepProgress {
    /// Called before `step` runs; `index` is 0-based, out of `total`
    fn started(&mut self, step: Step, index: usize, total: usize);

    /// Called after `step` succeeded
    fn finished(&mut self, step: Step);

    /// Called when `step` failed; no further callbacks follow
    fn failed(&mut self, step: Step, error: &Error);
}

/// A no-op progress reporter
pub struct NoProgress;

impl StepProgress for NoProgress {
    fn started(&mut self, _step: Step, _index: usize, _total: usize) {}
    fn finished(&mut self, _step: Step) {}
    fn failed(&mut self, _step: Step, _error: &Error) {}
}

/// The sequence for one probe and target
#[derive(Debug, Clone)]
pub struct FlashPlan {
    snr: u32,
    target: Target,
    images: ImageSet,
}

impl FlashPlan {
    /// Plan flashing `target` through probe `snr`
    pub fn new(snr: u32, target: Target, images: ImageSet) -> Self {
        Self {
            snr,
            target,
            images,
        }
    }

    /// Probe serial number
    pub fn snr(&self) -> u32 {
        self.snr
    }

    /// Target being flashed
    pub fn target(&self) -> Target {
        self.target
    }

    /// Run every step in order, stopping at the first failure
    pub fn run<T, P>(&self, tool: &mut T, progress: &mut P) -> Result<()>
    where
        T: ProgrammerTool + ?Sized,
        P: StepProgress + ?Sized,
    {
        let total = Step::SEQUENCE.len();
        for (index, step) in Step::SEQUENCE.into_iter().enumerate() {
            progress.started(step, index, total);
            log::debug!("{} ({}/{}) via {}", step, index + 1, total, tool.name());

            if let Err(e) = self.run_step(tool, step) {
                progress.failed(step, &e);
                return Err(Error::StepFailed {
                    step,
                    source: Box::new(e),
                });
            }

            progress.finished(step);
        }
        Ok(())
    }

    fn run_step<T: ProgrammerTool + ?Sized>(&self, tool: &mut T, step: Step) -> Result<()> {
        match step {
            Step::RecoverNetCore => tool.recover(self.snr, Coprocessor::Network),
            Step::ProgramNetCore => tool.program(
                self.snr,
                Coprocessor::Network,
                &self.images.net_core(),
                EraseMode::Sector,
            ),
            Step::ProgramAppCore => tool.program(
                self.snr,
                Coprocessor::Application,
                &self.images.app_core(self.target),
                EraseMode::Chip,
            ),
            Step::Reset => tool.reset(self.snr),
        }
    }
}

/// What to flash, before a probe has been chosen
#[derive(Debug, Clone)]
pub struct FlashRequest {
    /// Target to flash
    pub target: Target,
    /// Where the images live
    pub images: ImageSet,
    /// Probe serial number, if given on the command line
    pub snr: Option<u32>,
    /// Skip the image existence check
    pub skip_image_check: bool,
}

impl FlashRequest {
    /// Request flashing `target` from `images` on any probe
    pub fn new(target: Target, images: ImageSet) -> Self {
        Self {
            target,
            images,
            snr: None,
            skip_image_check: false,
        }
    }

    /// Use the probe with serial number `snr`
    pub fn with_snr(mut self, snr: Option<u32>) -> Self {
        self.snr = snr;
        self
    }
}

/// Resolve a probe and run the full sequence
///
/// `input`/`output` are only used when several probes are connected and
/// none was requested. Returns the serial number of the flashed probe.
pub fn provision<T, R, W, P>(
    tool: &mut T,
    request: &FlashRequest,
    input: R,
    output: W,
    progress: &mut P,
) -> Result<u32>
where
    T: ProgrammerTool + ?Sized,
    R: BufRead,
    W: Write,
    P: StepProgress + ?Sized,
{
    if !request.skip_image_check {
        request.images.check(request.target)?;
    }

    let probes = tool.list_probes()?;
    log::debug!("{} probe(s) connected: {:?}", probes.len(), probes);

    let snr = probe::select_probe(&probes, request.snr, input, output)?;
    let plan = FlashPlan::new(snr, request.target, request.images.clone());
    log::info!("Programming of {} with {} started", plan.target(), plan.snr());

    plan.run(tool, progress)?;
    Ok(plan.snr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{Board, Channel};
    use std::io::Cursor;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List,
        Recover(u32, Coprocessor),
        Program(u32, Coprocessor, PathBuf, EraseMode),
        Reset(u32),
    }

    /// Records calls; fails the call with index `fail_at`
    struct MockTool {
        probes: Vec<u32>,
        calls: Vec<Call>,
        fail_at: Option<usize>,
    }

    impl MockTool {
        fn new(probes: &[u32]) -> Self {
            Self {
                probes: probes.to_vec(),
                calls: Vec::new(),
                fail_at: None,
            }
        }

        fn record(&mut self, call: Call) -> Result<()> {
            self.calls.push(call);
            if self.fail_at == Some(self.calls.len() - 1) {
                return Err(Error::ToolFailed {
                    command: "mock".to_string(),
                    code: Some(33),
                });
            }
            Ok(())
        }
    }

    impl ProgrammerTool for MockTool {
        fn name(&self) -> &str {
            "mock"
        }

        fn list_probes(&mut self) -> Result<Vec<u32>> {
            self.record(Call::List)?;
            Ok(self.probes.clone())
        }

        fn recover(&mut self, snr: u32, core: Coprocessor) -> Result<()> {
            self.record(Call::Recover(snr, core))
        }

        fn program(
            &mut self,
            snr: u32,
            core: Coprocessor,
            image: &Path,
            erase: EraseMode,
        ) -> Result<()> {
            self.record(Call::Program(snr, core, image.to_path_buf(), erase))
        }

        fn reset(&mut self, snr: u32) -> Result<()> {
            self.record(Call::Reset(snr))
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Vec<String>,
    }

    impl StepProgress for RecordingProgress {
        fn started(&mut self, step: Step, index: usize, total: usize) {
            self.events.push(format!("start {} {}/{}", step, index, total));
        }

        fn finished(&mut self, step: Step) {
            self.events.push(format!("done {}", step));
        }

        fn failed(&mut self, step: Step, _error: &Error) {
            self.events.push(format!("fail {}", step));
        }
    }

    fn request(target: Target) -> FlashRequest {
        FlashRequest {
            skip_image_check: true,
            ..FlashRequest::new(target, ImageSet::new("bin"))
        }
    }

    #[test]
    fn test_plan_runs_all_steps_in_order() {
        let mut tool = MockTool::new(&[]);
        let plan = FlashPlan::new(7, Target::Synth(Board::Nrf5340Dk), ImageSet::new("img"));
        plan.run(&mut tool, &mut NoProgress).unwrap();

        assert_eq!(
            tool.calls,
            vec![
                Call::Recover(7, Coprocessor::Network),
                Call::Program(
                    7,
                    Coprocessor::Network,
                    Path::new("img").join("common_net.hex"),
                    EraseMode::Sector,
                ),
                Call::Program(
                    7,
                    Coprocessor::Application,
                    Path::new("img").join("synth_dk_app.hex"),
                    EraseMode::Chip,
                ),
                Call::Reset(7),
            ]
        );
    }

    #[test]
    fn test_failure_halts_sequence() {
        for (fail_at, step) in Step::SEQUENCE.into_iter().enumerate() {
            let mut tool = MockTool::new(&[]);
            tool.fail_at = Some(fail_at);
            let mut progress = RecordingProgress::default();
            let plan = FlashPlan::new(1, Target::Headset(Channel::Left), ImageSet::default());

            match plan.run(&mut tool, &mut progress) {
                Err(Error::StepFailed {
                    step: failed,
                    source,
                }) => {
                    assert_eq!(failed, step);
                    assert_eq!(source.to_string(), "`mock` exited with status 33");
                }
                other => panic!("unexpected result: {:?}", other),
            }

            assert_eq!(tool.calls.len(), fail_at + 1);
            assert_eq!(progress.events.last().unwrap(), &format!("fail {}", step));
            assert_eq!(progress.events.len(), 2 * fail_at + 2);
        }
    }

    #[test]
    fn test_step_failure_message() {
        let err = Error::StepFailed {
            step: Step::ProgramAppCore,
            source: Box::new(Error::ToolFailed {
                command: "nrfjprog -r --snr 1".to_string(),
                code: Some(2),
            }),
        };
        assert_eq!(
            err.to_string(),
            "failed to program app core: `nrfjprog -r --snr 1` exited with status 2"
        );
    }

    #[test]
    fn test_provision_no_probe_never_flashes() {
        let mut tool = MockTool::new(&[]);
        let result = provision(
            &mut tool,
            &request(Target::Headset(Channel::Right)),
            Cursor::new(""),
            Vec::new(),
            &mut NoProgress,
        );
        assert!(matches!(result, Err(Error::NoDevice)));
        assert_eq!(tool.calls, vec![Call::List]);
    }

    #[test]
    fn test_provision_single_probe() {
        let mut tool = MockTool::new(&[960001111]);
        let mut out = Vec::new();
        let snr = provision(
            &mut tool,
            &request(Target::Synth(Board::Nrf5340AudioDk)),
            Cursor::new(""),
            &mut out,
            &mut NoProgress,
        )
        .unwrap();

        assert_eq!(snr, 960001111);
        assert!(out.is_empty());
        assert_eq!(tool.calls.len(), 5);
        assert_eq!(
            tool.calls[3],
            Call::Program(
                960001111,
                Coprocessor::Application,
                Path::new("bin").join("synth_audio_dk_app.hex"),
                EraseMode::Chip,
            )
        );
        assert_eq!(tool.calls[4], Call::Reset(960001111));
    }

    #[test]
    fn test_provision_prompts_for_probe() {
        let mut tool = MockTool::new(&[10, 20, 30]);
        let mut out = Vec::new();
        let snr = provision(
            &mut tool,
            &request(Target::Headset(Channel::Left)),
            Cursor::new("4\n2\n"),
            &mut out,
            &mut NoProgress,
        )
        .unwrap();

        assert_eq!(snr, 20);
        assert_eq!(tool.calls[1], Call::Recover(20, Coprocessor::Network));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Invalid selection '4'"));
    }

    #[test]
    fn test_provision_requested_probe() {
        let mut tool = MockTool::new(&[10, 20]);
        let req = request(Target::Headset(Channel::Right)).with_snr(Some(10));
        let mut progress = RecordingProgress::default();
        let snr = provision(
            &mut tool,
            &req,
            Cursor::new(""),
            Vec::new(),
            &mut progress,
        )
        .unwrap();
        assert_eq!(snr, 10);
        assert_eq!(progress.events[0], "start Erasing net core 0/4");
        assert_eq!(tool.calls[4], Call::Reset(10));
    }

    #[test]
    fn test_provision_missing_image_never_lists() {
        let mut tool = MockTool::new(&[10]);
        let req = FlashRequest::new(
            Target::Headset(Channel::Left),
            ImageSet::new("/nonexistent/synthprog/images"),
        );
        let result = provision(
            &mut tool,
            &req,
            Cursor::new(""),
            Vec::new(),
            &mut NoProgress,
        );
        assert!(matches!(result, Err(Error::ImageMissing(_))));
        assert!(tool.calls.is_empty());
    }
}
