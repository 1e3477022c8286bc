//! nrfjprog invocation

use crate::error::{NrfjprogError, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use synthprog_core::probe::parse_ids;
use synthprog_core::tool::{Coprocessor, EraseMode, ProgrammerTool};

/// Default executable, looked up in `PATH`
pub const DEFAULT_PROGRAM: &str = "nrfjprog";

/// Device family of the nRF5340
pub const DEFAULT_FAMILY: &str = "NRF53";

/// nrfjprog configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NrfjprogConfig {
    /// Executable to run
    pub program: PathBuf,
    /// Value passed to `-f`
    pub family: String,
}

impl Default for NrfjprogConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            family: DEFAULT_FAMILY.to_string(),
        }
    }
}

impl NrfjprogConfig {
    /// Use a specific executable
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Use a different device family
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }
}

/// Parse programmer options into a config
///
/// Supported options:
/// - `path=<file>`: nrfjprog executable
/// - `family=<name>`: device family (default `NRF53`)
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<NrfjprogConfig, String> {
    let mut config = NrfjprogConfig::default();

    for (key, value) in options {
        match *key {
            "path" => {
                if value.is_empty() {
                    return Err("Empty path value".to_string());
                }
                config = config.with_program(*value);
            }
            "family" => {
                if value.is_empty() {
                    return Err("Empty family value".to_string());
                }
                config = config.with_family(value.to_uppercase());
            }
            _ => {
                log::warn!("nrfjprog: Unknown option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}

fn erase_flag(erase: EraseMode) -> &'static str {
    match erase {
        EraseMode::Sector => "--sectorerase",
        EraseMode::Chip => "--chiperase",
    }
}

/// Arguments for `--ids`
pub fn ids_args() -> Vec<OsString> {
    vec!["--ids".into()]
}

/// Arguments to recover `core`
pub fn recover_args(snr: u32, core: Coprocessor) -> Vec<OsString> {
    vec![
        "--recover".into(),
        "--coprocessor".into(),
        core.as_str().into(),
        "--snr".into(),
        snr.to_string().into(),
    ]
}

/// Arguments to program `image` into `core`
pub fn program_args(
    family: &str,
    snr: u32,
    core: Coprocessor,
    image: &Path,
    erase: EraseMode,
) -> Vec<OsString> {
    vec![
        "--program".into(),
        image.as_os_str().to_owned(),
        "-f".into(),
        family.into(),
        "-q".into(),
        "--snr".into(),
        snr.to_string().into(),
        erase_flag(erase).into(),
        "--coprocessor".into(),
        core.as_str().into(),
    ]
}

/// Arguments to reset the device
pub fn reset_args(snr: u32) -> Vec<OsString> {
    vec!["-r".into(), "--snr".into(), snr.to_string().into()]
}

/// Render a command line for messages
fn render(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The nrfjprog backend
pub struct Nrfjprog {
    config: NrfjprogConfig,
}

impl Nrfjprog {
    /// Create a backend with the given configuration
    pub fn new(config: NrfjprogConfig) -> Self {
        Self { config }
    }

    fn command(&self, args: &[OsString]) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(args);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> NrfjprogError {
        NrfjprogError::SpawnFailed {
            program: self.config.program.display().to_string(),
            source,
        }
    }

    /// Run with inherited stdio and check the exit status
    fn run(&self, args: Vec<OsString>) -> Result<()> {
        let command = render(&self.config.program, &args);
        log::debug!("Running: {}", command);

        let status = self
            .command(&args)
            .status()
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            log::debug!("{} exited with {}", command, status);
            return Err(NrfjprogError::CommandFailed {
                command,
                code: status.code(),
            });
        }
        Ok(())
    }

    /// Run and capture stdout
    fn output(&self, args: Vec<OsString>) -> Result<String> {
        let command = render(&self.config.program, &args);
        log::debug!("Running: {}", command);

        let output = self
            .command(&args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(NrfjprogError::CommandFailed {
                command,
                code: output.status.code(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| NrfjprogError::InvalidOutput)
    }
}

impl ProgrammerTool for Nrfjprog {
    fn name(&self) -> &str {
        "nrfjprog"
    }

    fn list_probes(&mut self) -> synthprog_core::Result<Vec<u32>> {
        let stdout = self.output(ids_args())?;
        log::trace!("nrfjprog --ids: {:?}", stdout);
        parse_ids(&stdout)
    }

    fn recover(&mut self, snr: u32, core: Coprocessor) -> synthprog_core::Result<()> {
        Ok(self.run(recover_args(snr, core))?)
    }

    fn program(
        &mut self,
        snr: u32,
        core: Coprocessor,
        image: &Path,
        erase: EraseMode,
    ) -> synthprog_core::Result<()> {
        Ok(self.run(program_args(&self.config.family, snr, core, image, erase))?)
    }

    fn reset(&mut self, snr: u32) -> synthprog_core::Result<()> {
        Ok(self.run(reset_args(snr))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_recover_args() {
        assert_eq!(
            strings(recover_args(960012345, Coprocessor::Network)),
            [
                "--recover",
                "--coprocessor",
                "CP_NETWORK",
                "--snr",
                "960012345",
            ]
        );
    }

    #[test]
    fn test_program_args() {
        let args = program_args(
            "NRF53",
            12,
            Coprocessor::Network,
            Path::new("bin/common_net.hex"),
            EraseMode::Sector,
        );
        assert_eq!(
            strings(args),
            [
                "--program",
                "bin/common_net.hex",
                "-f",
                "NRF53",
                "-q",
                "--snr",
                "12",
                "--sectorerase",
                "--coprocessor",
                "CP_NETWORK",
            ]
        );

        let args = program_args(
            "NRF53",
            12,
            Coprocessor::Application,
            Path::new("bin/headset_left_app.hex"),
            EraseMode::Chip,
        );
        let args = strings(args);
        assert!(args.contains(&"--chiperase".to_string()));
        assert_eq!(args.last().unwrap(), "CP_APPLICATION");
    }

    #[test]
    fn test_reset_and_ids_args() {
        assert_eq!(strings(reset_args(5)), ["-r", "--snr", "5"]);
        assert_eq!(strings(ids_args()), ["--ids"]);
    }

    #[test]
    fn test_render() {
        assert_eq!(
            render(Path::new("nrfjprog"), &reset_args(77)),
            "nrfjprog -r --snr 77"
        );
    }

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[]).unwrap();
        assert_eq!(config, NrfjprogConfig::default());

        let config = parse_options(&[("path", "/opt/nrfjprog"), ("family", "nrf53")]).unwrap();
        assert_eq!(config.program, PathBuf::from("/opt/nrfjprog"));
        assert_eq!(config.family, "NRF53");

        assert!(parse_options(&[("path", "")]).is_err());
        assert!(parse_options(&[("family", "")]).is_err());
        // unknown options are ignored
        assert!(parse_options(&[("speed", "4000")]).is_ok());
    }

    #[test]
    fn test_missing_executable() {
        let config = NrfjprogConfig::default().with_program("/nonexistent/synthprog/nrfjprog");
        let mut tool = Nrfjprog::new(config);
        assert!(matches!(
            tool.reset(1),
            Err(synthprog_core::Error::ToolSpawn { .. })
        ));
        assert!(matches!(
            tool.list_probes(),
            Err(synthprog_core::Error::ToolSpawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit() {
        let mut tool = Nrfjprog::new(NrfjprogConfig::default().with_program("false"));
        match tool.recover(3, Coprocessor::Network) {
            Err(synthprog_core::Error::ToolFailed { command, code }) => {
                assert!(command.starts_with("false --recover"));
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut tool = Nrfjprog::new(NrfjprogConfig::default().with_program("true"));
        assert!(tool.reset(3).is_ok());
        assert!(tool.list_probes().unwrap().is_empty());
    }
}
