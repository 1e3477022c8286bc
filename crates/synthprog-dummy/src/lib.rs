//! synthprog-dummy - In-memory programming tool for testing
//!
//! This crate provides a programming tool that pretends a number of probes
//! are attached. It records every operation and can be told to fail one of
//! them, which makes it useful for exercising the flashing sequence without
//! hardware.

use std::path::{Path, PathBuf};
use synthprog_core::tool::{Coprocessor, EraseMode, ProgrammerTool};
use synthprog_core::{Error, Result};

/// First serial number reported by the dummy tool
pub const FIRST_SERIAL: u32 = 960_000_001;

/// Largest number of probes the dummy tool will pretend to have
pub const MAX_PROBES: u32 = 64;

/// Operation that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Probe listing
    List,
    /// Network core recovery
    Recover,
    /// Network core programming
    ProgramNet,
    /// Application core programming
    ProgramApp,
    /// Device reset
    Reset,
}

impl Operation {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "list" => Some(Self::List),
            "recover" => Some(Self::Recover),
            "program-net" => Some(Self::ProgramNet),
            "program-app" => Some(Self::ProgramApp),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// A recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `list_probes`
    List,
    /// `recover`
    Recover { snr: u32, core: Coprocessor },
    /// `program`
    Program {
        snr: u32,
        core: Coprocessor,
        image: PathBuf,
        erase: EraseMode,
    },
    /// `reset`
    Reset { snr: u32 },
}

/// Configuration for the dummy tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyConfig {
    /// Serial numbers of the attached probes
    pub probes: Vec<u32>,
    /// Operation to fail, if any
    pub fail: Option<Operation>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            probes: vec![FIRST_SERIAL],
            fail: None,
        }
    }
}

impl DummyConfig {
    /// `count` probes with consecutive serial numbers, at most [`MAX_PROBES`]
    pub fn with_probe_count(mut self, count: u32) -> Self {
        let count = count.min(MAX_PROBES);
        self.probes = (0..count).map(|i| FIRST_SERIAL + i).collect();
        self
    }
}

/// Parse programmer options into a config
///
/// Supported options:
/// - `probes=<count>`: number of attached probes (default 1, at most [`MAX_PROBES`])
/// - `fail=<list|recover|program-net|program-app|reset>`: operation to fail
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<DummyConfig, String> {
    let mut config = DummyConfig::default();

    for (key, value) in options {
        match *key {
            "probes" => {
                let count: u32 = value
                    .parse()
                    .map_err(|_| format!("Invalid probes value: {}", value))?;
                if count > MAX_PROBES {
                    return Err(format!("Too many probes: {} (maximum {})", count, MAX_PROBES));
                }
                config = config.with_probe_count(count);
            }
            "fail" => {
                config.fail = Some(
                    Operation::from_name(value)
                        .ok_or_else(|| format!("Invalid fail value: {}", value))?,
                );
            }
            _ => {
                log::warn!("dummy: Unknown option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}

/// Dummy programming tool
pub struct DummyTool {
    config: DummyConfig,
    calls: Vec<Call>,
}

impl DummyTool {
    /// Create a new dummy tool
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            calls: Vec::new(),
        }
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    fn record(&mut self, op: Operation, call: Call) -> Result<()> {
        log::info!("dummy: {:?}", call);
        self.calls.push(call);
        if self.config.fail == Some(op) {
            return Err(Error::ToolFailed {
                command: format!("dummy {:?}", op),
                code: Some(1),
            });
        }
        Ok(())
    }
}

impl ProgrammerTool for DummyTool {
    fn name(&self) -> &str {
        "dummy"
    }

    fn list_probes(&mut self) -> Result<Vec<u32>> {
        self.record(Operation::List, Call::List)?;
        Ok(self.config.probes.clone())
    }

    fn recover(&mut self, snr: u32, core: Coprocessor) -> Result<()> {
        self.record(Operation::Recover, Call::Recover { snr, core })
    }

    fn program(
        &mut self,
        snr: u32,
        core: Coprocessor,
        image: &Path,
        erase: EraseMode,
    ) -> Result<()> {
        let op = match core {
            Coprocessor::Network => Operation::ProgramNet,
            Coprocessor::Application => Operation::ProgramApp,
        };
        self.record(
            op,
            Call::Program {
                snr,
                core,
                image: image.to_path_buf(),
                erase,
            },
        )
    }

    fn reset(&mut self, snr: u32) -> Result<()> {
        self.record(Operation::Reset, Call::Reset { snr })
    }
}
