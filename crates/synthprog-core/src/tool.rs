//! Programming tool trait
//!
//! A programming tool drives an attached probe. The production backend
//! shells out to `nrfjprog`; tests use an in-memory implementation.

use crate::error::Result;
use std::fmt;
use std::path::Path;

/// nRF5340 core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coprocessor {
    /// Network core (radio stack)
    Network,
    /// Application core (device logic)
    Application,
}

impl Coprocessor {
    /// Identifier used by the vendor tooling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "CP_NETWORK",
            Self::Application => "CP_APPLICATION",
        }
    }
}

impl fmt::Display for Coprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How flash is erased before an image is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EraseMode {
    /// Erase only the sectors the image touches
    Sector,
    /// Erase the whole core's flash
    Chip,
}

/// A tool that can program nRF5340 devices through an attached probe
///
/// Every operation blocks until the tool is done. An operation that does
/// not succeed returns an error; callers never retry.
pub trait ProgrammerTool {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Serial numbers of all connected probes
    fn list_probes(&mut self) -> Result<Vec<u32>>;

    /// Recover (unlock and erase) a core
    fn recover(&mut self, snr: u32, core: Coprocessor) -> Result<()>;

    /// Write `image` to a core
    fn program(
        &mut self,
        snr: u32,
        core: Coprocessor,
        image: &Path,
        erase: EraseMode,
    ) -> Result<()>;

    /// Reset the device
    fn reset(&mut self, snr: u32) -> Result<()>;
}

impl<T: ProgrammerTool + ?Sized> ProgrammerTool for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn list_probes(&mut self) -> Result<Vec<u32>> {
        (**self).list_probes()
    }

    fn recover(&mut self, snr: u32, core: Coprocessor) -> Result<()> {
        (**self).recover(snr, core)
    }

    fn program(
        &mut self,
        snr: u32,
        core: Coprocessor,
        image: &Path,
        erase: EraseMode,
    ) -> Result<()> {
        (**self).program(snr, core, image, erase)
    }

    fn reset(&mut self, snr: u32) -> Result<()> {
        (**self).reset(snr)
    }
}
