//! Device and board model
//!
//! The same nRF5340 hardware is provisioned either as the synth or as one
//! side of the headset pair. The synth can run on both development kits, the
//! headset only on the audio development kit.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Device role selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// Synthesizer
    Synth,
    /// Left headset
    Left,
    /// Right headset
    Right,
}

impl Device {
    /// All devices, in command-line order
    pub const ALL: [Device; 3] = [Device::Synth, Device::Left, Device::Right];

    /// Command-line name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Synth => "synth",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Device {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| Error::UnknownDevice(s.to_string()))
    }
}

/// Development kit the firmware is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Board {
    /// nRF5340 DK
    Nrf5340Dk,
    /// nRF5340 Audio DK
    Nrf5340AudioDk,
}

impl Board {
    /// All boards, in command-line order
    pub const ALL: [Board; 2] = [Board::Nrf5340Dk, Board::Nrf5340AudioDk];

    /// Command-line name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nrf5340Dk => "nrf5340_dk",
            Self::Nrf5340AudioDk => "nrf5340_audio_dk",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Board {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| Error::UnknownBoard(s.to_string()))
    }
}

/// Headset side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Left earpiece
    Left,
    /// Right earpiece
    Right,
}

impl Channel {
    /// Name used in image file names and messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// A fully resolved programming target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Synth firmware for the given board
    Synth(Board),
    /// Headset firmware for the given side (audio DK only)
    Headset(Channel),
}

impl Target {
    /// Every valid target
    pub const ALL: [Target; 4] = [
        Target::Synth(Board::Nrf5340Dk),
        Target::Synth(Board::Nrf5340AudioDk),
        Target::Headset(Channel::Left),
        Target::Headset(Channel::Right),
    ];

    /// Resolve a device and an optional board into a target
    ///
    /// The synth needs a board. Headsets ignore a missing board but reject
    /// the plain nRF5340 DK.
    pub fn from_parts(device: Device, board: Option<Board>) -> Result<Self> {
        match (device, board) {
            (Device::Synth, Some(board)) => Ok(Target::Synth(board)),
            (Device::Synth, None) => Err(Error::BoardRequired(device)),
            (Device::Left | Device::Right, Some(Board::Nrf5340Dk)) => Err(Error::InvalidBoard {
                device,
                board: Board::Nrf5340Dk,
            }),
            (Device::Left, _) => Ok(Target::Headset(Channel::Left)),
            (Device::Right, _) => Ok(Target::Headset(Channel::Right)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Synth(board) => write!(f, "{} synth", board),
            Target::Headset(ch) => write!(f, "{} headset", ch.name()),
        }
    }
}
