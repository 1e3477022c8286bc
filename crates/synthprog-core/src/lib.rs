//! synthprog-core - Core library for provisioning synth and headset devices
//!
//! This crate holds everything that does not depend on a particular
//! programming tool: the device/board model, the firmware image table,
//! probe selection and the four-step flashing sequence.
//!
//! Backends (the `nrfjprog` command-line tool, the in-memory dummy) implement
//! [`tool::ProgrammerTool`] and are driven by [`sequence::provision`].
//!
//! # Example
//!
//! ```ignore
//! use synthprog_core::{sequence, target::{Board, Device, Target}, image::ImageSet};
//!
//! let target = Target::from_parts(Device::Synth, Some(Board::Nrf5340AudioDk))?;
//! let request = sequence::FlashRequest::new(target, ImageSet::new("bin"));
//! let stdin = std::io::stdin();
//! let (input, output) = (stdin.lock(), std::io::stdout());
//! let snr = sequence::provision(&mut tool, &request, input, output, &mut sequence::NoProgress)?;
//! println!("Flashed probe {}", snr);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod image;
pub mod probe;
pub mod sequence;
pub mod target;
pub mod tool;

pub use error::{Error, Result};
