//! synthprog-nrfjprog - nrfjprog backend
//!
//! This crate drives Nordic's `nrfjprog` command-line tool. Every operation
//! spawns one `nrfjprog` process, waits for it and checks its exit status.
//!
//! # Example
//!
//! ```no_run
//! use synthprog_nrfjprog::{Nrfjprog, NrfjprogConfig};
//! use synthprog_core::tool::ProgrammerTool;
//!
//! let config = NrfjprogConfig::default().with_program("/opt/nrf-command-line-tools/bin/nrfjprog");
//! let mut tool = Nrfjprog::new(config);
//! for snr in tool.list_probes()? {
//!     println!("{}", snr);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with synthprog CLI
//!
//! ```bash
//! # nrfjprog from PATH
//! synthprog -d left
//!
//! # Explicit executable
//! synthprog -d synth -b nrf5340_dk -t nrfjprog:path=/opt/nrfjprog/nrfjprog
//! ```

pub mod command;
pub mod error;

pub use command::{parse_options, Nrfjprog, NrfjprogConfig};
pub use error::{NrfjprogError, Result};
