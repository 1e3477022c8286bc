//! CLI command implementations
//!
//! Commands work against any `ProgrammerTool`, so the same code drives the
//! real `nrfjprog` backend and the dummy backend.

mod list;
pub mod program;

pub use list::{list_probes, list_tools};
