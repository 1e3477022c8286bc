//! Programming tool registry
//!
//! This module opens a programming tool backend from a `--tool` string, with
//! support for feature-gated inclusion and dynamic help text generation.

use std::collections::HashMap;
use synthprog_core::tool::ProgrammerTool;
use thiserror::Error;

/// Errors from opening a tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// No backend with this name is compiled in
    #[error("Unknown programming tool: {0} (available: {names})", names = tool_names_short())]
    UnknownTool(String),

    /// Option not of the form key=value
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    InvalidParameter(String),

    /// Backend rejected its options
    #[error("Invalid {tool} parameters: {message}")]
    InvalidOptions { tool: &'static str, message: String },
}

/// Information about a programming tool
pub struct ToolInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available tools (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_tools() -> Vec<ToolInfo> {
    let mut tools = Vec::new();

    #[cfg(feature = "nrfjprog")]
    tools.push(ToolInfo {
        name: "nrfjprog",
        aliases: &["nrf"],
        description: "Nordic nRF command line tools (path=<executable>,family=<NRF53>)",
    });

    #[cfg(feature = "dummy")]
    tools.push(ToolInfo {
        name: "dummy",
        aliases: &[],
        description: "Simulated probes for testing (probes=<count>,fail=<operation>)",
    });

    tools
}

/// Generate a short list of tool names for CLI help
pub fn tool_names_short() -> String {
    let tools = available_tools();
    let names: Vec<&str> = tools.iter().map(|t| t.name).collect();
    names.join(", ")
}

/// Parsed tool parameters
#[derive(Debug)]
pub struct ToolParams {
    /// Tool name as given
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

impl ToolParams {
    fn options(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parse a tool string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
pub fn parse_tool_params(s: &str) -> Result<ToolParams, ToolError> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            } else {
                return Err(ToolError::InvalidParameter(opt.to_string()));
            }
        }
    }

    Ok(ToolParams {
        name: name.to_string(),
        params,
    })
}

/// Open a programming tool by its `--tool` string
pub fn open_tool(tool: &str) -> Result<Box<dyn ProgrammerTool>, ToolError> {
    let params = parse_tool_params(tool)?;

    match params.name.as_str() {
        #[cfg(feature = "nrfjprog")]
        "nrfjprog" | "nrf" => open_nrfjprog(&params),

        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params),

        _ => Err(ToolError::UnknownTool(params.name)),
    }
}

#[cfg(feature = "nrfjprog")]
fn open_nrfjprog(params: &ToolParams) -> Result<Box<dyn ProgrammerTool>, ToolError> {
    use synthprog_nrfjprog::{parse_options, Nrfjprog};

    let config = parse_options(&params.options()).map_err(|message| ToolError::InvalidOptions {
        tool: "nrfjprog",
        message,
    })?;
    log::debug!(
        "Using {} (family {})",
        config.program.display(),
        config.family
    );

    Ok(Box::new(Nrfjprog::new(config)))
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &ToolParams) -> Result<Box<dyn ProgrammerTool>, ToolError> {
    use synthprog_dummy::{parse_options, DummyTool};

    let config = parse_options(&params.options()).map_err(|message| ToolError::InvalidOptions {
        tool: "dummy",
        message,
    })?;
    log::info!("Using dummy tool with {} probe(s)", config.probes.len());

    Ok(Box::new(DummyTool::new(config)))
}
