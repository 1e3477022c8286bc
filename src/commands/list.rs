//! List commands implementation

use crate::tools;
use synthprog_core::tool::ProgrammerTool;

/// List all available programming tools
pub fn list_tools() {
    println!("Available programming tools:");
    println!();
    for t in tools::available_tools() {
        let aliases = if t.aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", t.aliases.join(", "))
        };
        println!("  {:10} - {}{}", t.name, t.description, aliases);
    }
}

/// List the serial numbers of all connected probes
pub fn list_probes(tool: &mut dyn ProgrammerTool) -> Result<(), Box<dyn std::error::Error>> {
    let probes = tool.list_probes()?;
    if probes.is_empty() {
        println!("No probes connected");
        return Ok(());
    }

    println!("Connected probes:");
    for (i, snr) in probes.iter().enumerate() {
        println!("  {}) {}", i + 1, snr);
    }
    Ok(())
}
