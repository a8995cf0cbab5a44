//! Tools command: print the tool registry.

use crate::mcp::get_tools;
use anyhow::Result;

/// Print every tool descriptor as pretty JSON on stdout.
pub fn run_tools() -> Result<()> {
    let tools = get_tools();
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}
