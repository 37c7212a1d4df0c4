//! Library half of the slnfix CLI: config file handling and output rendering.

pub mod config;
pub mod output;

use slnfix_types::report::ToolInfo;

pub fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "slnfix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
