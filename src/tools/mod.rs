// blocksearch MCP tools

pub mod list_files;
pub mod search;

use rust_mcp_sdk::tool_box;

pub use list_files::{ListFilesTool, NO_FILES_MESSAGE};
pub use search::{NO_BLOCKS_MESSAGE, SearchBlocksTool};

// Generates `BlockSearchTools` with `tools()` and `TryFrom<CallToolRequestParams>`
tool_box!(BlockSearchTools, [SearchBlocksTool, ListFilesTool]);
