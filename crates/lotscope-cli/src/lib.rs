//! Library side of the lotscope CLI: logging setup and the staged analysis
//! pipeline the binary drives.

pub mod logging;
pub mod pipeline;
pub mod types;
