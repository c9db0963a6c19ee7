//! CLI command handlers. Each command is in its own file.

mod checksum;
mod completions;
mod known_checksums;
mod validate;

pub use checksum::run_checksum;
pub use completions::{run_completions, run_man};
pub use known_checksums::run_known_checksums;
pub use validate::run_validate;
