//! Command implementations for the leafmatch CLI.

mod batch;
mod identify;
mod index;
mod init;
mod remedy;

// Re-export all command functions
pub use batch::cmd_batch;
pub use identify::cmd_identify;
pub use index::cmd_index;
pub use init::cmd_init;
pub use remedy::{cmd_remedy_add, cmd_remedy_list, cmd_remedy_show};
