//! CLI command implementations.
//!
//! - **diagnose**: score one checkpoint directory and hand the result to the
//!   configured output sink
//! - **init**: write a default `.iodiag.toml` configuration file

pub mod diagnose;
pub mod init;

pub use diagnose::{handle_diagnose, DiagnoseConfig};
pub use init::init_config;
