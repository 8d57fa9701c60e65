//! # Mod
//!
//! These correspond to the subcommands executed by our command
//! line program.

pub mod extract;
pub mod references;
