//! replicactl - command-line caller for the replica control plane.

pub mod cli;
pub mod commands;
pub mod errors;
pub mod logging;
pub mod output;
