//! SpecPilot CLI library.
//!
//! Hosts the `specpilot` binary's argument parsing, the API server command,
//! the interactive interview and the scripted demos.

pub mod cli;
pub mod commands;
pub mod demo;
pub mod repl;
