//! # cmkit
//!
//! Process control and value interop for build-tool front ends: stopping a
//! build together with every worker it spawned, and speaking the build
//! language's textual conventions (tagged `-D` values, truthiness, `${...}`
//! placeholders, command-line splitting, path spelling).

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
