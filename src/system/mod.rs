//! # System Interaction Layer
//!
//! The boundary between the pure translators in `core` and the operating
//! system's process model.
//!
//! ## Modules
//!
//! - **`process_table`**: Snapshots the OS process table (`/proc` on Linux,
//!   `ps` elsewhere on POSIX) and turns it into a parent-to-children tree.
//! - **`terminator`**: The `ProcessTerminator` capability and its two
//!   strategies: a leaves-first signal walk on POSIX and a single `taskkill`
//!   tree kill on Windows.
//! - **`executor`**: Runs a build command under tokio and cancels its whole
//!   tree on Ctrl+C.

pub mod executor;
pub mod process_table;
pub mod terminator;
