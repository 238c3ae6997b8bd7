//! Subcommand handlers.
//!
//! Each handler takes its parsed args, the resolved [`OutputMode`], and the
//! graph built from the manifest, and writes its result to stdout.
//!
//! [`OutputMode`]: crate::output::OutputMode

pub mod check;
pub mod cycles;
pub mod graph;
pub mod resolve;
