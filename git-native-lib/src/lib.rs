//! Connection layer over the native `git` executable.
//!
//! Every operation shells out to `git`, parses its textual output into
//! structured results, and classifies failures (in particular authentication
//! failures on remote operations) into typed errors.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::as_conversions, clippy::clone_on_ref_ptr)]
#![allow(clippy::too_many_arguments)]

pub mod core;
pub mod git;
pub mod testing;
pub mod util;
