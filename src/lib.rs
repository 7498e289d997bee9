// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Stepwise map-view camera animation.
//!
//! Viewanim moves a map view's camera (center, zoom, tilt) to a target
//! over a duration using discrete timed steps instead of a continuous
//! render loop. Tilt follows the shorter arc, and the last step lands
//! exactly on the requested target.
//!
//! # Key entry points
//!
//! - [`camera::ViewAnimator`] - starts, restarts and stops runs
//! - [`camera::ViewTarget`] - the seam to the view being animated
//! - [`scheduler::Scheduler`] - periodic tick source (threaded or manual)
//! - [`options::Options`] - timing configuration with TOML presets
//!
//! # Concurrency
//!
//! Ticks run on the scheduler's context while `start`/`stop` run on the
//! caller's. Each run carries its own [`camera::RunToken`]; a tick checks
//! it before touching the view, so a stopped or superseded run never
//! writes again.

pub mod camera;
pub mod error;
pub mod options;
pub mod scheduler;

pub use error::AnimatorError;
