//! Earth–Mars launch windows and an animated view of the planets.
//!
//! The heavy lifting lives in the workspace crates; this crate re-exports them
//! under short names and wires them into the `windows` pipeline that the
//! `orrery` binary and the integration tests share.

pub use orrery_animation as animation;
pub use orrery_approach as approach;
pub use orrery_config as config;
pub use orrery_core::{constants, time, units, vector};
pub use orrery_ephem as ephemeris;
pub use orrery_export as export;
pub use orrery_impulsive as impulsive;
pub use orrery_importer as importer;
pub use orrery_plot as plot;

pub mod windows;

#[cfg(feature = "viz")]
pub mod viewer;
