//! # stab_core - Precast Girder Stability Engine
//!
//! `stab_core` checks the lateral stability of long precast prestressed
//! concrete girders while they are lifted from the casting bed and while
//! they are hauled on a truck. For each stage it finds the equilibrium roll
//! angle, evaluates stresses along the girder, and reports factors of
//! safety against cracking, failure and rollover.
//!
//! All inputs and results are `serde` types in SI base units.
//!
//! ## Quick Start
//!
//! ```rust
//! use stab_core::model::StabilityModel;
//!
//! let model = StabilityModel::default();
//! let lifting = model.get_lifting_results().unwrap();
//! let hauling = model.get_hauling_results().unwrap();
//! println!("lifting FScr = {:.2}, hauling FSr = {:.2}", lifting.fs_cracking.fs, hauling.fs_rollover.fs);
//! ```
//!
//! ## Modules
//!
//! - [`girder`] - Sections, stress points and point loads
//! - [`materials`] - Concrete and derived properties
//! - [`strands`] - Simplified and exact prestressing layouts
//! - [`problem`] - Lifting and hauling problem definitions
//! - [`criteria`] - Allowable stresses and minimum factors of safety
//! - [`engineer`] - The solver
//! - [`artifact`] - Check artifacts and summary results
//! - [`model`] - Root container with the query interface
//! - [`document`] - Versioned JSON documents and migrations
//! - [`file_io`] - Atomic saves and lock files
//! - [`units`] - Unit conversions and change detection helpers
//! - [`errors`] - Structured error types

pub mod artifact;
pub mod criteria;
pub mod document;
pub mod engineer;
pub mod errors;
pub mod file_io;
pub mod girder;
pub mod materials;
pub mod model;
pub mod problem;
pub mod settings;
pub mod strands;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use artifact::{HaulingCheckArtifact, HaulingResults, LiftingCheckArtifact, LiftingResults, RollEquilibrium};
pub use engineer::StabilityEngineer;
pub use errors::{StabError, StabResult};
pub use file_io::{load_model, save_model, FileLock};
pub use model::StabilityModel;
