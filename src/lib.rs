//! gearset-solver - Constrained combinatorial gear-set solver
//!
//! Given a catalog of equipment and a character configuration (level,
//! class, stat floors/ceilings, forced/forbidden items), finds the top
//! scored equipment sets that satisfy every constraint.

pub mod attributes;
pub mod build_info;
pub mod catalog;
pub mod config;
pub mod feasibility;
pub mod items;
pub mod pairs;
pub mod pool;
pub mod scoring;
pub mod search;
pub mod solve;
pub mod topk;

// Re-export commonly used types at crate root for convenience.
pub use attributes::{SetMaximums, SetMinimums, Stats};
pub use catalog::{Catalog, SourceKind, SourceTags};
pub use config::{ClassId, NegPolicy, Passive, SolveConfig, SolveError, StatPriorities, Sublimation};
pub use items::{Item, ItemId, Rarity, Slot};
pub use pairs::RelicEpicPair;
pub use search::Candidate;
pub use solve::{solve, ProgressCallback, Solution};
