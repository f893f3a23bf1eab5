//! # checkgroup-model
//!
//! **Tier 2 (Grouping)**
//!
//! Turns a flat list of check results and an ordered list of grouping
//! rules into a tree: one level per rule, one leaf per result. Benchmark
//! rules expand into the result's whole ancestor path, and paths sharing a
//! prefix share nodes.
//!
//! ## What belongs here
//! * The [`CheckNode`] tree and its summaries
//! * Node construction per rule type
//! * Benchmark trunk merging
//! * The aggregation pass
//!
//! ## What does NOT belong here
//! * Key derivation (use `checkgroup-key`)
//! * Expand/collapse state transitions (use `checkgroup-node-state`)
//! * Walking panel definitions (use `checkgroup-panel`)

#![forbid(unsafe_code)]

mod aggregate;
mod arena;
mod error;
mod factory;
mod node;
mod trunk;

pub use aggregate::{GroupingOutcome, aggregate};
pub use error::GroupingError;
pub use factory::{group_shell, leaf_node};
pub use node::{BenchmarkNode, CheckNode, ControlNode, KeyValuePairNode, ResultLeaf, RootNode};
