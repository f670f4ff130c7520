//! synctrack: rollout tracking for the synchronization hierarchy of a network
//!
//! Sites form a tree under their grandmaster timing sources. Each tracked site
//! gets a rollout status derived from its own flags and those of its upstream
//! chain; statistics, dependency edges and planner reports are projected from
//! that tree.
//!
//! Layers:
//! - `domain`: hierarchy, classification and projections (no I/O)
//! - `application`: the rollout service and its error type
//! - `infrastructure`: record sources and service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{
    build_tree, classify_all, compute_dependencies, compute_statistics, project_report, Rollout,
};
