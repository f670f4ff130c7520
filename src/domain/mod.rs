//! Domain layer: site hierarchy and status derivation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod blocking;
pub mod builder;
pub mod classify;
pub mod dependency;
pub mod entities;
pub mod error;
pub mod report;
pub mod rollout;
pub mod stats;
pub mod store;

pub use arena::{NodeKind, SiteTree, TreeNode};
pub use blocking::{blocked_by_ancestor_design, blocked_by_ancestor_sync, AncestorBlockers, BlockingIndex};
pub use builder::{build_tree, BuildOutcome, TreeBuilder};
pub use classify::{classify, classify_all, Classifier, Color, StatusColors, SyncStatus};
pub use dependency::{compute_dependencies, resolve, DependencyEdge};
pub use entities::*;
pub use error::{DomainError, DomainResult, OrphanReason, OrphanRecord};
pub use report::{project_report, Report, ReportKind};
pub use rollout::Rollout;
pub use stats::{compute_statistics, RolloutStats};
pub use store::SiteStore;
