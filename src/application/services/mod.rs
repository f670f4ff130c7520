//! Application services

pub mod rollout;

pub use rollout::RolloutService;
