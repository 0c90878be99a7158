//! Rate limiting and usage tier management.
//!
//! This crate provides request pacing to comply with provider API quotas.
//! Tiers describe the quota shape (RPM, TPM, RPD, concurrency); the
//! [`RateLimiter`] enforces them. Pacing is the only mechanism here:
//! failed requests are never retried automatically.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod tier;

pub use config::{
    ChalkboardConfig, LiveConfig, ModelTierConfig, ProviderConfig, RosterConfig, TierConfig,
};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use tier::Tier;
