//! Tier trait for representing API rate limit constraints.

/// Represents rate limiting constraints for an API tier.
///
/// Providers publish different quota shapes (RPM, TPM, RPD, concurrent
/// requests). This trait provides a common interface for querying them.
///
/// All methods return `Option<T>` where `None` indicates unlimited/not
/// applicable.
///
/// # Example
///
/// ```
/// use chalkboard_rate_limit::Tier;
///
/// struct FreeTier;
///
/// impl Tier for FreeTier {
///     fn rpm(&self) -> Option<u32> { Some(10) }
///     fn tpm(&self) -> Option<u64> { Some(250_000) }
///     fn rpd(&self) -> Option<u32> { Some(250) }
///     fn max_concurrent(&self) -> Option<u32> { Some(1) }
///     fn name(&self) -> &str { "Free" }
/// }
/// ```
pub trait Tier: Send + Sync {
    /// Requests per minute limit.
    ///
    /// Returns `None` if there is no per-minute request limit.
    fn rpm(&self) -> Option<u32>;

    /// Tokens per minute limit.
    ///
    /// Returns `None` if there is no per-minute token limit.
    fn tpm(&self) -> Option<u64>;

    /// Requests per day limit.
    ///
    /// Returns `None` if there is no daily request limit.
    fn rpd(&self) -> Option<u32>;

    /// Maximum concurrent requests.
    ///
    /// Returns `None` if there is no concurrent request limit.
    fn max_concurrent(&self) -> Option<u32>;

    /// Name of the tier (e.g., "Free", "Tier 1").
    fn name(&self) -> &str;
}
