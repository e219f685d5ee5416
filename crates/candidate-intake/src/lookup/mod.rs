//! Postal-code address lookup backed by an upstream provider, a TTL cache, and a
//! bounded retry loop.

pub mod cache;
pub mod domain;
pub mod provider;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use cache::{LookupCache, MokaLookupCache};
pub use domain::{AddressRecord, CachedLookup, LookupError};
pub use provider::{AddressProvider, TransportError, UpstreamReply, ViaCepClient};
pub use router::lookup_router;
pub use service::{AttemptOutcome, PostalLookupService, RetryPolicy};
