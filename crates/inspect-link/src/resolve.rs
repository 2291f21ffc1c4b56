//! Interface boundary for resolving unmasked references.
//!
//! Unmasked URLs only name an item held remotely; turning one into an
//! [`EconItem`] requires querying a third-party coordinator service. That
//! client — with its authentication, rate limiting, and request queue — is
//! outside this crate. This trait is the whole contract with it.

use crate::model::EconItem;
use crate::url::UnmaskedRef;

/// Resolves an unmasked reference to the item record it names.
///
/// Implementations are expected to apply their own timeout and to bound the
/// number of pending requests; callers may invoke `resolve` from any
/// concurrency context. This crate never calls it — it only defines the
/// seam.
///
/// The signature is synchronous: an implementation backed by a network
/// client is free to block internally (or to wrap an async runtime's
/// `block_on`), and async callers can offload the call to a blocking pool.
pub trait ResolveReference {
    /// The implementation's failure type (network, auth, queue overflow...).
    type Error;

    /// Looks up the referenced item.
    fn resolve(&self, reference: &UnmaskedRef) -> Result<EconItem, Self::Error>;
}
