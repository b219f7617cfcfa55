#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Constructor resolution and activation caching.
//!
//! # Purpose
//!
//! Given a [`Type`] and a requested [`CallSignature`], locate the matching initializer,
//! synthesize a reusable [`Factory`] that invokes it, and memoize that factory so repeated
//! requests skip discovery and synthesis.
//!
//! # Mental Model
//!
//! 1. **Lookup:** [`Activator::activator`] consults the activation cache keyed by
//!    `(type, signature)`.
//! 2. **Resolution:** On a miss the signature is validated, then matched exactly against the
//!    type's initializers (public and non-public alike).
//! 3. **Synthesis:** The resolved initializer is captured in a [`Factory`] along with any
//!    result boxing, and published with its visibility flag.
//! 4. **Visibility:** Every request, hit or miss, is checked against the published flag.
//!
//! Parameterless construction has its own fast path ([`DefaultActivator`]) choosing one
//! [`Strategy`] per type, and [`create_uninitialized`] bypasses initializers entirely.
//!
//! # Concurrency
//!
//! - **Reads:** Shared read lock on one of a fixed set of shards.
//! - **Writes:** Test-and-insert under the shard write lock. Synthesis runs outside any lock
//!   and may run redundantly on a racing miss, but exactly one result is published and every
//!   caller observes it afterwards.
//!
//! # Invariants
//!
//! - Must publish at most one entry per key, never replacing it.
//!   - Enforced in: [`crate::publish::PublishMap::publish`].
//!   - Tested by: [`crate::invariants::test_idempotent_publication`]
//!   - Failure symptom: Callers of the same key observe different factories.
//!
//! - Must enforce visibility independently of cache state.
//!   - Enforced in: [`crate::visibility::ensure_visible`].
//!   - Tested by: [`crate::invariants::test_visibility_independent_of_call_order`]
//!   - Failure symptom: A restrictive request succeeds because a permissive one ran first.
//!
//! - Must not publish failed resolutions.
//!   - Enforced in: [`crate::cache::ActivationCache`].
//!   - Tested by: [`crate::invariants::test_failures_not_published`]
//!   - Failure symptom: Cache grows on repeated misuse.
//!
//! - Must bound synthesis under concurrent first access.
//!   - Enforced in: [`crate::publish::PublishMap::publish`] (first wins, later lookups hit).
//!   - Tested by: [`crate::invariants::test_concurrent_first_access`],
//!     [`crate::invariants::test_concurrent_default_first_access`]
//!   - Failure symptom: Synthesis count grows with the number of callers.

mod activator;
mod cache;
mod config;
mod default;
mod error;
mod factory;
mod formattable;
mod matcher;
mod publish;
mod signature;
mod stats;
mod synth;
mod uninit;
mod visibility;

pub use activator::{Activator, global};
pub use config::{ActivatorConfig, DYNAMIC_CODE_ENV, DynamicCode};
pub use default::{DefaultActivator, Strategy};
pub use error::{ActivationError, Result};
pub use factory::Factory;
pub use formattable::FormattableFactory;
pub use forge_types::{Type, Value};
pub use signature::{CallSignature, SigParam};
pub use stats::Stats;
pub use uninit::create_uninitialized;

use std::sync::Arc;

/// [`Activator::create_instance`] on the [`global`] activator.
pub fn create_instance(ty: &Type, allow_non_public: bool) -> Result<Value> {
	global().create_instance(ty, allow_non_public)
}

/// [`Activator::default_activator`] on the [`global`] activator.
pub fn default_activator(ty: &Type, allow_non_public: bool) -> Result<Arc<DefaultActivator>> {
	global().default_activator(ty, allow_non_public)
}

/// [`Activator::activator`] on the [`global`] activator.
pub fn activator(ty: &Type, sig: &CallSignature, allow_non_public: bool) -> Result<Factory> {
	global().activator(ty, sig, allow_non_public)
}

/// [`Activator::formattable_factory`] on the [`global`] activator.
pub fn formattable_factory(ty: &Type) -> FormattableFactory {
	global().formattable_factory(ty)
}

#[cfg(any(test, doc))]
pub(crate) mod invariants;

#[cfg(test)]
pub(crate) mod test_fixtures;
