//! Activation cache.
//!
//! # Role
//!
//! Memoizes the matcher and synthesizer pipeline per `(type, signature)` for the lifetime of
//! the owning activator. Entries are never evicted.
//!
//! # Invariants
//!
//! - Must publish at most one entry per key; racing syntheses are discarded.
//!   - Enforced in: [`crate::publish::PublishMap::publish`].
//!   - Tested by: `invariants::test_idempotent_publication`
//! - Must check visibility on every request, cached or not.
//!   - Enforced in: [`ActivationCache::get`].
//!   - Tested by: `invariants::test_visibility_independent_of_call_order`
//! - Must not publish failed resolutions.
//!   - Enforced in: [`ActivationCache::populate`] (errors return before publication).
//!   - Tested by: `invariants::test_failures_not_published`

use std::sync::Arc;

use forge_types::Type;

use crate::error::Result;
use crate::publish::{PublishMap, Published};
use crate::stats::Counters;
use crate::synth::{self, Synthesized};
use crate::visibility::ensure_visible;
use crate::{CallSignature, Factory, matcher};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
	ty: Type,
	sig: CallSignature,
}

/// Published value for a [`CacheKey`]. Immutable once published.
pub(crate) struct ActivationEntry {
	factory: Factory,
	public: bool,
}

pub(crate) struct ActivationCache {
	entries: PublishMap<CacheKey, ActivationEntry>,
}

impl ActivationCache {
	pub(crate) fn new() -> Self {
		Self {
			entries: PublishMap::new(),
		}
	}

	pub(crate) fn get(&self, ty: &Type, sig: &CallSignature, allow_non_public: bool, counters: &Counters) -> Result<Factory> {
		let key = CacheKey {
			ty: ty.clone(),
			sig: sig.clone(),
		};
		let entry = match self.entries.get(&key) {
			Some(entry) => {
				counters.hit();
				tracing::trace!(ty = %ty, sig = %sig, "activation cache hit");
				entry
			}
			None => {
				counters.miss();
				self.populate(key, counters)?
			}
		};

		ensure_visible(ty, entry.public, allow_non_public)?;
		Ok(entry.factory.clone())
	}

	fn populate(&self, key: CacheKey, counters: &Counters) -> Result<Arc<ActivationEntry>> {
		synth::validate(&key.ty, &key.sig)?;
		let resolved = matcher::resolve(&key.ty, &key.sig.param_types())?;
		let Synthesized { factory, public } = synth::synthesize(&key.ty, resolved, &key.sig);
		counters.synthesized();
		tracing::debug!(ty = %key.ty, sig = %key.sig, public, "synthesized activator");

		let ty = key.ty.clone();
		match self.entries.publish(key, ActivationEntry { factory, public }) {
			Published::Inserted(entry) => Ok(entry),
			Published::Existing(entry) => {
				counters.race_lost();
				tracing::debug!(ty = %ty, "activator published concurrently; discarding local synthesis");
				Ok(entry)
			}
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}
}
