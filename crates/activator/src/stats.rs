use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of an activator's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
	/// Activation cache lookups served from a published entry.
	pub hits: u64,
	/// Activation cache lookups that found no entry.
	pub misses: u64,
	/// Factories synthesized, including ones discarded after losing a publication race.
	pub syntheses: u64,
	/// Synthesized entries discarded because another caller published first.
	pub races_lost: u64,
	/// Default activators selected and published.
	pub default_selections: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
	hits: AtomicU64,
	misses: AtomicU64,
	syntheses: AtomicU64,
	races_lost: AtomicU64,
	default_selections: AtomicU64,
}

impl Counters {
	pub(crate) fn hit(&self) {
		self.hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn miss(&self) {
		self.misses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn synthesized(&self) {
		self.syntheses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn race_lost(&self) {
		self.races_lost.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn default_selected(&self) {
		self.default_selections.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn snapshot(&self) -> Stats {
		Stats {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			syntheses: self.syntheses.load(Ordering::Relaxed),
			races_lost: self.races_lost.load(Ordering::Relaxed),
			default_selections: self.default_selections.load(Ordering::Relaxed),
		}
	}
}
