use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_TYPE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identifier of a built type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
	pub(crate) fn next() -> Self {
		Self(NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed))
	}

	pub fn as_u32(self) -> u32 {
		self.0
	}
}
