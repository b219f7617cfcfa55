//! Default (parameterless) activation.
//!
//! # Role
//!
//! Picks one of three execution strategies per type on first use and keeps it for the
//! lifetime of the owning activator:
//!
//! | Strategy | When |
//! |----------|------|
//! | [`Strategy::NativeZero`] | Value type with no declared parameterless initializer. |
//! | [`Strategy::HostGeneric`] | Public parameterless initializer, dynamic code unavailable. |
//! | [`Strategy::Synthesized`] | Otherwise: dynamic code available, or the initializer is non-public. |
//!
//! # Invariants
//!
//! - A type's strategy never changes after publication.
//! - Visibility is checked on every request (see [`crate::cache`]).

use std::fmt;
use std::sync::Arc;

use forge_types::{InvokeError, Type, Value, host};

use crate::cache::ActivationCache;
use crate::error::{ActivationError, Result};
use crate::publish::{PublishMap, Published};
use crate::stats::Counters;
use crate::visibility::ensure_visible;
use crate::{CallSignature, Factory};

/// Execution strategy fixed for a type's default activator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
	/// Produces the zero value directly; no initializer involved.
	NativeZero,
	/// Delegates to the host's generic public-only default construction on every call.
	HostGeneric,
	/// Invokes a synthesized [`Factory`] from the activation cache.
	Synthesized,
}

enum Execution {
	NativeZero,
	HostGeneric,
	Synthesized(Factory),
}

/// Per-type parameterless activator.
pub struct DefaultActivator {
	ty: Type,
	public: bool,
	execution: Execution,
}

impl DefaultActivator {
	pub fn ty(&self) -> &Type {
		&self.ty
	}

	pub fn strategy(&self) -> Strategy {
		match self.execution {
			Execution::NativeZero => Strategy::NativeZero,
			Execution::HostGeneric => Strategy::HostGeneric,
			Execution::Synthesized(_) => Strategy::Synthesized,
		}
	}

	/// Whether the initializer behind this activator is public.
	pub fn is_public(&self) -> bool {
		self.public
	}

	/// Creates a new default instance.
	pub fn create(&self) -> Result<Value, InvokeError> {
		match &self.execution {
			Execution::NativeZero => Ok(host::zero_value(&self.ty)),
			Execution::HostGeneric => host::create_default(&self.ty),
			Execution::Synthesized(factory) => factory.invoke(&[]),
		}
	}
}

impl fmt::Debug for DefaultActivator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DefaultActivator")
			.field("ty", &self.ty)
			.field("strategy", &self.strategy())
			.field("public", &self.public)
			.finish()
	}
}

pub(crate) struct DefaultActivators {
	entries: PublishMap<Type, DefaultActivator>,
}

impl DefaultActivators {
	pub(crate) fn new() -> Self {
		Self {
			entries: PublishMap::new(),
		}
	}

	pub(crate) fn get(
		&self,
		ty: &Type,
		allow_non_public: bool,
		dynamic_code: bool,
		cache: &ActivationCache,
		counters: &Counters,
	) -> Result<Arc<DefaultActivator>> {
		let activator = match self.entries.get(ty) {
			Some(activator) => activator,
			None => self.select(ty, dynamic_code, cache, counters)?,
		};
		ensure_visible(ty, activator.public, allow_non_public)?;
		Ok(activator)
	}

	fn select(&self, ty: &Type, dynamic_code: bool, cache: &ActivationCache, counters: &Counters) -> Result<Arc<DefaultActivator>> {
		let (execution, public) = match ty.parameterless_initializer() {
			None if ty.is_value_type() => (Execution::NativeZero, true),
			None => return Err(ActivationError::NoDefaultInitializer { ty: ty.name().into() }),
			Some(init) if init.is_public() && !dynamic_code => (Execution::HostGeneric, true),
			Some(init) => {
				// Visibility is enforced by the caller against the published flag.
				let factory = cache.get(ty, &CallSignature::returning(ty), true, counters)?;
				(Execution::Synthesized(factory), init.is_public())
			}
		};

		let activator = DefaultActivator {
			ty: ty.clone(),
			public,
			execution,
		};
		let strategy = activator.strategy();
		let published = self.entries.publish(ty.clone(), activator);
		if let Published::Inserted(_) = &published {
			counters.default_selected();
			tracing::debug!(ty = %ty, ?strategy, public, dynamic_code, "default activator selected");
		}
		Ok(published.into_value())
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}
}
