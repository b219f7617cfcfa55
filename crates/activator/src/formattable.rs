use std::sync::Arc;

use forge_types::{InvokeError, Type, Value};

use crate::{DefaultActivator, create_uninitialized};

/// Producer of instances for deserialization-style consumers.
///
/// Prefers the type's default activator, non-public initializers included; falls back to an
/// uninitialized instance when the type has no parameterless initializer at all.
#[derive(Debug, Clone)]
pub struct FormattableFactory {
	ty: Type,
	source: Source,
}

#[derive(Debug, Clone)]
enum Source {
	Default(Arc<DefaultActivator>),
	Uninitialized,
}

impl FormattableFactory {
	pub(crate) fn from_default(ty: &Type, activator: Arc<DefaultActivator>) -> Self {
		Self {
			ty: ty.clone(),
			source: Source::Default(activator),
		}
	}

	pub(crate) fn uninitialized(ty: &Type) -> Self {
		Self {
			ty: ty.clone(),
			source: Source::Uninitialized,
		}
	}

	pub fn ty(&self) -> &Type {
		&self.ty
	}

	/// Returns true if instances skip every initializer.
	pub fn is_uninitialized(&self) -> bool {
		matches!(self.source, Source::Uninitialized)
	}

	pub fn invoke(&self) -> Result<Value, InvokeError> {
		match &self.source {
			Source::Default(activator) => activator.create(),
			Source::Uninitialized => Ok(create_uninitialized(&self.ty)),
		}
	}
}
