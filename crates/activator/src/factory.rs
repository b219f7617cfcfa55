use std::fmt;
use std::sync::Arc;

use forge_types::{InvokeError, Value};

use crate::CallSignature;

type Invoker = Arc<dyn Fn(&[Value]) -> Result<Value, InvokeError> + Send + Sync>;

/// Reusable callable bound to one initializer and one requested signature.
///
/// Cloning is cheap; every clone invokes the same synthesized body.
#[derive(Clone)]
pub struct Factory {
	signature: CallSignature,
	invoker: Invoker,
}

impl Factory {
	pub(crate) fn new<F>(signature: CallSignature, invoker: F) -> Self
	where
		F: Fn(&[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
	{
		Self {
			signature,
			invoker: Arc::new(invoker),
		}
	}

	/// Constructs a new instance from `args`, returned as the signature's result type.
	pub fn invoke(&self, args: &[Value]) -> Result<Value, InvokeError> {
		(self.invoker)(args)
	}

	pub fn signature(&self) -> &CallSignature {
		&self.signature
	}

	pub fn arity(&self) -> usize {
		self.signature.arity()
	}

	/// Returns true if both handles share the same synthesized body.
	pub fn same_body(&self, other: &Factory) -> bool {
		Arc::ptr_eq(&self.invoker, &other.invoker)
	}
}

impl fmt::Debug for Factory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Factory").field("signature", &self.signature.to_string()).finish_non_exhaustive()
	}
}
