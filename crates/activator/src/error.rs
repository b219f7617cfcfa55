use forge_types::InvokeError;

/// Activation failures.
///
/// All kinds except [`ActivationError::Invoke`] are detected before any instance is built and
/// are deterministic for a given `(type, signature, visibility)` request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
	#[error("no initializer on `{ty}` matching ({params})")]
	NoMatchingInitializer { ty: Box<str>, params: String },

	#[error("`{ty}` has no parameterless initializer")]
	NoDefaultInitializer { ty: Box<str> },

	#[error("initializer on `{ty}` is not public; non-public access was not requested")]
	NonPublicInitializerDenied { ty: Box<str> },

	#[error("result type `{result}` is not assignable from `{ty}`")]
	IncompatibleResultType { ty: Box<str>, result: Box<str> },

	#[error("signature {signature} for `{ty}` uses by-reference passing")]
	UnsupportedParameterMode { ty: Box<str>, signature: String },

	#[error(transparent)]
	Invoke(#[from] InvokeError),
}

pub type Result<T, E = ActivationError> = std::result::Result<T, E>;
