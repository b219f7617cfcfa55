/// Rejections raised while building a type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
	#[error("`{ty}` declares field `{field}` twice")]
	DuplicateField { ty: Box<str>, field: Box<str> },

	#[error("`{ty}` declares two initializers with shape ({params})")]
	DuplicateInitializer { ty: Box<str>, params: String },

	#[error("value type `{ty}` cannot have a base type")]
	ValueTypeBase { ty: Box<str> },

	#[error("`{ty}` cannot derive from value type `{base}`")]
	BaseNotReference { ty: Box<str>, base: Box<str> },
}

/// Failures raised while running host primitives against concrete arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
	#[error("`{ty}` initializer takes {expected} argument(s), got {got}")]
	Arity { ty: Box<str>, expected: usize, got: usize },

	#[error("`{ty}` initializer argument {index} expects `{expected}`, got `{got}`")]
	ArgumentType {
		ty: Box<str>,
		index: usize,
		expected: Box<str>,
		got: String,
	},

	#[error("`{ty}` has no field named `{field}`")]
	UnknownField { ty: Box<str>, field: Box<str> },

	#[error("`{ty}.{field}` expects `{expected}`, got `{got}`")]
	FieldType {
		ty: Box<str>,
		field: Box<str>,
		expected: Box<str>,
		got: String,
	},

	#[error("`{ty}` has no public parameterless initializer")]
	NoPublicDefault { ty: Box<str> },

	#[error("initializer failed: {message}")]
	Failed { message: String },
}

impl InvokeError {
	/// Failure raised from inside an initializer body.
	pub fn failed(message: impl Into<String>) -> Self {
		Self::Failed {
			message: message.into(),
		}
	}
}
