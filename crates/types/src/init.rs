use std::fmt;
use std::sync::Arc;

use crate::{InvokeError, Type, Value};

/// Accessibility of an initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
	Public,
	NonPublic,
}

impl Visibility {
	pub fn is_public(self) -> bool {
		matches!(self, Self::Public)
	}
}

/// How an argument is passed to an initializer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParamMode {
	#[default]
	ByValue,
	/// Passed by reference; the callee may read and write through it.
	ByRef,
	/// Passed by reference; the callee must write through it.
	Out,
}

impl ParamMode {
	pub fn is_by_value(self) -> bool {
		matches!(self, Self::ByValue)
	}

	pub(crate) fn prefix(self) -> &'static str {
		match self {
			Self::ByValue => "",
			Self::ByRef => "ref ",
			Self::Out => "out ",
		}
	}
}

/// One declared initializer parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
	pub ty: Type,
	pub mode: ParamMode,
}

impl Param {
	pub fn by_value(ty: &Type) -> Self {
		Self {
			ty: ty.clone(),
			mode: ParamMode::ByValue,
		}
	}

	pub fn by_ref(ty: &Type) -> Self {
		Self {
			ty: ty.clone(),
			mode: ParamMode::ByRef,
		}
	}

	pub fn out(ty: &Type) -> Self {
		Self {
			ty: ty.clone(),
			mode: ParamMode::Out,
		}
	}
}

impl fmt::Display for Param {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.mode.prefix(), self.ty)
	}
}

/// Initializer body: writes the instance's fields from the (already type-checked) arguments.
pub type InitBody = Arc<dyn Fn(&mut Fields<'_>, &[Value]) -> Result<(), InvokeError> + Send + Sync>;

/// A constructor declared on a type.
#[derive(Clone)]
pub struct Initializer {
	params: Box<[Param]>,
	visibility: Visibility,
	body: InitBody,
}

impl Initializer {
	pub fn new<F>(params: impl IntoIterator<Item = Param>, visibility: Visibility, body: F) -> Self
	where
		F: Fn(&mut Fields<'_>, &[Value]) -> Result<(), InvokeError> + Send + Sync + 'static,
	{
		Self {
			params: params.into_iter().collect(),
			visibility,
			body: Arc::new(body),
		}
	}

	/// Public initializer taking every parameter by value.
	pub fn public<F>(params: &[&Type], body: F) -> Self
	where
		F: Fn(&mut Fields<'_>, &[Value]) -> Result<(), InvokeError> + Send + Sync + 'static,
	{
		Self::new(params.iter().map(|ty| Param::by_value(ty)), Visibility::Public, body)
	}

	/// Non-public initializer taking every parameter by value.
	pub fn non_public<F>(params: &[&Type], body: F) -> Self
	where
		F: Fn(&mut Fields<'_>, &[Value]) -> Result<(), InvokeError> + Send + Sync + 'static,
	{
		Self::new(params.iter().map(|ty| Param::by_value(ty)), Visibility::NonPublic, body)
	}

	pub fn params(&self) -> &[Param] {
		&self.params
	}

	pub fn visibility(&self) -> Visibility {
		self.visibility
	}

	pub fn is_public(&self) -> bool {
		self.visibility.is_public()
	}

	pub fn is_parameterless(&self) -> bool {
		self.params.is_empty()
	}

	/// Returns true if the declared parameters are exactly `tys`, all passed by value.
	pub fn matches(&self, tys: &[Type]) -> bool {
		self.params.len() == tys.len() && self.params.iter().zip(tys).all(|(p, ty)| p.mode.is_by_value() && p.ty == *ty)
	}

	pub(crate) fn body(&self) -> &InitBody {
		&self.body
	}

	pub(crate) fn render_params(params: &[Param]) -> String {
		params.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
	}
}

impl fmt::Debug for Initializer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Initializer")
			.field("params", &Self::render_params(&self.params))
			.field("visibility", &self.visibility)
			.finish_non_exhaustive()
	}
}

/// Mutable view over an instance's field slots, handed to initializer bodies.
pub struct Fields<'a> {
	ty: &'a Type,
	slots: &'a mut [Value],
}

impl<'a> Fields<'a> {
	pub(crate) fn new(ty: &'a Type, slots: &'a mut [Value]) -> Self {
		Self { ty, slots }
	}

	pub fn ty(&self) -> &Type {
		self.ty
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.ty.field_index(name).map(|idx| &self.slots[idx])
	}

	/// Stores `value` into the named field, boxing value types for reference-typed fields.
	pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), InvokeError> {
		let value = value.into();
		let Some(idx) = self.ty.field_index(name) else {
			return Err(InvokeError::UnknownField {
				ty: self.ty.name().into(),
				field: name.into(),
			});
		};
		let field_ty = &self.ty.fields()[idx].ty;
		if !field_ty.accepts(&value) {
			return Err(InvokeError::FieldType {
				ty: self.ty.name().into(),
				field: name.into(),
				expected: field_ty.name().into(),
				got: value.describe(),
			});
		}
		self.slots[idx] = value.coerce_to(field_ty);
		Ok(())
	}
}
