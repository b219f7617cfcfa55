use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, LazyLock};

use crate::{Initializer, TypeError, TypeId, Value};

/// Storage category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
	/// Stored inline and copied on assignment; always zero-initializable.
	Value,
	/// Heap-allocated and shared by reference; zero value is null.
	Reference,
}

/// Builtin types known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
	/// Root reference type; every value is assignable to it.
	Object,
	Bool,
	Int,
	Float,
	String,
}

/// Field-initializer expression, run before the initializer body.
pub type FieldInit = Arc<dyn Fn() -> Value + Send + Sync>;

/// A named, typed instance field.
#[derive(Clone)]
pub struct FieldDesc {
	pub name: Box<str>,
	pub ty: Type,
	pub init: Option<FieldInit>,
}

impl fmt::Debug for FieldDesc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldDesc")
			.field("name", &self.name)
			.field("ty", &self.ty)
			.field("init", &self.init.is_some())
			.finish()
	}
}

/// Immutable description of a type.
#[derive(Debug)]
pub struct TypeDesc {
	id: TypeId,
	name: Box<str>,
	kind: TypeKind,
	primitive: Option<Primitive>,
	base: Option<Type>,
	fields: Box<[FieldDesc]>,
	initializers: Box<[Initializer]>,
}

impl TypeDesc {
	pub fn id(&self) -> TypeId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> TypeKind {
		self.kind
	}

	pub fn is_value_type(&self) -> bool {
		self.kind == TypeKind::Value
	}

	pub fn primitive(&self) -> Option<Primitive> {
		self.primitive
	}

	pub fn base(&self) -> Option<&Type> {
		self.base.as_ref()
	}

	/// All instance fields, inherited ones first.
	pub fn fields(&self) -> &[FieldDesc] {
		&self.fields
	}

	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|f| &*f.name == name)
	}

	/// Declared initializers, in declaration order.
	pub fn initializers(&self) -> &[Initializer] {
		&self.initializers
	}

	/// The declared parameterless initializer, if any.
	pub fn parameterless_initializer(&self) -> Option<&Initializer> {
		self.initializers.iter().find(|init| init.is_parameterless())
	}
}

/// Shared handle to a [`TypeDesc`].
///
/// Equality and hashing use the type's identity, never its structure: two separately built
/// types with the same name and shape are distinct.
#[derive(Clone)]
pub struct Type(Arc<TypeDesc>);

struct Builtins {
	object: Type,
	bool: Type,
	int: Type,
	float: Type,
	string: Type,
}

static BUILTINS: LazyLock<Builtins> = LazyLock::new(|| Builtins {
	object: Type::builtin(
		"object",
		TypeKind::Reference,
		Primitive::Object,
		Box::new([Initializer::public(&[], |_, _| Ok(()))]),
	),
	bool: Type::builtin("bool", TypeKind::Value, Primitive::Bool, Box::default()),
	int: Type::builtin("int", TypeKind::Value, Primitive::Int, Box::default()),
	float: Type::builtin("float", TypeKind::Value, Primitive::Float, Box::default()),
	string: Type::builtin("string", TypeKind::Reference, Primitive::String, Box::default()),
});

impl Type {
	fn builtin(name: &str, kind: TypeKind, primitive: Primitive, initializers: Box<[Initializer]>) -> Self {
		Self(Arc::new(TypeDesc {
			id: TypeId::next(),
			name: name.into(),
			kind,
			primitive: Some(primitive),
			base: None,
			fields: Box::default(),
			initializers,
		}))
	}

	/// Root reference type, default-constructible to an empty object.
	pub fn object() -> Type {
		BUILTINS.object.clone()
	}

	pub fn bool() -> Type {
		BUILTINS.bool.clone()
	}

	pub fn int() -> Type {
		BUILTINS.int.clone()
	}

	pub fn float() -> Type {
		BUILTINS.float.clone()
	}

	pub fn string() -> Type {
		BUILTINS.string.clone()
	}

	/// Starts a user-defined value type.
	pub fn value_type(name: &str) -> TypeBuilder {
		TypeBuilder::new(name, TypeKind::Value)
	}

	/// Starts a user-defined reference type.
	pub fn reference_type(name: &str) -> TypeBuilder {
		TypeBuilder::new(name, TypeKind::Reference)
	}

	/// Returns true if a value of type `other` may be stored where `self` is expected.
	///
	/// Value types are only assignable to themselves and, through boxing, to the object root.
	pub fn is_assignable_from(&self, other: &Type) -> bool {
		if self == other {
			return true;
		}
		if self.is_value_type() {
			return false;
		}
		if self.primitive == Some(Primitive::Object) {
			return true;
		}
		if other.is_value_type() {
			return false;
		}
		std::iter::successors(other.base(), |&t| t.base()).any(|ancestor| ancestor == self)
	}

	/// Returns true if storing a `constructed` instance as `self` requires boxing.
	pub fn needs_boxing(&self, constructed: &Type) -> bool {
		constructed.is_value_type() && !self.is_value_type()
	}

	/// Returns true if `value` may be passed where `self` is expected.
	pub fn accepts(&self, value: &Value) -> bool {
		match value.runtime_type() {
			None => !self.is_value_type(),
			Some(rt) if value.is_boxed() => !self.is_value_type() && self.is_assignable_from(&rt),
			Some(rt) => self.is_assignable_from(&rt),
		}
	}
}

impl Deref for Type {
	type Target = TypeDesc;

	fn deref(&self) -> &TypeDesc {
		&self.0
	}
}

impl PartialEq for Type {
	fn eq(&self, other: &Self) -> bool {
		self.0.id == other.0.id
	}
}

impl Eq for Type {}

impl Hash for Type {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.id.hash(state);
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0.name)
	}
}

impl fmt::Debug for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Type({}#{})", self.0.name, self.0.id.as_u32())
	}
}

/// Builder for user-defined types.
///
/// Validation happens in [`TypeBuilder::build`]; the resulting [`Type`] is immutable.
pub struct TypeBuilder {
	name: Box<str>,
	kind: TypeKind,
	base: Option<Type>,
	fields: Vec<FieldDesc>,
	initializers: Vec<Initializer>,
}

impl TypeBuilder {
	fn new(name: &str, kind: TypeKind) -> Self {
		Self {
			name: name.into(),
			kind,
			base: None,
			fields: Vec::new(),
			initializers: Vec::new(),
		}
	}

	/// Derives from `base`, inheriting its fields (not its initializers).
	pub fn base(mut self, base: &Type) -> Self {
		self.base = Some(base.clone());
		self
	}

	pub fn field(mut self, name: &str, ty: &Type) -> Self {
		self.fields.push(FieldDesc {
			name: name.into(),
			ty: ty.clone(),
			init: None,
		});
		self
	}

	/// Adds a field with a field-initializer expression.
	pub fn field_with<F>(mut self, name: &str, ty: &Type, init: F) -> Self
	where
		F: Fn() -> Value + Send + Sync + 'static,
	{
		self.fields.push(FieldDesc {
			name: name.into(),
			ty: ty.clone(),
			init: Some(Arc::new(init)),
		});
		self
	}

	pub fn initializer(mut self, init: Initializer) -> Self {
		self.initializers.push(init);
		self
	}

	pub fn build(self) -> Result<Type, TypeError> {
		if let Some(base) = &self.base {
			if self.kind == TypeKind::Value {
				return Err(TypeError::ValueTypeBase { ty: self.name });
			}
			if base.is_value_type() {
				return Err(TypeError::BaseNotReference {
					ty: self.name,
					base: base.name().into(),
				});
			}
		}

		let inherited = self.base.as_ref().map(|b| b.fields()).unwrap_or_default();
		let mut fields: Vec<FieldDesc> = Vec::with_capacity(inherited.len() + self.fields.len());
		fields.extend_from_slice(inherited);
		for field in self.fields {
			if fields.iter().any(|f| f.name == field.name) {
				return Err(TypeError::DuplicateField {
					ty: self.name,
					field: field.name,
				});
			}
			fields.push(field);
		}

		for (i, init) in self.initializers.iter().enumerate() {
			if self.initializers[..i].iter().any(|prev| prev.params() == init.params()) {
				return Err(TypeError::DuplicateInitializer {
					ty: self.name,
					params: Initializer::render_params(init.params()),
				});
			}
		}

		Ok(Type(Arc::new(TypeDesc {
			id: TypeId::next(),
			name: self.name,
			kind: self.kind,
			primitive: None,
			base: self.base,
			fields: fields.into_boxed_slice(),
			initializers: self.initializers.into_boxed_slice(),
		})))
	}
}
