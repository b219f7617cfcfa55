use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::Type;

/// Dynamic instance of a host type.
#[derive(Clone, Debug, Default)]
pub enum Value {
	/// Zero value of every reference type.
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(Arc<str>),
	/// Unboxed instance of a user-defined value type.
	Struct(StructValue),
	/// Instance of a user-defined reference type.
	Object(ObjectRef),
	/// Value-type instance boxed into a reference.
	Boxed(Arc<Value>),
}

impl Value {
	/// The type this value was created as, or `None` for null.
	pub fn runtime_type(&self) -> Option<Type> {
		match self {
			Value::Null => None,
			Value::Bool(_) => Some(Type::bool()),
			Value::Int(_) => Some(Type::int()),
			Value::Float(_) => Some(Type::float()),
			Value::Str(_) => Some(Type::string()),
			Value::Struct(s) => Some(s.ty.clone()),
			Value::Object(o) => Some(o.ty().clone()),
			Value::Boxed(inner) => inner.runtime_type(),
		}
	}

	/// Short human-readable description used in error messages.
	pub fn describe(&self) -> String {
		match (self.runtime_type(), self.is_boxed()) {
			(None, _) => "null".to_string(),
			(Some(ty), true) => format!("boxed {ty}"),
			(Some(ty), false) => ty.to_string(),
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn is_boxed(&self) -> bool {
		matches!(self, Value::Boxed(_))
	}

	fn is_unboxed_value(&self) -> bool {
		matches!(self, Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Struct(_))
	}

	/// Boxes unboxed value-type instances; references and null pass through.
	pub fn into_boxed(self) -> Value {
		if self.is_unboxed_value() {
			Value::Boxed(Arc::new(self))
		} else {
			self
		}
	}

	/// Adapts the value for storage in a slot of type `ty`.
	pub fn coerce_to(self, ty: &Type) -> Value {
		if ty.is_value_type() { self } else { self.into_boxed() }
	}

	/// Looks through one level of boxing.
	pub fn unboxed(&self) -> &Value {
		match self {
			Value::Boxed(inner) => inner,
			other => other,
		}
	}

	/// Reads a field of a struct, object or boxed struct.
	pub fn field(&self, name: &str) -> Option<Value> {
		match self {
			Value::Struct(s) => s.field(name).cloned(),
			Value::Object(o) => o.field(name),
			Value::Boxed(inner) => inner.field(name),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self.unboxed() {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self.unboxed() {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self.unboxed() {
			Value::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&ObjectRef> {
		match self {
			Value::Object(o) => Some(o),
			_ => None,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Int(a), Value::Int(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a == b,
			(Value::Str(a), Value::Str(b)) => a == b,
			(Value::Struct(a), Value::Struct(b)) => a == b,
			(Value::Object(a), Value::Object(b)) => a == b,
			(Value::Boxed(a), Value::Boxed(b)) => a == b,
			_ => false,
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(v.into())
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Str(v.into())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Str(v.into())
	}
}

impl From<StructValue> for Value {
	fn from(v: StructValue) -> Self {
		Value::Struct(v)
	}
}

impl From<ObjectRef> for Value {
	fn from(v: ObjectRef) -> Self {
		Value::Object(v)
	}
}

/// Inline instance of a value type.
#[derive(Clone, Debug, PartialEq)]
pub struct StructValue {
	ty: Type,
	fields: Box<[Value]>,
}

impl StructValue {
	pub(crate) fn new(ty: Type, fields: Box<[Value]>) -> Self {
		Self { ty, fields }
	}

	pub fn ty(&self) -> &Type {
		&self.ty
	}

	pub fn field(&self, name: &str) -> Option<&Value> {
		self.ty.field_index(name).map(|idx| &self.fields[idx])
	}

	pub fn fields(&self) -> &[Value] {
		&self.fields
	}
}

/// Heap instance of a reference type.
pub struct Object {
	ty: Type,
	fields: RwLock<Box<[Value]>>,
}

impl Object {
	pub fn ty(&self) -> &Type {
		&self.ty
	}
}

/// Shared handle to an [`Object`]. Equality is reference identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

impl ObjectRef {
	pub(crate) fn new(ty: Type, fields: Box<[Value]>) -> Self {
		Self(Arc::new(Object {
			ty,
			fields: RwLock::new(fields),
		}))
	}

	pub fn ty(&self) -> &Type {
		&self.0.ty
	}

	pub fn field(&self, name: &str) -> Option<Value> {
		let idx = self.0.ty.field_index(name)?;
		Some(self.0.fields.read()[idx].clone())
	}

	/// Overwrites a field after construction. Returns false for unknown fields or mismatched values.
	pub fn set_field(&self, name: &str, value: Value) -> bool {
		let Some(idx) = self.0.ty.field_index(name) else {
			return false;
		};
		let field_ty = &self.0.ty.fields()[idx].ty;
		if !field_ty.accepts(&value) {
			return false;
		}
		self.0.fields.write()[idx] = value.coerce_to(field_ty);
		true
	}

	pub fn field_count(&self) -> usize {
		self.0.fields.read().len()
	}
}

impl PartialEq for ObjectRef {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for ObjectRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Object")
			.field("ty", &self.0.ty)
			.field("fields", &*self.0.fields.read())
			.finish()
	}
}
