//! Reflective host primitives.
//!
//! # Role
//!
//! These are the slow, general-purpose operations a host type system offers: every call
//! re-inspects the descriptor. The activation engine builds specialized callables on top of
//! [`construct`] and falls back to [`create_default`] when it may not synthesize code.
//!
//! # Invariants
//!
//! - [`allocate_uninitialized`] never runs a field initializer or an initializer body.
//! - [`construct`] runs field initializers in declaration order, then the body.

use smallvec::SmallVec;

use crate::{Fields, Initializer, InvokeError, ObjectRef, Primitive, StructValue, Type, Value};

/// The type's zero value: `false`, `0`, `0.0`, null, or a struct of zero fields.
pub fn zero_value(ty: &Type) -> Value {
	match ty.primitive() {
		Some(Primitive::Bool) => Value::Bool(false),
		Some(Primitive::Int) => Value::Int(0),
		Some(Primitive::Float) => Value::Float(0.0),
		Some(Primitive::String | Primitive::Object) => Value::Null,
		None if ty.is_value_type() => Value::Struct(StructValue::new(ty.clone(), zero_slots(ty))),
		None => Value::Null,
	}
}

/// Raw allocation: an instance whose fields all hold their zero values.
///
/// Unlike [`zero_value`], reference types produce a live (non-null) instance.
pub fn allocate_uninitialized(ty: &Type) -> Value {
	match ty.primitive() {
		Some(Primitive::String) => Value::Str("".into()),
		Some(Primitive::Object) => Value::Object(ObjectRef::new(ty.clone(), Box::default())),
		_ if ty.is_value_type() => zero_value(ty),
		_ => Value::Object(ObjectRef::new(ty.clone(), zero_slots(ty))),
	}
}

/// Invokes `init` on a fresh instance of `ty`.
///
/// Arguments are checked against the declared parameters and coerced (boxed) where a
/// reference-typed parameter receives an unboxed value.
pub fn construct(ty: &Type, init: &Initializer, args: &[Value]) -> Result<Value, InvokeError> {
	check_args(ty, init, args)?;
	let args: SmallVec<[Value; 4]> = args
		.iter()
		.zip(init.params())
		.map(|(arg, param)| arg.clone().coerce_to(&param.ty))
		.collect();

	let mut slots = zero_slots(ty);
	run_field_initializers(ty, &mut slots)?;
	(init.body())(&mut Fields::new(ty, &mut slots), &args)?;

	Ok(if ty.is_value_type() {
		Value::Struct(StructValue::new(ty.clone(), slots))
	} else {
		Value::Object(ObjectRef::new(ty.clone(), slots))
	})
}

/// Generic "construct a default instance" primitive.
///
/// Only public parameterless initializers are reachable; value types without a declared one
/// yield their zero value. The initializer is looked up again on every call.
pub fn create_default(ty: &Type) -> Result<Value, InvokeError> {
	match ty.parameterless_initializer() {
		Some(init) if init.is_public() => construct(ty, init, &[]),
		None if ty.is_value_type() => Ok(zero_value(ty)),
		_ => Err(InvokeError::NoPublicDefault { ty: ty.name().into() }),
	}
}

fn zero_slots(ty: &Type) -> Box<[Value]> {
	ty.fields().iter().map(|f| zero_value(&f.ty)).collect()
}

fn run_field_initializers(ty: &Type, slots: &mut [Value]) -> Result<(), InvokeError> {
	for (slot, field) in slots.iter_mut().zip(ty.fields()) {
		let Some(init) = &field.init else {
			continue;
		};
		let value = init();
		if !field.ty.accepts(&value) {
			return Err(InvokeError::FieldType {
				ty: ty.name().into(),
				field: field.name.clone(),
				expected: field.ty.name().into(),
				got: value.describe(),
			});
		}
		*slot = value.coerce_to(&field.ty);
	}
	Ok(())
}

fn check_args(ty: &Type, init: &Initializer, args: &[Value]) -> Result<(), InvokeError> {
	let params = init.params();
	if params.len() != args.len() {
		return Err(InvokeError::Arity {
			ty: ty.name().into(),
			expected: params.len(),
			got: args.len(),
		});
	}
	for (index, (param, arg)) in params.iter().zip(args).enumerate() {
		if !param.ty.accepts(arg) {
			return Err(InvokeError::ArgumentType {
				ty: ty.name().into(),
				index,
				expected: param.ty.name().into(),
				got: arg.describe(),
			});
		}
	}
	Ok(())
}
