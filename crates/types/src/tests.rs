use pretty_assertions::assert_eq;

use crate::host::{allocate_uninitialized, construct, create_default, zero_value};
use crate::{Initializer, InvokeError, Param, Type, TypeError, Value, Visibility};

fn point() -> Type {
	Type::value_type("Point")
		.field("x", &Type::int())
		.field("y", &Type::int())
		.build()
		.expect("Point builds")
}

fn counter() -> Type {
	Type::reference_type("Counter")
		.field_with("start", &Type::int(), || Value::Int(10))
		.field("label", &Type::string())
		.initializer(Initializer::public(&[], |fields, _| fields.set("label", "fresh")))
		.initializer(Initializer::public(&[&Type::string()], |fields, args| {
			fields.set("label", args[0].clone())
		}))
		.build()
		.expect("Counter builds")
}

#[test]
fn types_compare_by_identity() {
	let a = Type::reference_type("Same").build().unwrap();
	let b = Type::reference_type("Same").build().unwrap();
	assert_ne!(a, b);
	assert_eq!(a, a.clone());
	assert_eq!(Type::int(), Type::int());
}

#[test]
fn assignability_follows_base_chain_and_object_root() {
	let animal = Type::reference_type("Animal").build().unwrap();
	let dog = Type::reference_type("Dog").base(&animal).build().unwrap();
	let rock = Type::reference_type("Rock").build().unwrap();

	assert!(animal.is_assignable_from(&dog));
	assert!(!dog.is_assignable_from(&animal));
	assert!(!animal.is_assignable_from(&rock));
	assert!(Type::object().is_assignable_from(&dog));
	assert!(Type::object().is_assignable_from(&point()));
	assert!(!Type::int().is_assignable_from(&Type::object()));
	assert!(Type::object().needs_boxing(&Type::int()));
	assert!(!Type::int().needs_boxing(&Type::int()));
}

#[test]
fn derived_types_inherit_fields() {
	let base = Type::reference_type("Base").field("id", &Type::int()).build().unwrap();
	let derived = Type::reference_type("Derived")
		.base(&base)
		.field("name", &Type::string())
		.build()
		.unwrap();
	let names: Vec<_> = derived.fields().iter().map(|f| &*f.name).collect();
	assert_eq!(names, vec!["id", "name"]);
}

#[test]
fn builder_rejects_invalid_shapes() {
	let err = Type::reference_type("Dup")
		.field("a", &Type::int())
		.field("a", &Type::bool())
		.build()
		.unwrap_err();
	assert!(matches!(err, TypeError::DuplicateField { .. }));

	let err = Type::reference_type("Twice")
		.initializer(Initializer::public(&[&Type::int()], |_, _| Ok(())))
		.initializer(Initializer::non_public(&[&Type::int()], |_, _| Ok(())))
		.build()
		.unwrap_err();
	assert_eq!(
		err,
		TypeError::DuplicateInitializer {
			ty: "Twice".into(),
			params: "int".to_string(),
		}
	);

	let base = Type::reference_type("Base").build().unwrap();
	let err = Type::value_type("V").base(&base).build().unwrap_err();
	assert!(matches!(err, TypeError::ValueTypeBase { .. }));

	let err = Type::reference_type("R").base(&point()).build().unwrap_err();
	assert!(matches!(err, TypeError::BaseNotReference { .. }));
}

#[test]
fn by_ref_overload_is_distinct_shape() {
	let ty = Type::reference_type("Refs")
		.initializer(Initializer::public(&[&Type::int()], |_, _| Ok(())))
		.initializer(Initializer::new([Param::by_ref(&Type::int())], Visibility::Public, |_, _| Ok(())))
		.build()
		.expect("by-ref overload is a different shape");
	assert_eq!(ty.initializers().len(), 2);
	assert!(ty.initializers()[0].matches(&[Type::int()]));
	assert!(!ty.initializers()[1].matches(&[Type::int()]));
}

#[test]
fn zero_values() {
	assert_eq!(zero_value(&Type::int()), Value::Int(0));
	assert_eq!(zero_value(&Type::bool()), Value::Bool(false));
	assert_eq!(zero_value(&Type::string()), Value::Null);
	assert_eq!(zero_value(&counter()), Value::Null);

	let p = zero_value(&point());
	assert_eq!(p.field("x"), Some(Value::Int(0)));
	assert_eq!(p.field("y"), Some(Value::Int(0)));
}

#[test]
fn construct_runs_field_initializers_then_body() {
	let ty = counter();
	let value = construct(&ty, &ty.initializers()[1], &[Value::from("named")]).unwrap();
	assert_eq!(value.field("start"), Some(Value::Int(10)));
	assert_eq!(value.field("label"), Some(Value::from("named")));
}

#[test]
fn construct_checks_arguments() {
	let ty = counter();
	let init = &ty.initializers()[1];
	assert!(matches!(
		construct(&ty, init, &[]),
		Err(InvokeError::Arity { expected: 1, got: 0, .. })
	));
	assert!(matches!(
		construct(&ty, init, &[Value::Int(3)]),
		Err(InvokeError::ArgumentType { index: 0, .. })
	));
	// Null is a valid string.
	assert!(construct(&ty, init, &[Value::Null]).is_ok());
}

#[test]
fn allocate_uninitialized_skips_all_initializers() {
	let value = allocate_uninitialized(&counter());
	let obj = value.as_object().expect("reference types allocate an object");
	assert_eq!(obj.field("start"), Some(Value::Int(0)));
	assert_eq!(obj.field("label"), Some(Value::Null));
	assert_eq!(obj.field_count(), 2);
}

#[test]
fn create_default_is_public_only() {
	let hidden = Type::reference_type("Hidden")
		.initializer(Initializer::non_public(&[], |_, _| Ok(())))
		.build()
		.unwrap();
	assert_eq!(
		create_default(&hidden),
		Err(InvokeError::NoPublicDefault { ty: "Hidden".into() })
	);
	let p = point();
	assert_eq!(create_default(&p), Ok(zero_value(&p)));
	let value = create_default(&counter()).unwrap();
	assert_eq!(value.field("label"), Some(Value::from("fresh")));
}

#[test]
fn root_object_is_default_constructible() {
	let object = Type::object();
	assert!(object.parameterless_initializer().is_some_and(|init| init.is_public()));
	let value = create_default(&object).unwrap();
	let obj = value.as_object().expect("root object constructs a live instance");
	assert_eq!(obj.ty(), &object);
	assert_eq!(obj.field_count(), 0);
}

#[test]
fn object_fields_box_value_types() {
	let holder = Type::reference_type("Holder")
		.field("any", &Type::object())
		.initializer(Initializer::public(&[&Type::object()], |fields, args| {
			fields.set("any", args[0].clone())
		}))
		.build()
		.unwrap();
	let value = construct(&holder, &holder.initializers()[0], &[Value::Int(5)]).unwrap();
	let any = value.field("any").unwrap();
	assert!(any.is_boxed());
	assert_eq!(any.as_int(), Some(5));

	let obj = value.as_object().unwrap();
	assert!(obj.set_field("any", Value::from("text")));
	assert!(!obj.set_field("missing", Value::Null));
}

#[test]
fn body_errors_surface() {
	let ty = Type::reference_type("Grumpy")
		.initializer(Initializer::public(&[], |_, _| Err(InvokeError::failed("no"))))
		.build()
		.unwrap();
	assert_eq!(
		construct(&ty, &ty.initializers()[0], &[]),
		Err(InvokeError::failed("no"))
	);
}
