use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use forge_types::{Initializer, Type, Value};

use crate::{Activator, ActivatorConfig, DynamicCode};

/// Activator on a host that can synthesize code.
pub(crate) fn jit() -> Activator {
	Activator::new(ActivatorConfig::new(DynamicCode::Enabled))
}

/// Activator on an ahead-of-time-only host.
pub(crate) fn aot() -> Activator {
	Activator::new(ActivatorConfig::new(DynamicCode::Disabled))
}

/// Reference type with a public parameterless initializer (`count = 7`) and a public
/// `(string, int)` initializer. `count` also has a field initializer (`3`).
pub(crate) fn widget() -> Type {
	counted_widget(Arc::new(AtomicUsize::new(0)))
}

/// [`widget`] whose initializer bodies bump `runs`.
pub(crate) fn counted_widget(runs: Arc<AtomicUsize>) -> Type {
	let runs_default = Arc::clone(&runs);
	Type::reference_type("Widget")
		.field("name", &Type::string())
		.field_with("count", &Type::int(), || Value::Int(3))
		.initializer(Initializer::public(&[], move |fields, _| {
			runs_default.fetch_add(1, Ordering::SeqCst);
			fields.set("name", "default")?;
			fields.set("count", Value::Int(7))
		}))
		.initializer(Initializer::public(&[&Type::string(), &Type::int()], move |fields, args| {
			runs.fetch_add(1, Ordering::SeqCst);
			fields.set("name", args[0].clone())?;
			fields.set("count", args[1].clone())
		}))
		.build()
		.expect("Widget builds")
}

/// Value type with no declared initializer.
pub(crate) fn point() -> Type {
	Type::value_type("Point")
		.field("x", &Type::int())
		.field("y", &Type::int())
		.build()
		.expect("Point builds")
}

/// Value type with an explicit public parameterless initializer (`n = 9`).
pub(crate) fn ticket() -> Type {
	Type::value_type("Ticket")
		.field("n", &Type::int())
		.initializer(Initializer::public(&[], |fields, _| fields.set("n", Value::Int(9))))
		.build()
		.expect("Ticket builds")
}

/// Reference type whose only initializer is non-public and parameterless (`token = 42`).
pub(crate) fn secret() -> Type {
	Type::reference_type("Secret")
		.field("token", &Type::int())
		.initializer(Initializer::non_public(&[], |fields, _| fields.set("token", Value::Int(42))))
		.build()
		.expect("Secret builds")
}

/// Reference type whose only initializer is non-public and takes an `int`.
pub(crate) fn sealed() -> Type {
	Type::reference_type("Sealed")
		.field("n", &Type::int())
		.initializer(Initializer::non_public(&[&Type::int()], |fields, args| fields.set("n", args[0].clone())))
		.build()
		.expect("Sealed builds")
}

/// Reference type with no initializers.
pub(crate) fn unrelated() -> Type {
	Type::reference_type("Unrelated").build().expect("Unrelated builds")
}
