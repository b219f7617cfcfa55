//! Activation synthesis.
//!
//! # Role
//!
//! Turns a resolved initializer into a [`Factory`] specialized for one requested signature.
//! Everything that can be decided ahead of time (which initializer, whether the result needs
//! boxing, the zero value for implicit construction) is captured once here so that invoking
//! the factory does no further discovery.
//!
//! # Invariants
//!
//! - Signature validation runs before matching and before any instance exists.
//! - The visibility flag equals the resolved initializer's visibility (public for implicit zero).

use forge_types::{InvokeError, Type, host};

use crate::error::{ActivationError, Result};
use crate::matcher::Resolved;
use crate::{CallSignature, Factory};

/// A freshly synthesized callable and the visibility of the initializer behind it.
pub(crate) struct Synthesized {
	pub(crate) factory: Factory,
	pub(crate) public: bool,
}

/// Rejects signatures that can never be bound to an initializer of `ty`.
pub(crate) fn validate(ty: &Type, sig: &CallSignature) -> Result<()> {
	if sig.result_by_ref() || sig.params().iter().any(|p| !p.mode.is_by_value()) {
		return Err(ActivationError::UnsupportedParameterMode {
			ty: ty.name().into(),
			signature: sig.to_string(),
		});
	}
	if !sig.result().is_assignable_from(ty) {
		return Err(ActivationError::IncompatibleResultType {
			ty: ty.name().into(),
			result: sig.result().name().into(),
		});
	}
	Ok(())
}

pub(crate) fn synthesize(ty: &Type, resolved: Resolved<'_>, sig: &CallSignature) -> Synthesized {
	let public = resolved.is_public();
	let boxing = sig.result().needs_boxing(ty);

	let factory = match resolved {
		Resolved::Declared(init) => {
			let ty = ty.clone();
			let init = init.clone();
			Factory::new(sig.clone(), move |args| {
				let value = host::construct(&ty, &init, args)?;
				Ok(if boxing { value.into_boxed() } else { value })
			})
		}
		Resolved::ImplicitZero => {
			let name: Box<str> = ty.name().into();
			let zero = host::zero_value(ty);
			let zero = if boxing { zero.into_boxed() } else { zero };
			Factory::new(sig.clone(), move |args| {
				if !args.is_empty() {
					return Err(InvokeError::Arity {
						ty: name.clone(),
						expected: 0,
						got: args.len(),
					});
				}
				Ok(zero.clone())
			})
		}
	};

	Synthesized { factory, public }
}

#[cfg(test)]
mod tests {
	use forge_types::{Initializer, Type, Value};

	use super::*;
	use crate::matcher::resolve;

	fn pair() -> Type {
		Type::value_type("Pair")
			.field("name", &Type::string())
			.field("n", &Type::int())
			.initializer(Initializer::public(&[&Type::string(), &Type::int()], |fields, args| {
				fields.set("name", args[0].clone())?;
				fields.set("n", args[1].clone())
			}))
			.build()
			.unwrap()
	}

	#[test]
	fn rejects_by_ref_shapes_before_result_check() {
		let ty = pair();
		let unrelated = Type::reference_type("Unrelated").build().unwrap();
		let sig = CallSignature::returning(&unrelated).param_ref(&Type::int());
		assert!(matches!(
			validate(&ty, &sig),
			Err(ActivationError::UnsupportedParameterMode { .. })
		));

		let sig = CallSignature::returning(&ty).param_out(&Type::int());
		assert!(matches!(
			validate(&ty, &sig),
			Err(ActivationError::UnsupportedParameterMode { .. })
		));

		let sig = CallSignature::returning(&ty).by_ref_result();
		assert!(matches!(
			validate(&ty, &sig),
			Err(ActivationError::UnsupportedParameterMode { .. })
		));
	}

	#[test]
	fn rejects_unrelated_result() {
		let ty = pair();
		let sig = CallSignature::new([&Type::string(), &Type::int()], &Type::string());
		assert_eq!(
			validate(&ty, &sig),
			Err(ActivationError::IncompatibleResultType {
				ty: "Pair".into(),
				result: "string".into(),
			})
		);
	}

	#[test]
	fn value_type_boxed_for_object_result() {
		let ty = pair();
		let sig = CallSignature::new([&Type::string(), &Type::int()], &Type::object());
		validate(&ty, &sig).unwrap();
		let resolved = resolve(&ty, &sig.param_types()).unwrap();
		let synth = synthesize(&ty, resolved, &sig);
		assert!(synth.public);

		let value = synth.factory.invoke(&[Value::from("a"), Value::Int(1)]).unwrap();
		assert!(value.is_boxed());
		assert_eq!(value.field("n"), Some(Value::Int(1)));
	}

	#[test]
	fn implicit_zero_factory() {
		let ty = Type::value_type("Zeroed").field("n", &Type::int()).build().unwrap();
		let sig = CallSignature::returning(&ty);
		let synth = synthesize(&ty, resolve(&ty, &[]).unwrap(), &sig);
		assert!(synth.public);
		let value = synth.factory.invoke(&[]).unwrap();
		assert!(!value.is_boxed());
		assert_eq!(value.field("n"), Some(Value::Int(0)));
		assert!(synth.factory.invoke(&[Value::Int(1)]).is_err());
	}
}
