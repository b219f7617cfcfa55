//! Signature matching.
//!
//! Exact matching only: no overload ranking, no implicit conversions, no variadics. Both public
//! and non-public initializers are candidates; usability is decided by the caller.

use forge_types::{Initializer, Type};

use crate::error::{ActivationError, Result};

/// Outcome of matching a parameter list against a type's initializers.
#[derive(Debug)]
pub(crate) enum Resolved<'t> {
	Declared(&'t Initializer),
	/// Parameterless request on a value type that declares no parameterless initializer.
	ImplicitZero,
}

impl Resolved<'_> {
	pub(crate) fn is_public(&self) -> bool {
		match self {
			Resolved::Declared(init) => init.is_public(),
			Resolved::ImplicitZero => true,
		}
	}
}

/// Finds the initializer on `ty` whose by-value parameters are exactly `params`.
///
/// A declared parameterless initializer always wins over the implicit zero value.
pub(crate) fn resolve<'t>(ty: &'t Type, params: &[Type]) -> Result<Resolved<'t>> {
	if let Some(init) = ty.initializers().iter().find(|init| init.matches(params)) {
		return Ok(Resolved::Declared(init));
	}
	if params.is_empty() && ty.is_value_type() {
		return Ok(Resolved::ImplicitZero);
	}
	Err(ActivationError::NoMatchingInitializer {
		ty: ty.name().into(),
		params: params.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
	})
}

#[cfg(test)]
mod tests {
	use forge_types::{Initializer, Param, Type, Visibility};

	use super::*;

	#[test]
	fn exact_match_only() {
		let ty = Type::reference_type("Pair")
			.initializer(Initializer::public(&[&Type::string(), &Type::int()], |_, _| Ok(())))
			.build()
			.unwrap();

		assert!(matches!(resolve(&ty, &[Type::string(), Type::int()]), Ok(Resolved::Declared(_))));
		// Order matters and no conversions apply.
		assert!(resolve(&ty, &[Type::int(), Type::string()]).is_err());
		assert!(resolve(&ty, &[Type::object(), Type::int()]).is_err());
		assert!(resolve(&ty, &[Type::string()]).is_err());
	}

	#[test]
	fn non_public_initializers_are_candidates() {
		let ty = Type::reference_type("Hidden")
			.initializer(Initializer::non_public(&[&Type::int()], |_, _| Ok(())))
			.build()
			.unwrap();
		let resolved = resolve(&ty, &[Type::int()]).unwrap();
		assert!(!resolved.is_public());
	}

	#[test]
	fn by_ref_declarations_never_match() {
		let ty = Type::reference_type("Refs")
			.initializer(Initializer::new([Param::by_ref(&Type::int())], Visibility::Public, |_, _| Ok(())))
			.build()
			.unwrap();
		assert_eq!(
			resolve(&ty, &[Type::int()]).unwrap_err(),
			ActivationError::NoMatchingInitializer {
				ty: "Refs".into(),
				params: "int".to_string(),
			}
		);
	}

	#[test]
	fn implicit_zero_only_without_declared_parameterless() {
		let bare = Type::value_type("Bare").field("n", &Type::int()).build().unwrap();
		assert!(matches!(resolve(&bare, &[]), Ok(Resolved::ImplicitZero)));

		let declared = Type::value_type("Declared")
			.initializer(Initializer::non_public(&[], |_, _| Ok(())))
			.build()
			.unwrap();
		let resolved = resolve(&declared, &[]).unwrap();
		assert!(matches!(resolved, Resolved::Declared(_)));
		assert!(!resolved.is_public());

		let reference = Type::reference_type("NoCtor").build().unwrap();
		assert!(matches!(
			resolve(&reference, &[]),
			Err(ActivationError::NoMatchingInitializer { .. })
		));
	}
}
