use std::fmt;

use forge_types::{ParamMode, Type};
use smallvec::SmallVec;

/// One requested parameter: its type and how it is passed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SigParam {
	pub ty: Type,
	pub mode: ParamMode,
}

impl fmt::Display for SigParam {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.mode {
			ParamMode::ByValue => write!(f, "{}", self.ty),
			ParamMode::ByRef => write!(f, "ref {}", self.ty),
			ParamMode::Out => write!(f, "out {}", self.ty),
		}
	}
}

/// Shape of the callable a caller wants: ordered parameters plus a result type.
///
/// Two signatures are equal iff their parameters and results are pairwise identical types
/// with identical passing modes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSignature {
	params: SmallVec<[SigParam; 4]>,
	result: Type,
	result_by_ref: bool,
}

impl CallSignature {
	/// Signature taking every parameter by value.
	pub fn new<'a>(params: impl IntoIterator<Item = &'a Type>, result: &Type) -> Self {
		Self {
			params: params
				.into_iter()
				.map(|ty| SigParam {
					ty: ty.clone(),
					mode: ParamMode::ByValue,
				})
				.collect(),
			result: result.clone(),
			result_by_ref: false,
		}
	}

	/// Parameterless signature producing `result`.
	pub fn returning(result: &Type) -> Self {
		Self::new(std::iter::empty::<&Type>(), result)
	}

	pub fn param(self, ty: &Type) -> Self {
		self.with_param(ty, ParamMode::ByValue)
	}

	pub fn param_ref(self, ty: &Type) -> Self {
		self.with_param(ty, ParamMode::ByRef)
	}

	pub fn param_out(self, ty: &Type) -> Self {
		self.with_param(ty, ParamMode::Out)
	}

	/// Requests that the result be returned by reference.
	pub fn by_ref_result(mut self) -> Self {
		self.result_by_ref = true;
		self
	}

	fn with_param(mut self, ty: &Type, mode: ParamMode) -> Self {
		self.params.push(SigParam { ty: ty.clone(), mode });
		self
	}

	pub fn params(&self) -> &[SigParam] {
		&self.params
	}

	/// Parameter types, in order.
	pub fn param_types(&self) -> SmallVec<[Type; 4]> {
		self.params.iter().map(|p| p.ty.clone()).collect()
	}

	pub fn result(&self) -> &Type {
		&self.result
	}

	pub fn result_by_ref(&self) -> bool {
		self.result_by_ref
	}

	pub fn arity(&self) -> usize {
		self.params.len()
	}
}

impl fmt::Display for CallSignature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("(")?;
		for (i, param) in self.params.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{param}")?;
		}
		f.write_str(") -> ")?;
		if self.result_by_ref {
			f.write_str("ref ")?;
		}
		write!(f, "{}", self.result)
	}
}
