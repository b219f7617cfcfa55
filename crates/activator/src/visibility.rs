use forge_types::Type;

use crate::error::{ActivationError, Result};

/// Callers must opt in to non-public initializers, on every request.
#[inline]
pub(crate) fn ensure_visible(ty: &Type, public: bool, allow_non_public: bool) -> Result<()> {
	if public || allow_non_public {
		Ok(())
	} else {
		Err(ActivationError::NonPublicInitializerDenied { ty: ty.name().into() })
	}
}
