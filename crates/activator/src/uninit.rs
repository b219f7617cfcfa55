use forge_types::{Type, Value, host};

/// Produces an instance of `ty` with every field at its zero value.
///
/// No initializer body and no field-initializer expression runs. Value types yield their zero
/// value; reference types yield a live, zero-filled object rather than null.
pub fn create_uninitialized(ty: &Type) -> Value {
	tracing::trace!(ty = %ty, "allocating uninitialized instance");
	host::allocate_uninitialized(ty)
}
