use std::sync::{Arc, OnceLock};

use forge_types::{Type, Value};

use crate::cache::ActivationCache;
use crate::default::DefaultActivators;
use crate::error::{ActivationError, Result};
use crate::stats::{Counters, Stats};
use crate::{ActivatorConfig, CallSignature, DefaultActivator, Factory, FormattableFactory, create_uninitialized};

static GLOBAL: OnceLock<Activator> = OnceLock::new();

/// Process-wide activator, configured from the environment on first use.
pub fn global() -> &'static Activator {
	GLOBAL.get_or_init(|| Activator::new(ActivatorConfig::from_env()))
}

/// Constructor resolution and caching engine.
///
/// All operations run synchronously on the calling thread and may be called concurrently.
pub struct Activator {
	config: ActivatorConfig,
	dynamic_code: bool,
	cache: ActivationCache,
	defaults: DefaultActivators,
	counters: Counters,
}

impl Activator {
	pub fn new(config: ActivatorConfig) -> Self {
		let dynamic_code = config.dynamic_code_supported();
		tracing::debug!(?config, dynamic_code, "activator created");
		Self {
			config,
			dynamic_code,
			cache: ActivationCache::new(),
			defaults: DefaultActivators::new(),
			counters: Counters::default(),
		}
	}

	pub fn config(&self) -> &ActivatorConfig {
		&self.config
	}

	/// Creates a new instance through the type's default activator.
	pub fn create_instance(&self, ty: &Type, allow_non_public: bool) -> Result<Value> {
		let activator = self.default_activator(ty, allow_non_public)?;
		Ok(activator.create()?)
	}

	/// Creates an instance without running any initializer.
	pub fn create_uninitialized(&self, ty: &Type) -> Value {
		create_uninitialized(ty)
	}

	/// Returns the per-type parameterless activator.
	pub fn default_activator(&self, ty: &Type, allow_non_public: bool) -> Result<Arc<DefaultActivator>> {
		self.defaults.get(ty, allow_non_public, self.dynamic_code, &self.cache, &self.counters)
	}

	/// Returns a callable invoking the initializer of `ty` matching `sig`.
	pub fn activator(&self, ty: &Type, sig: &CallSignature, allow_non_public: bool) -> Result<Factory> {
		self.cache.get(ty, sig, allow_non_public, &self.counters)
	}

	/// Returns a producer that never fails to resolve: default activation when the type has a
	/// parameterless initializer (public or not), uninitialized allocation otherwise.
	pub fn formattable_factory(&self, ty: &Type) -> FormattableFactory {
		match self.default_activator(ty, true) {
			Ok(activator) => FormattableFactory::from_default(ty, activator),
			Err(err) => {
				if !matches!(err, ActivationError::NoDefaultInitializer { .. }) {
					tracing::warn!(ty = %ty, %err, "unexpected default activation failure");
				}
				tracing::debug!(ty = %ty, "no default initializer; formattable factory falls back to uninitialized");
				FormattableFactory::uninitialized(ty)
			}
		}
	}

	pub fn stats(&self) -> Stats {
		self.counters.snapshot()
	}

	/// Number of published `(type, signature)` activation entries.
	pub fn cached_activators(&self) -> usize {
		self.cache.len()
	}

	/// Number of published default activators.
	pub fn cached_default_activators(&self) -> usize {
		self.defaults.len()
	}
}

impl Default for Activator {
	fn default() -> Self {
		Self::new(ActivatorConfig::default())
	}
}
