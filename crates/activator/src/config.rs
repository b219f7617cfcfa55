//! Activator configuration.
//!
//! The only knob is whether the host may synthesize code at run time, which decides between
//! the host-generic and synthesized default-activation strategies.

/// Environment variable overriding [`DynamicCode`] detection.
pub const DYNAMIC_CODE_ENV: &str = "FORGE_DYNAMIC_CODE";

/// Run-time code synthesis capability of the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DynamicCode {
	/// Detect from the compilation target.
	#[default]
	Auto,
	Enabled,
	/// Ahead-of-time-only host; synthesized callables are avoided where the host offers a
	/// generic path.
	Disabled,
}

impl DynamicCode {
	pub fn is_supported(self) -> bool {
		match self {
			DynamicCode::Auto => !cfg!(target_family = "wasm"),
			DynamicCode::Enabled => true,
			DynamicCode::Disabled => false,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivatorConfig {
	pub dynamic_code: DynamicCode,
}

impl ActivatorConfig {
	pub fn new(dynamic_code: DynamicCode) -> Self {
		Self { dynamic_code }
	}

	/// Reads overrides from the process environment.
	pub fn from_env() -> Self {
		let raw = std::env::var(DYNAMIC_CODE_ENV).ok();
		Self {
			dynamic_code: parse_dynamic_code(raw.as_deref()),
		}
	}

	pub fn dynamic_code_supported(&self) -> bool {
		self.dynamic_code.is_supported()
	}
}

fn parse_dynamic_code(raw: Option<&str>) -> DynamicCode {
	let Some(raw) = raw else {
		return DynamicCode::Auto;
	};
	match raw.trim().to_ascii_lowercase().as_str() {
		"1" | "on" | "true" | "enabled" => DynamicCode::Enabled,
		"0" | "off" | "false" | "disabled" => DynamicCode::Disabled,
		"" | "auto" => DynamicCode::Auto,
		other => {
			tracing::warn!(var = DYNAMIC_CODE_ENV, value = other, "unrecognized value; using auto");
			DynamicCode::Auto
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_dynamic_code_values() {
		assert_eq!(parse_dynamic_code(None), DynamicCode::Auto);
		assert_eq!(parse_dynamic_code(Some("ON")), DynamicCode::Enabled);
		assert_eq!(parse_dynamic_code(Some(" true ")), DynamicCode::Enabled);
		assert_eq!(parse_dynamic_code(Some("0")), DynamicCode::Disabled);
		assert_eq!(parse_dynamic_code(Some("Disabled")), DynamicCode::Disabled);
		assert_eq!(parse_dynamic_code(Some("auto")), DynamicCode::Auto);
		assert_eq!(parse_dynamic_code(Some("sometimes")), DynamicCode::Auto);
	}

	#[test]
	fn explicit_modes_ignore_target() {
		assert!(DynamicCode::Enabled.is_supported());
		assert!(!DynamicCode::Disabled.is_supported());
		assert_eq!(ActivatorConfig::default().dynamic_code, DynamicCode::Auto);
	}
}
