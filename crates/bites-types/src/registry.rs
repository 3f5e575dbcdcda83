//! Registry trait for self-registering implementations.
//!
//! Every pluggable BuffBites backend (currently the share backends) exposes a
//! `Registry` type that names the implementation and hands out its factory.

/// Base trait for implementation registries.
///
/// The name must match the key used under `implementations` in the TOML
/// configuration, for example `share.implementations.file` for `"file"`.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
