//! Animated character field: the drawable unit composed from quad geometry,
//! the shader parameter set and the blend controller.
//!
//! # Invariants
//! - Geometry is built once at construction and never mutated.
//! - `update` requires a successfully bound atlas; a failed bind unbinds.
//! - The `time` parameter only grows.
//! - All state is owned by one field; nothing is shared between fields.

mod config;
mod error;
mod field;

pub use config::{ConfigError, DEFAULT_GLYPHS, FieldConfig, TimeStep};
pub use error::{ErrorKind, FieldError};
pub use field::AnimatedCharacterField;

pub fn crate_info() -> &'static str {
    "glyphfield-field v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("field"));
    }
}
