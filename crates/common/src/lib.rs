//! Shared data model for the glyph field crates.
//!
//! # Invariants
//! - An `AtlasLayout` that passed `validate` satisfies
//!   `rows == ceil(used_length / columns)`.
//! - Texture handles are opaque; nothing here inspects pixel content.

mod types;

pub use types::{AtlasLayout, LayoutError, TextureHandle};

pub fn crate_info() -> &'static str {
    "glyphfield-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
