//! Animation blending: three mutually exclusive presets mixed by weights.
//!
//! # Invariants
//! - Weights stay within [0, 1] at every step.
//! - At most one transition is in flight; activating a channel replaces it.
//! - A completed transition leaves exactly the activated channel at 1.

mod blend;
mod easing;

pub use blend::{AnimationBlendController, AnimationError, BlendChannel, BlendConfig};
pub use easing::Easing;

pub fn crate_info() -> &'static str {
    "glyphfield-animation v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("animation"));
    }
}
