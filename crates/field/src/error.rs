use glyphfield_animation::AnimationError;
use glyphfield_common::LayoutError;
use glyphfield_mesh::MeshError;
use glyphfield_render::ParamError;

/// Errors from field construction and per-frame operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Parameter(#[from] ParamError),
    #[error(transparent)]
    Animation(#[from] AnimationError),
    #[error("invalid time step: {0}")]
    InvalidTimeStep(String),
    #[error("atlas texture is not bound; call bind_atlas before update")]
    AtlasNotBound,
}

/// Failure category, for callers that branch on kind rather than cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid construction arguments or an operation out of order.
    Configuration,
    /// Atlas layout arithmetic mismatch.
    Layout,
    /// Parameter name outside the schema, or a type mismatch.
    UnknownParameter,
    /// Channel index outside 1..=3.
    Range,
}

impl FieldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FieldError::Mesh(_) | FieldError::InvalidTimeStep(_) | FieldError::AtlasNotBound => {
                ErrorKind::Configuration
            }
            FieldError::Layout(_) => ErrorKind::Layout,
            FieldError::Parameter(_) => ErrorKind::UnknownParameter,
            FieldError::Animation(AnimationError::ChannelOutOfRange(_)) => ErrorKind::Range,
            FieldError::Animation(AnimationError::InvalidDuration(_)) => ErrorKind::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_from_causes() {
        assert_eq!(
            FieldError::from(MeshError::ZeroCells).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            FieldError::from(LayoutError::ZeroColumns).kind(),
            ErrorKind::Layout
        );
        assert_eq!(
            FieldError::from(ParamError::Unknown("x".into())).kind(),
            ErrorKind::UnknownParameter
        );
        assert_eq!(
            FieldError::from(AnimationError::ChannelOutOfRange(9)).kind(),
            ErrorKind::Range
        );
        assert_eq!(
            FieldError::from(AnimationError::InvalidDuration(0.0)).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(FieldError::AtlasNotBound.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn messages_pass_through() {
        let err = FieldError::from(AnimationError::ChannelOutOfRange(7));
        assert!(err.to_string().contains("channel 7"));
    }
}
