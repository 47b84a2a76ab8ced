use std::fmt;

use glyphfield_render::ShaderParameterSet;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// One of the three animation presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendChannel {
    One,
    Two,
    Three,
}

impl BlendChannel {
    pub const ALL: [BlendChannel; 3] = [BlendChannel::One, BlendChannel::Two, BlendChannel::Three];

    /// Zero-based slot in a weight array.
    pub fn index(self) -> usize {
        match self {
            BlendChannel::One => 0,
            BlendChannel::Two => 1,
            BlendChannel::Three => 2,
        }
    }

    /// One-based channel number as used by control surfaces.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Weights with this channel fully on and the others off.
    pub fn target_weights(self) -> [f32; 3] {
        let mut weights = [0.0; 3];
        weights[self.index()] = 1.0;
        weights
    }
}

impl TryFrom<u8> for BlendChannel {
    type Error = AnimationError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(BlendChannel::One),
            2 => Ok(BlendChannel::Two),
            3 => Ok(BlendChannel::Three),
            other => Err(AnimationError::ChannelOutOfRange(other)),
        }
    }
}

impl fmt::Display for BlendChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.number())
    }
}

/// Errors from blend controller operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimationError {
    #[error("animation channel {0} is out of range (expected 1, 2 or 3)")]
    ChannelOutOfRange(u8),
    #[error("invalid blend configuration: duration must be positive and finite, got {0}")]
    InvalidDuration(f32),
}

/// Timing of a channel transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Transition length in time units (seconds when `dt` is seconds).
    pub duration: f32,
    pub easing: Easing,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            easing: Easing::ExpoOut,
        }
    }
}

impl BlendConfig {
    pub fn validate(&self) -> Result<(), AnimationError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(AnimationError::InvalidDuration(self.duration));
        }
        Ok(())
    }
}

/// Relative slack on the duration, absorbing rounding in `f32` frame deltas.
const COMPLETION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    target: BlendChannel,
    start: [f32; 3],
    /// Summed in f64 so per-frame deltas adding up to the duration finish it.
    elapsed: f64,
}

/// Owns the three channel weights and eases them toward the active channel.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationBlendController {
    weights: [f32; 3],
    transition: Option<Transition>,
    config: BlendConfig,
}

impl Default for AnimationBlendController {
    fn default() -> Self {
        Self {
            weights: BlendChannel::One.target_weights(),
            transition: None,
            config: BlendConfig::default(),
        }
    }
}

impl AnimationBlendController {
    /// Channel 1 fully active, default timing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BlendConfig) -> Result<Self, AnimationError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    /// Start a transition toward channel `n` (1, 2 or 3).
    pub fn activate(&mut self, n: u8) -> Result<(), AnimationError> {
        let channel = BlendChannel::try_from(n)?;
        self.activate_channel(channel);
        Ok(())
    }

    /// Start a transition toward `channel`, discarding any in-flight one.
    pub fn activate_channel(&mut self, channel: BlendChannel) {
        if let Some(prev) = self.transition {
            tracing::debug!(from = %prev.target, to = %channel, "transition replaced");
        }
        self.transition = Some(Transition {
            target: channel,
            start: self.weights,
            elapsed: 0.0,
        });
        tracing::debug!(%channel, start = ?self.weights, "animation transition started");
    }

    /// Advance the in-flight transition by `dt` and publish the weights.
    ///
    /// No-op while idle. Negative or non-finite `dt` counts as zero.
    pub fn update(&mut self, dt: f32, params: &mut ShaderParameterSet) {
        let Some(mut transition) = self.transition else {
            return;
        };

        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "ignoring invalid frame delta");
            0.0
        };

        let duration = f64::from(self.config.duration);
        transition.elapsed += f64::from(dt);
        let t = if transition.elapsed >= duration * (1.0 - COMPLETION_TOLERANCE) {
            1.0
        } else {
            (transition.elapsed / duration) as f32
        };
        let e = self.config.easing.apply(t);
        let target = transition.target.target_weights();
        for k in 0..3 {
            let w = transition.start[k] * (1.0 - e) + target[k] * e;
            self.weights[k] = w.clamp(0.0, 1.0);
        }

        if t >= 1.0 {
            self.weights = target;
            self.transition = None;
            tracing::debug!(channel = %transition.target, "animation transition complete");
        } else {
            self.transition = Some(transition);
        }

        params.set_weights(self.weights);
        tracing::trace!(weights = ?self.weights, progress = t, "blend weights updated");
    }

    /// Current weights, channel 1 first.
    pub fn weights(&self) -> [f32; 3] {
        self.weights
    }

    pub fn weight(&self, channel: BlendChannel) -> f32 {
        self.weights[channel.index()]
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Channel of the in-flight transition.
    pub fn target(&self) -> Option<BlendChannel> {
        self.transition.map(|t| t.target)
    }

    /// Normalized progress of the in-flight transition.
    pub fn progress(&self) -> Option<f32> {
        self.transition
            .map(|t| (t.elapsed / f64::from(self.config.duration)).min(1.0) as f32)
    }
}
