use serde::{Deserialize, Serialize};

/// Monotonic ease-out curves mapping progress in [0, 1] to [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    QuadOut,
    CubicOut,
    /// `1 - 2^(-10t)`, pinned to exactly 1 at the end.
    #[default]
    ExpoOut,
}

impl Easing {
    /// Eased value of `t`, clamped to the unit interval. NaN maps to 0.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::ExpoOut => 1.0 - 2.0_f32.powf(-10.0 * t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::QuadOut,
        Easing::CubicOut,
        Easing::ExpoOut,
    ];

    #[test]
    fn endpoints() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn monotonic_and_bounded() {
        for easing in ALL {
            let mut prev = 0.0;
            for step in 0..=1000 {
                let v = easing.apply(step as f32 / 1000.0);
                assert!((0.0..=1.0).contains(&v));
                assert!(v >= prev, "{easing:?} decreased at step {step}");
                prev = v;
            }
        }
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(Easing::ExpoOut.apply(-3.0), 0.0);
        assert_eq!(Easing::ExpoOut.apply(7.5), 1.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 0.0);
    }

    #[test]
    fn expo_out_front_loads_progress() {
        let half = Easing::ExpoOut.apply(0.5);
        assert!((half - (1.0 - 2.0_f32.powi(-5))).abs() < 1e-6);
        assert!(half > Easing::CubicOut.apply(0.5));
    }
}
