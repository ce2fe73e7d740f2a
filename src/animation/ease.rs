/// Rate function mapping linear step progress to eased progress.
///
/// Every variant maps `0 -> 0`. All but [`Ease::ThereAndBack`] map `1 -> 1`; that one peaks at
/// `0.5` and returns to `0`, which is how a step animates out and back to its start values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Progress unchanged.
    Linear,
    #[default]
    /// Sigmoid ease in and out; the default.
    Smooth,
    /// Quadratic ease in.
    InQuad,
    /// Quadratic ease out.
    OutQuad,
    /// Quadratic ease in and out.
    InOutQuad,
    /// Cubic ease in.
    InCubic,
    /// Cubic ease out.
    OutCubic,
    /// Cubic ease in and out.
    InOutCubic,
    /// Smooth rise to the target at the midpoint, then back to the start.
    ThereAndBack,
}

impl Ease {
    /// Eased progress for linear progress `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Smooth => smooth(t),
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::ThereAndBack => {
                let u = if t < 0.5 { 2.0 * t } else { 2.0 - 2.0 * t };
                smooth(u)
            }
        }
    }
}

/// Sigmoid ease normalised so the endpoints land exactly on 0 and 1.
fn smooth(t: f64) -> f64 {
    const INFLECTION: f64 = 10.0;
    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let err = sigmoid(-INFLECTION / 2.0);
    ((sigmoid(INFLECTION * (t - 0.5)) - err) / (1.0 - 2.0 * err)).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
