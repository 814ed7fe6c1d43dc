/// Rate functions mapping normalized animation progress to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Sigmoid ease-in/out; the default for every play.
    #[default]
    Smooth,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Rises to 1 at the midpoint and returns to 0 (smoothed); used for wiggles.
    ThereAndBack,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Smooth => smooth(t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::ThereAndBack => {
                let folded = if t < 0.5 { 2.0 * t } else { 2.0 * (1.0 - t) };
                smooth(folded)
            }
        }
    }
}

fn smooth(t: f64) -> f64 {
    const INFLECTION: f64 = 10.0;
    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
    let error = sigmoid(-INFLECTION / 2.0);
    ((sigmoid(INFLECTION * (t - 0.5)) - error) / (1.0 - 2.0 * error)).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
