//! Channeling success models.
//!
//! Both models predict the probability that a cast survives `hits`
//! interruption attempts. Results are clamped to `[0, 1]`.

use std::fmt;

/// Floor and ceiling of the exponential model's per-hit numerator.
pub const EXPONENTIAL_MIN: u32 = 39;
pub const EXPONENTIAL_MAX: u32 = 370;
pub const EXPONENTIAL_DIVISOR: f64 = 391.0;

/// Exponential model: each hit is an independent check with chance
/// `clamp(skill + 5 + level + 3 * gap, 39, 370) / 391`.
///
/// # Examples
/// ```
/// use eqchannel_core::models::exponential_success;
/// assert_eq!(exponential_success(0, 1, 0, 0), 1.0);
/// assert!((exponential_success(200, 50, 0, 1) - 255.0 / 391.0).abs() < 1e-12);
/// ```
pub fn exponential_success(skill: u32, level: u32, level_gap: u32, hits: u32) -> f64 {
    let raw = skill
        .saturating_add(5)
        .saturating_add(level)
        .saturating_add(level_gap.saturating_mul(3));
    let per_hit = f64::from(raw.clamp(EXPONENTIAL_MIN, EXPONENTIAL_MAX)) / EXPONENTIAL_DIVISOR;
    let exponent = i32::try_from(hits).unwrap_or(i32::MAX);
    per_hit.powi(exponent).clamp(0.0, 1.0)
}

/// Linear model: `(30 + skill / 400 * 100 - 2 * hits) / 100`.
///
/// # Examples
/// ```
/// use eqchannel_core::models::linear_success;
/// assert!((linear_success(200, 5) - 0.70).abs() < 1e-12);
/// assert_eq!(linear_success(0, 20), 0.0);
/// ```
pub fn linear_success(skill: u32, hits: u32) -> f64 {
    let chance = (30.0 + f64::from(skill) / 400.0 * 100.0 - 2.0 * f64::from(hits)) / 100.0;
    chance.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Exponential,
    Linear,
}

impl Model {
    pub const ALL: [Model; 2] = [Model::Exponential, Model::Linear];

    pub fn predict(self, skill: u32, level: u32, level_gap: u32, hits: u32) -> f64 {
        match self {
            Model::Exponential => exponential_success(skill, level, level_gap, hits),
            Model::Linear => linear_success(skill, hits),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Model::Exponential => "Azxten (Exp)",
            Model::Linear => "EQEmu (Lin)",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_exponential_floor_and_ceiling() {
        // 0 + 5 + 1 = 6, raised to the floor of 39
        let low = exponential_success(0, 1, 0, 1);
        assert!((low - 39.0 / 391.0).abs() < EPS);

        // Far over the ceiling
        let high = exponential_success(400, 60, 20, 2);
        assert!((high - (370.0f64 / 391.0).powi(2)).abs() < EPS);
    }

    #[test]
    fn test_exponential_uses_gap() {
        let without = exponential_success(100, 50, 0, 3);
        let with = exponential_success(100, 50, 10, 3);
        assert!((without - (155.0f64 / 391.0).powi(3)).abs() < EPS);
        assert!((with - (185.0f64 / 391.0).powi(3)).abs() < EPS);
        assert!(with > without);
    }

    #[test]
    fn test_exponential_zero_hits_is_certain() {
        assert_eq!(exponential_success(10, 10, 0, 0), 1.0);
    }

    #[test]
    fn test_linear_clamps() {
        assert!((linear_success(0, 0) - 0.30).abs() < EPS);
        assert_eq!(linear_success(400, 0), 1.0);
        assert_eq!(linear_success(0, 16), 0.0);
        assert!((linear_success(100, 3) - 0.49).abs() < EPS);
    }

    #[test]
    fn test_model_dispatch() {
        assert_eq!(
            Model::Exponential.predict(100, 50, 0, 2),
            exponential_success(100, 50, 0, 2)
        );
        assert_eq!(Model::Linear.predict(100, 50, 9, 2), linear_success(100, 2));
        assert_eq!(Model::Linear.to_string(), "EQEmu (Lin)");
    }
}
