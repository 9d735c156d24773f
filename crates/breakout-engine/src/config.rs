//! Engine configuration.

use std::str::FromStr;
use std::time::Duration;

use breakout_core::{Error, Result};

/// Default per-round solver budget.
pub const DEFAULT_SOLVER_TIMEOUT: Duration = Duration::from_secs(30);

/// How prior meetings translate into the optimal assigner's pair cost.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum PairWeighting {
    /// `base + per_repeat × count`.
    Linear { base: f64, per_repeat: f64 },
    /// 1 if the pair has met before, otherwise 0.
    Seen,
}

impl PairWeighting {
    pub fn weight(&self, count: u32) -> f64 {
        match *self {
            PairWeighting::Linear { base, per_repeat } => base + per_repeat * f64::from(count),
            PairWeighting::Seen => {
                if count > 0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl Default for PairWeighting {
    fn default() -> Self {
        PairWeighting::Linear {
            base: 1.0,
            per_repeat: 1.0,
        }
    }
}

/// What to do when the optimal assigner fails for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Fallback {
    /// Abort the run and surface the error.
    #[default]
    Abort,
    /// Re-run the failed round with the greedy assigner.
    Greedy,
}

impl FromStr for Fallback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "none" => Ok(Fallback::Abort),
            "greedy" => Ok(Fallback::Greedy),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown fallback {:?} (expected abort or greedy)",
                other
            ))),
        }
    }
}

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Seed for reproducible runs. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Per-round solver budget. `None` lets the solver run to completion.
    pub solver_timeout: Option<Duration>,
    /// Pair cost used by the optimal assigner.
    pub weighting: PairWeighting,
    /// Behavior when the optimal assigner fails.
    pub fallback: Fallback,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            solver_timeout: Some(DEFAULT_SOLVER_TIMEOUT),
            weighting: PairWeighting::default(),
            fallback: Fallback::default(),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables with defaults.
    ///
    /// - `BREAKOUT_SEED`: u64 seed
    /// - `BREAKOUT_SOLVER_TIMEOUT_MS`: per-round budget, `0` for unbounded
    /// - `BREAKOUT_FALLBACK`: `abort` or `greedy`
    /// - `BREAKOUT_WEIGHTING`: `linear` or `seen`
    /// - `BREAKOUT_WEIGHT_BASE`, `BREAKOUT_WEIGHT_PER_REPEAT`: linear coefficients
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(seed) = lookup("BREAKOUT_SEED") {
            config.seed = Some(parse_var("BREAKOUT_SEED", &seed)?);
        }

        if let Some(ms) = lookup("BREAKOUT_SOLVER_TIMEOUT_MS") {
            let ms: u64 = parse_var("BREAKOUT_SOLVER_TIMEOUT_MS", &ms)?;
            config.solver_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }

        if let Some(fallback) = lookup("BREAKOUT_FALLBACK") {
            config.fallback = fallback.parse()?;
        }

        let base = lookup("BREAKOUT_WEIGHT_BASE")
            .map(|v| parse_var::<f64>("BREAKOUT_WEIGHT_BASE", &v))
            .transpose()?;
        let per_repeat = lookup("BREAKOUT_WEIGHT_PER_REPEAT")
            .map(|v| parse_var::<f64>("BREAKOUT_WEIGHT_PER_REPEAT", &v))
            .transpose()?;

        let weighting = lookup("BREAKOUT_WEIGHTING").map(|v| v.trim().to_ascii_lowercase());
        config.weighting = match weighting.as_deref() {
            Some("seen") => PairWeighting::Seen,
            None | Some("linear") => PairWeighting::Linear {
                base: base.unwrap_or(1.0),
                per_repeat: per_repeat.unwrap_or(1.0),
            },
            Some(other) => {
                return Err(Error::InvalidConfiguration(format!(
                    "unknown BREAKOUT_WEIGHTING {:?} (expected linear or seen)",
                    other
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_solver_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.solver_timeout = timeout;
        self
    }

    pub fn with_weighting(mut self, weighting: PairWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Reject weightings that would reward repeat pairings.
    pub fn validate(&self) -> Result<()> {
        if let PairWeighting::Linear { base, per_repeat } = self.weighting {
            if !base.is_finite() || !per_repeat.is_finite() || base < 0.0 || per_repeat < 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "pair weighting coefficients must be finite and non-negative (base {}, per repeat {})",
                    base, per_repeat
                )));
            }
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfiguration(format!("invalid {}: {:?}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_weighting_is_one_plus_count() {
        let w = PairWeighting::default();
        assert_eq!(w.weight(0), 1.0);
        assert_eq!(w.weight(3), 4.0);
    }

    #[test]
    fn seen_weighting_is_indicator() {
        assert_eq!(PairWeighting::Seen.weight(0), 0.0);
        assert_eq!(PairWeighting::Seen.weight(1), 1.0);
        assert_eq!(PairWeighting::Seen.weight(5), 1.0);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.solver_timeout, Some(DEFAULT_SOLVER_TIMEOUT));
        assert_eq!(config.fallback, Fallback::Abort);
    }

    #[test]
    fn environment_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("BREAKOUT_SEED", "7"),
            ("BREAKOUT_SOLVER_TIMEOUT_MS", "0"),
            ("BREAKOUT_FALLBACK", "Greedy"),
            ("BREAKOUT_WEIGHT_BASE", "0.5"),
            ("BREAKOUT_WEIGHT_PER_REPEAT", "4"),
        ]))
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.solver_timeout, None);
        assert_eq!(config.fallback, Fallback::Greedy);
        assert_eq!(
            config.weighting,
            PairWeighting::Linear {
                base: 0.5,
                per_repeat: 4.0
            }
        );
    }

    #[test]
    fn seen_weighting_from_environment() {
        let config = EngineConfig::from_lookup(lookup(&[("BREAKOUT_WEIGHTING", "seen")])).unwrap();
        assert_eq!(config.weighting, PairWeighting::Seen);
    }

    #[test]
    fn bad_values_are_configuration_errors() {
        for vars in [
            [("BREAKOUT_SEED", "abc")],
            [("BREAKOUT_SOLVER_TIMEOUT_MS", "-1")],
            [("BREAKOUT_FALLBACK", "retry")],
            [("BREAKOUT_WEIGHTING", "quadratic")],
            [("BREAKOUT_WEIGHT_BASE", "-2")],
        ] {
            let err = EngineConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(
                matches!(err, Error::InvalidConfiguration(_)),
                "{:?} should be rejected",
                vars
            );
        }
    }
}
