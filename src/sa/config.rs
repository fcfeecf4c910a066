//! SA configuration: cooling schedule and multi-run search parameters.

use super::types::{Acceptance, Direction};
use crate::error::{Result, SeatingError};

/// Parameters of a single annealing run.
///
/// Cooling is geometric: `T_{k+1} = alpha * T_k`, one swap proposal per
/// temperature step, stopping once `T <= min_temperature`.
///
/// # Examples
///
/// ```
/// use u_seating::sa::{AnnealConfig, Direction};
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(100.0)
///     .with_min_temperature(0.001)
///     .with_alpha(0.98)
///     .with_direction(Direction::Minimize);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealConfig {
    /// Starting temperature. Higher values accept more worsening moves early.
    pub initial_temperature: f64,

    /// The run stops when the temperature is no longer above this.
    pub min_temperature: f64,

    /// Cooling factor in (0, 1). Higher = slower cooling, more proposals.
    pub alpha: f64,

    /// Optimization direction.
    pub direction: Direction,

    /// Metropolis probability rule for non-improving swaps.
    pub acceptance: Acceptance,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 5000.0,
            min_temperature: 0.01,
            alpha: 0.9,
            direction: Direction::Maximize,
            acceptance: Acceptance::Signed,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(invalid(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        if !self.min_temperature.is_finite() || self.min_temperature <= 0.0 {
            return Err(invalid(format!(
                "min_temperature must be positive and finite, got {}",
                self.min_temperature
            )));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(invalid(format!(
                "min_temperature ({}) must be less than initial_temperature ({})",
                self.min_temperature, self.initial_temperature
            )));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(invalid(format!("alpha must be in (0, 1), got {}", self.alpha)));
        }
        Ok(())
    }

    /// Number of proposals one run makes under this schedule.
    ///
    /// Only meaningful for a valid configuration.
    pub fn schedule_len(&self) -> usize {
        let mut temperature = self.initial_temperature;
        let mut steps = 0usize;
        while temperature > self.min_temperature {
            temperature *= self.alpha;
            steps += 1;
        }
        steps
    }
}

/// Parameters of the best-of-K restart search.
///
/// # Examples
///
/// ```
/// use u_seating::sa::MultiRunConfig;
///
/// let config = MultiRunConfig::default().with_trials(50).with_seed(7);
/// assert_eq!(config.trials, 50);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiRunConfig {
    /// Number of independent annealing runs (K).
    pub trials: usize,

    /// Base seed. Trial `k` derives its own stream from `(seed, k)`.
    pub seed: Option<u64>,

    /// Run trials on the rayon pool. Requires the `parallel` feature;
    /// ignored otherwise. Results do not depend on this flag.
    pub parallel: bool,
}

impl Default for MultiRunConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            seed: None,
            parallel: false,
        }
    }
}

impl MultiRunConfig {
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(invalid("trials must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> SeatingError {
    SeatingError::InvalidConfig(reason)
}
