//! Simulation configuration and the derivation of model rate constants.
//!
//! The configuration is expressed in human-facing units (periods in days,
//! probabilities per contact); [`derive_rates`] converts those into the rate
//! constants the transition engine consumes. Derivation substitutes safe
//! defaults for non-positive periods rather than failing, so a partially
//! edited configuration always stays usable.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EpisimError;

/// Substituted when a caller supplies a non-positive infectious period.
pub const DEFAULT_INFECTIOUS_PERIOD: f64 = 14.0;
/// Substituted when a caller supplies a non-positive latent period.
pub const DEFAULT_LATENT_PERIOD: f64 = 3.0;
/// Substituted when a caller supplies a population at or below the seed.
pub const DEFAULT_POPULATION: u64 = 1_000_000;
/// Substituted when a caller supplies a non-positive tick rate.
pub const DEFAULT_DAYS_PER_SECOND: f64 = 10.0;

/// Human-facing simulation configuration.
///
/// Immutable for the duration of a run; the orchestrator replaces it
/// wholesale through [`classify_change`]-guarded updates. All fields have
/// serde defaults so a config file may specify only the values it cares
/// about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub population: u64,
    /// Fraction of infectious exits that are deaths, in [0, 1].
    pub mortality_rate: f64,
    /// Days spent infectious; gamma = 1 / infectious_period.
    pub infectious_period: f64,
    /// Days from exposure to infectiousness; sigma = 1 / latent_period.
    pub latent_period: f64,
    pub contacts_per_day: f64,
    /// Probability of transmission per contact, in [0, 1].
    pub transmission_probability: f64,
    /// Currency units accrued per death.
    pub cost_per_death: f64,
    /// Simulated days per wall-clock second while running.
    pub days_per_second: f64,
    /// Enables the win/lose evaluation at the end of every tick.
    pub enable_win_lose: bool,
    /// Losing death fraction, evaluated as deceased / population.
    pub max_death_percentage: f64,
    /// Losing total cost threshold.
    pub max_economic_cost: f64,
    /// Display days as calendar dates.
    pub use_dates: bool,
    /// Calendar date of day 0 when `use_dates` is set.
    pub start_date: Option<NaiveDate>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: 1_000_000,
            mortality_rate: 0.02,
            infectious_period: 14.0,
            latent_period: 5.0,
            contacts_per_day: 10.0,
            transmission_probability: 0.015,
            cost_per_death: 1_000_000.0,
            days_per_second: 10.0,
            enable_win_lose: false,
            max_death_percentage: 0.05,
            max_economic_cost: 1e12,
            use_dates: false,
            start_date: None,
        }
    }
}

/// Rate constants derived from a [`SimulationConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedRates {
    /// Transmission rate: contacts per day times transmission probability.
    pub beta: f64,
    /// Exit rate from the infectious compartment.
    pub gamma: f64,
    /// Progression rate from exposed to infectious.
    pub sigma: f64,
    /// Basic reproduction number, beta / gamma.
    pub r0: f64,
    /// Susceptible fraction below which sustained transmission stops.
    pub herd_immunity_threshold: f64,
}

/// Converts a configuration into rate constants.
///
/// Non-positive (or NaN) periods are replaced with
/// [`DEFAULT_INFECTIOUS_PERIOD`] / [`DEFAULT_LATENT_PERIOD`] so the
/// divisions below are always defined. Pure and deterministic.
#[must_use]
pub fn derive_rates(config: &SimulationConfig) -> DerivedRates {
    let infectious_period = if config.infectious_period > 0.0 {
        config.infectious_period
    } else {
        DEFAULT_INFECTIOUS_PERIOD
    };
    let latent_period = if config.latent_period > 0.0 {
        config.latent_period
    } else {
        DEFAULT_LATENT_PERIOD
    };

    let gamma = 1.0 / infectious_period;
    let sigma = 1.0 / latent_period;
    let beta = config.contacts_per_day * config.transmission_probability;
    let r0 = beta / gamma;
    let herd_immunity_threshold = if r0 > 1.0 {
        (1.0 - 1.0 / r0).max(0.0)
    } else {
        0.0
    };

    DerivedRates {
        beta,
        gamma,
        sigma,
        r0,
        herd_immunity_threshold,
    }
}

/// How a configuration edit affects a run in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    /// Only date-display fields changed; patch the config in place.
    Display,
    /// A model-affecting field changed; re-derive rates and reinitialize
    /// state.
    Structural,
}

/// Classifies the difference between two configurations.
///
/// Returns `None` when nothing changed. A change is [`ConfigChange::Display`]
/// only if every differing field is one of `use_dates` / `start_date`.
#[must_use]
pub fn classify_change(
    current: &SimulationConfig,
    next: &SimulationConfig,
) -> Option<ConfigChange> {
    if current == next {
        return None;
    }
    let mut masked = current.clone();
    masked.use_dates = next.use_dates;
    masked.start_date = next.start_date;
    if masked == *next {
        Some(ConfigChange::Display)
    } else {
        Some(ConfigChange::Structural)
    }
}

/// Loads a configuration from a JSON file.
///
/// Missing fields fall back to their defaults. Out-of-range values are not
/// rejected here; derivation substitutes safe values at use time.
///
/// # Errors
///
/// Returns an `EpisimError` if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<SimulationConfig, EpisimError> {
    let data = fs::read_to_string(path)?;
    let config: SimulationConfig = serde_json::from_str(&data)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;
    use crate::numeric::ACC;
    use std::io::Write;

    #[test]
    fn rates_from_default_config() {
        let rates = derive_rates(&SimulationConfig::default());
        assert_almost_eq!(rates.gamma, 1.0 / 14.0, ACC);
        assert_almost_eq!(rates.sigma, 1.0 / 5.0, ACC);
        assert_almost_eq!(rates.beta, 0.15, ACC);
        assert_almost_eq!(rates.r0, 0.15 * 14.0, ACC);
    }

    #[test]
    fn non_positive_periods_fall_back_to_defaults() {
        let config = SimulationConfig {
            infectious_period: 0.0,
            latent_period: -3.0,
            ..SimulationConfig::default()
        };
        let rates = derive_rates(&config);
        assert_almost_eq!(rates.gamma, 1.0 / DEFAULT_INFECTIOUS_PERIOD, ACC);
        assert_almost_eq!(rates.sigma, 1.0 / DEFAULT_LATENT_PERIOD, ACC);
    }

    #[test]
    fn nan_period_falls_back_to_default() {
        let config = SimulationConfig {
            infectious_period: f64::NAN,
            ..SimulationConfig::default()
        };
        let rates = derive_rates(&config);
        assert_almost_eq!(rates.gamma, 1.0 / DEFAULT_INFECTIOUS_PERIOD, ACC);
    }

    #[test]
    fn herd_immunity_threshold_zero_below_criticality() {
        let config = SimulationConfig {
            contacts_per_day: 1.0,
            transmission_probability: 0.01,
            ..SimulationConfig::default()
        };
        let rates = derive_rates(&config);
        assert!(rates.r0 < 1.0);
        assert_eq!(rates.herd_immunity_threshold, 0.0);
    }

    #[test]
    fn herd_immunity_threshold_above_criticality() {
        let rates = derive_rates(&SimulationConfig::default());
        // r0 = 2.1 for the default config
        assert!(rates.r0 > 1.0);
        assert_almost_eq!(rates.herd_immunity_threshold, 1.0 - 1.0 / rates.r0, ACC);
        assert!(rates.herd_immunity_threshold > 0.0 && rates.herd_immunity_threshold < 1.0);
    }

    #[test]
    fn derivation_is_deterministic() {
        let config = SimulationConfig::default();
        assert_eq!(derive_rates(&config), derive_rates(&config));
    }

    #[test]
    fn classify_no_change() {
        let config = SimulationConfig::default();
        assert_eq!(classify_change(&config, &config.clone()), None);
    }

    #[test]
    fn classify_display_only_change() {
        let current = SimulationConfig::default();
        let next = SimulationConfig {
            use_dates: true,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..current.clone()
        };
        assert_eq!(
            classify_change(&current, &next),
            Some(ConfigChange::Display)
        );
    }

    #[test]
    fn classify_structural_change() {
        let current = SimulationConfig::default();
        let next = SimulationConfig {
            contacts_per_day: 2.0,
            ..current.clone()
        };
        assert_eq!(
            classify_change(&current, &next),
            Some(ConfigChange::Structural)
        );
    }

    #[test]
    fn classify_mixed_change_is_structural() {
        let current = SimulationConfig::default();
        let next = SimulationConfig {
            use_dates: true,
            days_per_second: 4.0,
            ..current.clone()
        };
        assert_eq!(
            classify_change(&current, &next),
            Some(ConfigChange::Structural)
        );
    }

    #[test]
    fn load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            r#"{"population": 5000, "transmission_probability": 0.04}"#
        )
        .unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.population, 5000);
        assert_almost_eq!(config.transmission_probability, 0.04, ACC);
        // unspecified fields keep their defaults
        assert_almost_eq!(config.infectious_period, 14.0, ACC);
    }

    #[test]
    fn load_config_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let result = load_config(file.path());
        assert!(matches!(result, Err(EpisimError::JsonError(_))));
    }

    #[test]
    fn load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/episim.json"));
        assert!(matches!(result, Err(EpisimError::IoError(_))));
    }
}
