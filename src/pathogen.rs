//! Pathogen presets: named bundles of disease parameters.
//!
//! A preset overrides only the four disease-specific fields of a
//! [`SimulationConfig`]; population, economics, and pacing settings are left
//! untouched so a preset can be applied over any scenario configuration.

use crate::params::SimulationConfig;

/// A named set of disease parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathogenPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub transmission_probability: f64,
    /// Days from exposure to infectiousness.
    pub latent_period: f64,
    /// Days spent infectious.
    pub infectious_period: f64,
    /// Fraction of infectious exits that are deaths.
    pub mortality_rate: f64,
}

/// The built-in preset catalog.
pub const PATHOGENS: &[PathogenPreset] = &[
    PathogenPreset {
        id: "measles",
        name: "Measles Virus",
        description: "Highly contagious viral infection with respiratory transmission",
        transmission_probability: 0.4,
        latent_period: 10.0,
        infectious_period: 4.0,
        mortality_rate: 0.001,
    },
    PathogenPreset {
        id: "spanish_flu",
        name: "1918 Influenza",
        description: "The devastating 1918 \"Spanish Flu\" pandemic",
        transmission_probability: 0.03,
        latent_period: 2.0,
        infectious_period: 7.0,
        mortality_rate: 0.025,
    },
    PathogenPreset {
        id: "smallpox",
        name: "Smallpox",
        description: "Historical viral disease, eradicated in 1980",
        transmission_probability: 0.05,
        latent_period: 12.0,
        infectious_period: 12.0,
        mortality_rate: 0.3,
    },
    PathogenPreset {
        id: "sars_cov_2",
        name: "SARS-CoV-2",
        description: "Coronavirus causing COVID-19. Original variant",
        transmission_probability: 0.02,
        latent_period: 5.0,
        infectious_period: 10.0,
        mortality_rate: 0.01,
    },
];

/// Looks up a preset by id.
#[must_use]
pub fn find_pathogen(id: &str) -> Option<&'static PathogenPreset> {
    PATHOGENS.iter().find(|p| p.id == id)
}

impl PathogenPreset {
    /// Returns a copy of `config` with this preset's disease parameters
    /// applied.
    #[must_use]
    pub fn apply_to(&self, config: &SimulationConfig) -> SimulationConfig {
        SimulationConfig {
            transmission_probability: self.transmission_probability,
            latent_period: self.latent_period,
            infectious_period: self.infectious_period,
            mortality_rate: self.mortality_rate,
            ..config.clone()
        }
    }
}
