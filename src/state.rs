//! Simulation state: the compartment counts, derived rates, cost ledgers,
//! and the append-only time series.
//!
//! State is replaced wholesale by the tick pipeline and never partially
//! mutated from outside it. [`derive_state`] is the single place initial
//! state is computed, both at startup and on reset or structural
//! reconfiguration.

use serde::{Deserialize, Serialize};

use crate::define_report;
use crate::params::{derive_rates, SimulationConfig, DEFAULT_POPULATION};

/// Infectious individuals seeded into a fresh state.
pub const INITIAL_INFECTED: u64 = 1;

/// One per-day snapshot, appended to the time series every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySample {
    pub day: u32,
    pub susceptible: u64,
    pub exposed: u64,
    pub infected: u64,
    pub recovered: u64,
    pub deceased: u64,
    pub total_cases: u64,
    pub r0: f64,
    pub re: f64,
    pub economic_cost: f64,
}

define_report!(DaySample);

/// Cumulative spend attributed to one ongoing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyCostRecord {
    pub policy_id: String,
    pub days_active: u32,
    pub total_cost: f64,
}

/// The full mutable state of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub day: u32,
    /// Initial population, constant for the run.
    pub population: u64,
    pub susceptible: u64,
    pub exposed: u64,
    pub infected: u64,
    pub recovered: u64,
    pub deceased: u64,
    /// Cumulative ever-exposed count, non-decreasing.
    pub total_cases: u64,
    pub beta: f64,
    pub gamma: f64,
    pub sigma: f64,
    /// Basic reproduction number, fixed at derivation.
    pub r0: f64,
    /// Effective reproduction number, recomputed every tick.
    pub re: f64,
    pub herd_immunity_threshold: f64,
    /// Contacts per day after the last tick's policy reductions.
    pub effective_contacts: f64,
    /// Transmission probability after the last tick's policy reductions.
    pub effective_transmission_rate: f64,
    pub total_costs: f64,
    pub death_costs: f64,
    pub vaccine_costs: f64,
    pub policy_costs: Vec<PolicyCostRecord>,
    pub total_vaccinated: u64,
    pub daily_vaccinated: u64,
    pub vaccination_started: bool,
    pub vaccination_start_day: Option<u32>,
    /// Set once the schedule has run at least one resume.
    pub has_started: bool,
    pub is_game_over: bool,
    pub has_won: bool,
    pub time_series: Vec<DaySample>,
}

/// Computes a fresh initial state from a configuration.
///
/// A population at or below the seed count is replaced with
/// [`DEFAULT_POPULATION`]; rate derivation applies its own period
/// substitutions. The day-0 snapshot is recorded immediately so the time
/// series is never empty.
#[must_use]
pub fn derive_state(config: &SimulationConfig) -> SimulationState {
    let population = if config.population > INITIAL_INFECTED {
        config.population
    } else {
        DEFAULT_POPULATION
    };
    let rates = derive_rates(config);

    let mut state = SimulationState {
        day: 0,
        population,
        susceptible: population - INITIAL_INFECTED,
        exposed: 0,
        infected: INITIAL_INFECTED,
        recovered: 0,
        deceased: 0,
        total_cases: INITIAL_INFECTED,
        beta: rates.beta,
        gamma: rates.gamma,
        sigma: rates.sigma,
        r0: rates.r0,
        re: rates.r0,
        herd_immunity_threshold: rates.herd_immunity_threshold,
        effective_contacts: config.contacts_per_day,
        effective_transmission_rate: config.transmission_probability,
        total_costs: 0.0,
        death_costs: 0.0,
        vaccine_costs: 0.0,
        policy_costs: Vec::new(),
        total_vaccinated: 0,
        daily_vaccinated: 0,
        vaccination_started: false,
        vaccination_start_day: None,
        has_started: false,
        is_game_over: false,
        has_won: false,
        time_series: Vec::new(),
    };
    let initial_sample = state.snapshot();
    state.time_series.push(initial_sample);
    state
}

impl SimulationState {
    /// Builds a time-series sample from the current counts.
    #[must_use]
    pub fn snapshot(&self) -> DaySample {
        DaySample {
            day: self.day,
            susceptible: self.susceptible,
            exposed: self.exposed,
            infected: self.infected,
            recovered: self.recovered,
            deceased: self.deceased,
            total_cases: self.total_cases,
            r0: self.r0,
            re: self.re,
            economic_cost: self.total_costs,
        }
    }

    /// Sum of all compartments plus the vaccinated pool. Equals
    /// `population` at all times; checked after every commit.
    #[must_use]
    pub fn total_accounted(&self) -> u64 {
        self.susceptible
            + self.exposed
            + self.infected
            + self.recovered
            + self.deceased
            + self.total_vaccinated
    }
}
