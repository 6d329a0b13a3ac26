//! The simulation orchestrator.
//!
//! Owns the configuration, the mutable state, the policy sets, the RNG, and
//! the tick schedule, and advances the whole model one day per tick. Ticks
//! are scheduled on a virtual wall-clock axis measured in seconds; callers
//! drive that clock explicitly with [`Simulation::advance_by`] (or bypass it
//! with [`Simulation::step`] / [`Simulation::run_days`]), so runs are fully
//! deterministic for a given seed and call sequence.
//!
//! The tick pipeline runs policy aggregation, the epidemic transition,
//! vaccination, and economic accrual in that order, then commits the new
//! state wholesale and appends a time-series sample. Nothing outside the
//! pipeline mutates state mid-tick.

use std::collections::BTreeSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::economics::{accrue, update_policy_records};
use crate::error::EpisimError;
use crate::log::{debug, info, trace, warn};
use crate::params::{classify_change, ConfigChange, SimulationConfig, DEFAULT_DAYS_PER_SECOND};
use crate::policy::{
    aggregate_effects, find_policy, PolicyAction, PolicyEvent, VACCINATION_POLICY_ID,
};
use crate::report::{Report, ReportWriters};
use crate::schedule::{TickId, TickQueue};
use crate::state::{derive_state, DaySample, SimulationState};
use crate::transition::advance_epidemic;
use crate::vaccination::{daily_doses, trigger_program};

/// Where the orchestrator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Running,
    GameOver,
}

/// A complete simulation run: configuration, state, policies, schedule,
/// randomness, and report output.
pub struct Simulation {
    config: SimulationConfig,
    state: SimulationState,
    active_policies: BTreeSet<String>,
    used_policies: BTreeSet<String>,
    policy_history: Vec<PolicyEvent>,
    running: bool,
    /// Virtual wall-clock position, in seconds.
    clock: f64,
    ticks: TickQueue<u32>,
    pending_tick: Option<TickId>,
    rng: StdRng,
    reports: ReportWriters,
}

impl Simulation {
    /// Creates a simulation with the default seed of 0.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Simulation {
        Self::with_seed(config, 0)
    }

    /// Creates a simulation seeded explicitly. Two simulations built with
    /// the same configuration and seed and driven identically produce
    /// identical states.
    #[must_use]
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Simulation {
        let state = derive_state(&config);
        Simulation {
            config,
            state,
            active_policies: BTreeSet::new(),
            used_policies: BTreeSet::new(),
            policy_history: Vec::new(),
            running: false,
            clock: 0.0,
            ticks: TickQueue::new(),
            pending_tick: None,
            rng: StdRng::seed_from_u64(seed),
            reports: ReportWriters::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current virtual wall-clock position, in seconds.
    #[must_use]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.state.is_game_over {
            Phase::GameOver
        } else if self.running {
            Phase::Running
        } else {
            Phase::Stopped
        }
    }

    #[must_use]
    pub fn active_policies(&self) -> &BTreeSet<String> {
        &self.active_policies
    }

    #[must_use]
    pub fn used_policies(&self) -> &BTreeSet<String> {
        &self.used_policies
    }

    /// Every activation, deactivation, and trigger so far, in order.
    #[must_use]
    pub fn policy_history(&self) -> &[PolicyEvent] {
        &self.policy_history
    }

    /// Registers a CSV output file for a report type. [`DaySample`] rows
    /// are emitted every tick and [`PolicyEvent`] rows on every policy
    /// change, once their types are registered here.
    ///
    /// # Errors
    ///
    /// Returns an `EpisimError` if the file cannot be created or does not
    /// end in `.csv`.
    pub fn add_report<T: Report + 'static>(&mut self, path: &Path) -> Result<(), EpisimError> {
        self.reports.add_report::<T>(path)
    }

    /// Seconds of virtual wall-clock between ticks.
    fn tick_interval(&self) -> f64 {
        let days_per_second = if self.config.days_per_second > 0.0 {
            self.config.days_per_second
        } else {
            DEFAULT_DAYS_PER_SECOND
        };
        1.0 / days_per_second
    }

    /// Starts or resumes the schedule. No-op while running or after game
    /// over.
    pub fn start(&mut self) {
        if self.running || self.state.is_game_over {
            return;
        }
        self.running = true;
        self.state.has_started = true;
        info!("simulation running from day {}", self.state.day);
        self.schedule_next_tick();
    }

    /// Stops the schedule without touching state. A paused simulation can
    /// be resumed with [`Simulation::start`].
    pub fn pause(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.cancel_pending_tick();
        info!("simulation paused at day {}", self.state.day);
    }

    /// Returns to a fresh initial state derived from the current
    /// configuration. Clears the policy sets, the history, and the
    /// schedule; the RNG stream is left where it is.
    pub fn reset(&mut self) {
        self.cancel_pending_tick();
        self.ticks.clear();
        self.running = false;
        self.clock = 0.0;
        self.state = derive_state(&self.config);
        self.active_policies.clear();
        self.used_policies.clear();
        self.policy_history.clear();
        info!("simulation reset");
    }

    fn schedule_next_tick(&mut self) {
        // At most one tick may ever be pending
        self.cancel_pending_tick();
        let due = self.clock + self.tick_interval();
        let id = self.ticks.schedule(due, self.state.day + 1);
        self.pending_tick = Some(id);
    }

    fn cancel_pending_tick(&mut self) {
        if let Some(id) = self.pending_tick.take() {
            self.ticks.cancel(&id);
        }
    }

    /// Moves the virtual clock forward to `time`, executing every due tick
    /// along the way. The clock never moves backwards.
    pub fn advance_until(&mut self, time: f64) {
        while let Some(tick) = self.ticks.next_tick_before(time) {
            self.pending_tick = None;
            self.clock = tick.time;
            debug_assert_eq!(tick.data, self.state.day + 1);
            self.execute_tick();
        }
        self.clock = self.clock.max(time);
    }

    /// Moves the virtual clock forward by `seconds`.
    pub fn advance_by(&mut self, seconds: f64) {
        self.advance_until(self.clock + seconds);
    }

    /// Advances exactly one day, regardless of schedule pacing. Usable
    /// while paused; the pending tick, if any, is replaced.
    pub fn step(&mut self) {
        if self.state.is_game_over {
            return;
        }
        self.cancel_pending_tick();
        self.clock += self.tick_interval();
        self.execute_tick();
    }

    /// Advances up to `days` days, stopping early on game over.
    pub fn run_days(&mut self, days: u32) {
        for _ in 0..days {
            if self.state.is_game_over {
                break;
            }
            self.step();
        }
    }

    /// One day of the model: policy effects, epidemic transition,
    /// vaccination, cost accrual, commit, sample.
    fn execute_tick(&mut self) {
        let mut next = self.state.clone();
        let effects = aggregate_effects(
            &self.active_policies,
            next.exposed,
            next.infected,
            next.population,
        );
        let outcome = advance_epidemic(&mut next, &self.config, &effects, &mut self.rng);

        let next_day = next.day + 1;
        let vaccination_policy = find_policy(VACCINATION_POLICY_ID);
        let mut doses = 0;
        if next.vaccination_started {
            if let (Some(start_day), Some(policy)) = (next.vaccination_start_day, vaccination_policy)
            {
                doses = daily_doses(next_day, start_day, policy, next.population, next.susceptible);
            }
        }
        next.susceptible -= doses;
        next.total_vaccinated += doses;
        next.daily_vaccinated = doses;

        let cost_per_vaccination = vaccination_policy.map_or(0.0, |p| p.cost_per_vaccination);
        let accrual = accrue(
            outcome.new_deceased,
            doses,
            self.config.cost_per_death,
            cost_per_vaccination,
            &effects,
        );
        next.death_costs += accrual.death_costs;
        next.vaccine_costs += accrual.vaccine_costs;
        next.total_costs += accrual.total;
        update_policy_records(&mut next.policy_costs, &effects.policy_costs);

        next.day = next_day;
        let sample = next.snapshot();
        next.time_series.push(sample.clone());

        debug_assert_eq!(
            next.total_accounted(),
            next.population,
            "compartments plus vaccinated must account for the whole population"
        );

        self.state = next;
        trace!(
            "day {}: S={} E={} I={} R={} D={}",
            self.state.day,
            self.state.susceptible,
            self.state.exposed,
            self.state.infected,
            self.state.recovered,
            self.state.deceased
        );

        if self.reports.has_report::<DaySample>() {
            self.reports.send_report(sample);
        }

        if self.config.enable_win_lose {
            self.evaluate_end_conditions();
        }
        if self.running && !self.state.is_game_over {
            self.schedule_next_tick();
        }
    }

    /// Loss is checked before win, so a day that satisfies both ends in a
    /// loss.
    fn evaluate_end_conditions(&mut self) {
        #[allow(clippy::cast_precision_loss)]
        let death_fraction = self.state.deceased as f64 / self.state.population as f64;
        let lost = death_fraction >= self.config.max_death_percentage
            || self.state.total_costs >= self.config.max_economic_cost;
        let won = self.state.exposed == 0 && self.state.infected == 0 && self.state.has_started;

        if lost {
            self.state.is_game_over = true;
            self.state.has_won = false;
        } else if won {
            self.state.is_game_over = true;
            self.state.has_won = true;
        }
        if self.state.is_game_over {
            self.running = false;
            info!(
                "game over at day {}: {}",
                self.state.day,
                if self.state.has_won { "won" } else { "lost" }
            );
        }
    }

    /// Applies a policy by catalog id.
    ///
    /// Ongoing measures toggle membership in the active set. One-time
    /// programs trigger at most once; re-triggering is a no-op. Unknown ids
    /// are logged and ignored.
    pub fn implement_policy(&mut self, policy_id: &str) {
        let Some(policy) = find_policy(policy_id) else {
            warn!("ignoring unknown policy id {policy_id:?}");
            return;
        };

        if policy.one_time {
            if self.used_policies.contains(policy.id) {
                debug!("one-time policy {} already used", policy.id);
                return;
            }
            if policy.id == VACCINATION_POLICY_ID {
                trigger_program(&mut self.state, policy);
                self.used_policies.insert(policy.id.to_string());
                self.record_policy_event(policy.id, PolicyAction::Triggered);
            }
        } else {
            let action = if self.active_policies.contains(policy.id) {
                self.active_policies.remove(policy.id);
                PolicyAction::Deactivated
            } else {
                self.active_policies.insert(policy.id.to_string());
                PolicyAction::Activated
            };
            self.used_policies.insert(policy.id.to_string());
            self.record_policy_event(policy.id, action);
        }
    }

    fn record_policy_event(&mut self, policy_id: &str, action: PolicyAction) {
        let event = PolicyEvent {
            day: self.state.day,
            policy_id: policy_id.to_string(),
            action,
        };
        debug!("day {}: {:?} {}", event.day, event.action, event.policy_id);
        self.policy_history.push(event.clone());
        if self.reports.has_report::<PolicyEvent>() {
            self.reports.send_report(event);
        }
    }

    /// Replaces the configuration.
    ///
    /// A change limited to date-display fields is applied in place. Any
    /// model-affecting change re-derives rates and reinitializes state,
    /// preserving only the running flag and the policy sets; a running
    /// simulation keeps running at the new tick cadence.
    pub fn update_config(&mut self, new_config: SimulationConfig) {
        match classify_change(&self.config, &new_config) {
            None => {}
            Some(ConfigChange::Display) => {
                debug!("display-only config change applied");
                self.config = new_config;
            }
            Some(ConfigChange::Structural) => {
                let was_running = self.running;
                self.cancel_pending_tick();
                self.config = new_config;
                self.state = derive_state(&self.config);
                self.state.has_started = was_running;
                self.running = was_running;
                debug!(
                    "structural config change: state reinitialized (running: {was_running})"
                );
                if was_running {
                    self.schedule_next_tick();
                }
            }
        }
    }
}
