//! The one-time mass-vaccination program.
//!
//! A two-state machine: not started, then irrevocably started. Triggering
//! charges the upfront R&D cost immediately; doses begin only once the
//! catalog's implementation delay has elapsed. Vaccinated individuals leave
//! the susceptible pool and never re-enter it.

use crate::policy::PolicyOption;
use crate::state::SimulationState;

/// Starts the program, recording the start day and charging the upfront
/// cost. Callers enforce the once-only rule; calling this twice would
/// charge twice.
pub fn trigger_program(state: &mut SimulationState, policy: &PolicyOption) {
    state.vaccination_started = true;
    state.vaccination_start_day = Some(state.day);
    state.total_costs += policy.upfront_cost;
    state.vaccine_costs += policy.upfront_cost;
}

/// Doses administered on `next_day` for a program started on `start_day`.
///
/// Zero until the implementation delay has fully elapsed
/// (`next_day > start_day + delay`). Past the delay, capacity is
/// `floor(population * vaccination_rate)`, limited by the remaining
/// susceptible pool.
#[must_use]
pub fn daily_doses(
    next_day: u32,
    start_day: u32,
    policy: &PolicyOption,
    population: u64,
    susceptible: u64,
) -> u64 {
    if next_day <= start_day + policy.implementation_delay {
        return 0;
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    #[allow(clippy::cast_possible_truncation)]
    let capacity = (population as f64 * policy.vaccination_rate).floor() as u64;
    capacity.min(susceptible)
}
