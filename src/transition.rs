//! The epidemic transition engine: one day of SEIRD compartment flow.
//!
//! Continuous-time rates are converted to discrete daily expected counts and
//! resolved with stochastic rounding, keeping compartments integral without
//! the systematic downward bias of truncation. The step order is load
//! bearing; see [`advance_epidemic`].

use rand::Rng;

use crate::params::SimulationConfig;
use crate::policy::PolicyEffects;
use crate::state::SimulationState;

/// Per-tick transition counts between compartments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayOutcome {
    pub new_exposed: u64,
    pub new_infectious: u64,
    pub new_recovered: u64,
    pub new_deceased: u64,
}

/// Resolves an expected count to an integer: `floor(e)` plus one extra unit
/// with probability `e - floor(e)`.
///
/// Non-finite and non-positive inputs resolve to zero.
pub fn stochastic_round<R: Rng + ?Sized>(expected: f64, rng: &mut R) -> u64 {
    if !expected.is_finite() || expected <= 0.0 {
        return 0;
    }
    let whole = expected.floor();
    let fraction = expected - whole;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = whole as u64;
    if rng.random_bool(fraction) {
        whole + 1
    } else {
        whole
    }
}

/// Effective reproduction number under the current transmission rate.
///
/// Returns zero when `gamma` or `population` make the expression undefined.
#[must_use]
pub fn effective_r(beta: f64, gamma: f64, susceptible: u64, population: u64) -> f64 {
    if gamma <= 0.0 || population == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let susceptible = susceptible as f64;
    #[allow(clippy::cast_precision_loss)]
    let population = population as f64;
    (beta * susceptible) / (population * gamma)
}

/// Advances the compartments by one day under the given policy effects.
///
/// Steps, in order:
/// 1. detection isolates `floor(exposed * detection_rate)` from progression
///    this tick (the isolated cases stay in the exposed count),
/// 2. new exposures from effective beta, clamped to the susceptible pool,
/// 3. exposed-to-infectious progression from the non-isolated remainder,
/// 4. infectious exits, split into deaths and recoveries,
/// 5. counts applied, `total_cases` incremented by the new exposures,
/// 6. `re` recomputed from the end-of-day susceptible count.
///
/// Detection never alters this tick's exposure math; it limits onward
/// progression only. All transition counts are clamped so no compartment
/// can go negative.
pub fn advance_epidemic<R: Rng + ?Sized>(
    state: &mut SimulationState,
    config: &SimulationConfig,
    effects: &PolicyEffects,
    rng: &mut R,
) -> DayOutcome {
    let effective_contacts = config.contacts_per_day * (1.0 - effects.contact_reduction);
    let effective_transmission_rate =
        config.transmission_probability * (1.0 - effects.transmission_reduction);
    let effective_beta = effective_contacts * effective_transmission_rate;

    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    #[allow(clippy::cast_possible_truncation)]
    let detected_exposed = (state.exposed as f64 * effects.exposed_detection_rate).floor() as u64;
    let adjusted_exposed = state.exposed.saturating_sub(detected_exposed);

    #[allow(clippy::cast_precision_loss)]
    let expected_exposures =
        effective_beta * state.susceptible as f64 * state.infected as f64 / state.population as f64;
    let new_exposed = stochastic_round(expected_exposures, rng).min(state.susceptible);

    #[allow(clippy::cast_precision_loss)]
    let expected_infectious = state.sigma * adjusted_exposed as f64;
    let new_infectious = stochastic_round(expected_infectious, rng).min(adjusted_exposed);

    #[allow(clippy::cast_precision_loss)]
    let expected_exits = state.gamma * state.infected as f64;
    let total_exits = stochastic_round(expected_exits, rng).min(state.infected);

    #[allow(clippy::cast_precision_loss)]
    let expected_deaths = config.mortality_rate * total_exits as f64;
    let new_deceased = stochastic_round(expected_deaths, rng).min(total_exits);
    let new_recovered = total_exits - new_deceased;

    state.susceptible = state.susceptible.saturating_sub(new_exposed);
    state.exposed = (state.exposed + new_exposed).saturating_sub(new_infectious);
    state.infected = (state.infected + new_infectious).saturating_sub(total_exits);
    state.recovered += new_recovered;
    state.deceased += new_deceased;
    state.total_cases += new_exposed;

    state.effective_contacts = effective_contacts;
    state.effective_transmission_rate = effective_transmission_rate;
    state.re = effective_r(
        effective_beta,
        state.gamma,
        state.susceptible,
        state.population,
    );

    DayOutcome {
        new_exposed,
        new_infectious,
        new_recovered,
        new_deceased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;
    use crate::numeric::ACC;
    use crate::state::derive_state;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn rounding_returns_floor_or_ceiling() {
        let mut rng = rng(42);
        for _ in 0..1000 {
            let value = stochastic_round(3.7, &mut rng);
            assert!(value == 3 || value == 4);
        }
    }

    #[test]
    fn rounding_exact_integers_never_add() {
        let mut rng = rng(42);
        for _ in 0..1000 {
            assert_eq!(stochastic_round(5.0, &mut rng), 5);
        }
    }

    #[test]
    fn rounding_guards_degenerate_inputs() {
        let mut rng = rng(42);
        assert_eq!(stochastic_round(0.0, &mut rng), 0);
        assert_eq!(stochastic_round(-2.5, &mut rng), 0);
        assert_eq!(stochastic_round(f64::NAN, &mut rng), 0);
        assert_eq!(stochastic_round(f64::INFINITY, &mut rng), 0);
    }

    #[test]
    fn rounding_long_run_frequency_matches_fraction() {
        // fraction 0.3 over many draws; the extra-unit rate converges to it
        let mut rng = rng(8675309);
        let draws = 10_000;
        let extras: u64 = (0..draws)
            .map(|_| stochastic_round(2.3, &mut rng) - 2)
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let frequency = extras as f64 / draws as f64;
        assert!(
            (frequency - 0.3).abs() < 0.02,
            "observed frequency {frequency} too far from 0.3"
        );
    }

    #[test]
    fn effective_r_standard_form() {
        // beta * S / (N * gamma)
        let re = effective_r(0.15, 1.0 / 14.0, 500_000, 1_000_000);
        assert_almost_eq!(re, 0.15 * 0.5 * 14.0, ACC);
    }

    #[test]
    fn effective_r_guards() {
        assert_almost_eq!(effective_r(0.15, 0.0, 1000, 1000), 0.0, ACC);
        assert_almost_eq!(effective_r(0.15, -1.0, 1000, 1000), 0.0, ACC);
        assert_almost_eq!(effective_r(0.15, 0.5, 1000, 0), 0.0, ACC);
    }

    #[test]
    fn advance_conserves_population() {
        let config = SimulationConfig::default();
        let mut state = derive_state(&config);
        // push the outbreak along far enough to exercise every transition
        state.susceptible = 900_000;
        state.exposed = 50_000;
        state.infected = 40_000;
        state.recovered = 9_000;
        state.deceased = 1_000;
        let mut rng = rng(7);
        for _ in 0..200 {
            advance_epidemic(&mut state, &config, &PolicyEffects::default(), &mut rng);
            assert_eq!(state.total_accounted(), state.population);
        }
    }

    #[test]
    fn no_exposures_without_infectious() {
        let config = SimulationConfig::default();
        let mut state = derive_state(&config);
        state.susceptible += state.infected;
        state.infected = 0;
        let mut rng = rng(3);
        let outcome = advance_epidemic(&mut state, &config, &PolicyEffects::default(), &mut rng);
        assert_eq!(outcome.new_exposed, 0);
        assert_eq!(state.total_cases, 1);
    }

    #[test]
    fn exposures_clamped_to_susceptible() {
        let config = SimulationConfig {
            contacts_per_day: 1000.0,
            transmission_probability: 1.0,
            ..SimulationConfig::default()
        };
        let mut state = derive_state(&config);
        state.susceptible = 3;
        state.infected = 500_000;
        state.recovered = state.population - state.susceptible - state.infected;
        let mut rng = rng(11);
        let outcome = advance_epidemic(&mut state, &config, &PolicyEffects::default(), &mut rng);
        assert!(outcome.new_exposed <= 3);
        assert_eq!(state.total_accounted(), state.population);
    }

    #[test]
    fn no_exposures_without_susceptibles() {
        let config = SimulationConfig::default();
        let mut state = derive_state(&config);
        state.susceptible = 0;
        state.infected = 400_000;
        state.recovered = state.population - state.infected;
        let mut rng = rng(19);
        for _ in 0..50 {
            let outcome =
                advance_epidemic(&mut state, &config, &PolicyEffects::default(), &mut rng);
            assert_eq!(outcome.new_exposed, 0);
        }
    }

    #[test]
    fn detection_limits_progression_not_counts() {
        let config = SimulationConfig {
            latent_period: 1.0,
            ..SimulationConfig::default()
        };
        let mut state = derive_state(&config);
        state.susceptible -= 100;
        state.exposed = 100;
        // sigma = 1, so all eligible exposed progress this tick
        let effects = PolicyEffects {
            exposed_detection_rate: 0.5,
            ..PolicyEffects::default()
        };
        let mut rng = rng(5);
        let outcome = advance_epidemic(&mut state, &config, &effects, &mut rng);
        // floor(100 * 0.5) = 50 isolated; exactly the other 50 progress
        assert_eq!(outcome.new_infectious, 50);
        // the isolated half stays in the exposed pool
        assert_eq!(state.exposed, 50 + outcome.new_exposed);
    }

    #[test]
    fn reductions_scale_exposure_pressure() {
        let config = SimulationConfig::default();
        let effects = PolicyEffects {
            contact_reduction: 0.5,
            transmission_reduction: 0.4,
            ..PolicyEffects::default()
        };
        let mut state = derive_state(&config);
        state.susceptible = 600_000;
        state.infected = 100_000;
        state.recovered = state.population - state.susceptible - state.infected;
        let mut rng = rng(13);
        advance_epidemic(&mut state, &config, &effects, &mut rng);
        assert_almost_eq!(state.effective_contacts, 5.0, ACC);
        assert_almost_eq!(state.effective_transmission_rate, 0.009, ACC);
        // re reflects the reduced beta and the end-of-day susceptible count
        let expected_re = effective_r(
            5.0 * 0.009,
            state.gamma,
            state.susceptible,
            state.population,
        );
        assert_almost_eq!(state.re, expected_re, ACC);
    }

    #[test]
    fn transmission_reduction_scales_day_one_re() {
        let config = SimulationConfig {
            population: 1000,
            contacts_per_day: 10.0,
            transmission_probability: 0.02,
            ..SimulationConfig::default()
        };
        let mut unmitigated = derive_state(&config);
        let mut reduced = derive_state(&config);
        let effects = PolicyEffects {
            transmission_reduction: 0.7,
            ..PolicyEffects::default()
        };
        advance_epidemic(&mut unmitigated, &config, &PolicyEffects::default(), &mut rng(23));
        advance_epidemic(&mut reduced, &config, &effects, &mut rng(23));

        // day-1 susceptible counts differ by at most a couple of people, so
        // the re ratio sits right at the 1 - 0.7 factor
        let ratio = reduced.re / unmitigated.re;
        assert!(
            (ratio - 0.3).abs() < 0.005,
            "re ratio {ratio} not near the 0.3 factor"
        );
    }

    #[test]
    fn mortality_splits_exits() {
        let config = SimulationConfig {
            mortality_rate: 1.0,
            infectious_period: 1.0,
            ..SimulationConfig::default()
        };
        let mut state = derive_state(&config);
        state.susceptible -= 999;
        state.infected = 1_000;
        // gamma = 1 and mortality 1: every infectious exits and dies
        let mut rng = rng(17);
        let outcome = advance_epidemic(&mut state, &config, &PolicyEffects::default(), &mut rng);
        assert_eq!(outcome.new_deceased, 1_000);
        assert_eq!(outcome.new_recovered, 0);
        assert_eq!(state.infected, outcome.new_infectious);
    }
}
