//! The intervention catalog and the aggregation of active-policy effects.
//!
//! Policies come in two kinds. Ongoing measures (masks, lockdowns) are
//! toggled in and out of an active set and contribute contact and
//! transmission reductions plus daily costs while active. One-time programs
//! (vaccination)
//! are triggered exactly once and handled by [`crate::vaccination`] rather
//! than by effect aggregation.
//!
//! Aggregation walks the catalog rather than the active set, so a stale or
//! unknown id in the active set is skipped silently and every call site sees
//! the same catalog defaults.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::define_report;

/// Upper bound on each aggregate reduction and on the detection rate.
/// Prevents a policy stack from eliminating transmission outright.
pub const EFFECT_CAP: f64 = 0.95;

/// Catalog id of the one-time mass-vaccination program.
pub const VACCINATION_POLICY_ID: &str = "vaccination";

/// A static catalog entry describing one intervention.
///
/// Effect fields not applicable to a given policy are zero; `one_time`
/// distinguishes irrevocable programs from toggleable measures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Fraction removed from daily contacts while active.
    pub contact_reduction: f64,
    /// Fraction removed from per-contact transmission while active.
    pub transmission_reduction: f64,
    /// Fraction of the exposed compartment isolated before progression.
    pub exposed_detection_rate: f64,
    pub daily_cost_per_person: f64,
    pub daily_cost_per_case: f64,
    /// Days after activation before the effect applies. Informational for
    /// ongoing measures; enforced for one-time programs.
    pub implementation_delay: u32,
    pub one_time: bool,
    /// Fraction of the population vaccinated per day once effective.
    pub vaccination_rate: f64,
    /// Delivery cost per dose.
    pub cost_per_vaccination: f64,
    /// Charged once at trigger time.
    pub upfront_cost: f64,
}

/// The built-in intervention catalog, in display order.
pub const POLICIES: &[PolicyOption] = &[
    PolicyOption {
        id: "masks",
        name: "Mandatory Mask Wearing",
        description: "Require masks in all public spaces.",
        contact_reduction: 0.0,
        transmission_reduction: 0.3,
        exposed_detection_rate: 0.0,
        daily_cost_per_person: 3.0,
        daily_cost_per_case: 0.0,
        implementation_delay: 3,
        one_time: false,
        vaccination_rate: 0.0,
        cost_per_vaccination: 0.0,
        upfront_cost: 0.0,
    },
    PolicyOption {
        id: "social_distancing",
        name: "Social Distancing Measures",
        description: "Limit gatherings and enforce physical distancing.",
        contact_reduction: 0.3,
        transmission_reduction: 0.0,
        exposed_detection_rate: 0.0,
        daily_cost_per_person: 20.0,
        daily_cost_per_case: 0.0,
        implementation_delay: 1,
        one_time: false,
        vaccination_rate: 0.0,
        cost_per_vaccination: 0.0,
        upfront_cost: 0.0,
    },
    PolicyOption {
        id: "rapid_containment",
        name: "Rapid Detection & Containment",
        description: "Implement aggressive testing and isolation.",
        contact_reduction: 0.8,
        transmission_reduction: 0.0,
        exposed_detection_rate: 0.5,
        daily_cost_per_person: 5.0,
        daily_cost_per_case: 200.0,
        implementation_delay: 5,
        one_time: false,
        vaccination_rate: 0.0,
        cost_per_vaccination: 0.0,
        upfront_cost: 0.0,
    },
    PolicyOption {
        id: "lockdown",
        name: "Full Lockdown",
        description: "Implement a complete lockdown of non-essential activities.",
        contact_reduction: 0.95,
        transmission_reduction: 0.0,
        exposed_detection_rate: 0.0,
        daily_cost_per_person: 100.0,
        daily_cost_per_case: 0.0,
        implementation_delay: 10,
        one_time: false,
        vaccination_rate: 0.0,
        cost_per_vaccination: 0.0,
        upfront_cost: 0.0,
    },
    PolicyOption {
        id: VACCINATION_POLICY_ID,
        name: "Mass Vaccination Program",
        description: "Launch an immediate vaccination program.",
        contact_reduction: 0.0,
        transmission_reduction: 0.0,
        exposed_detection_rate: 0.0,
        daily_cost_per_person: 0.0,
        daily_cost_per_case: 0.0,
        implementation_delay: 100,
        one_time: true,
        vaccination_rate: 0.01,
        cost_per_vaccination: 20.0,
        upfront_cost: 10_000_000_000.0,
    },
];

/// Looks up a catalog entry by id.
#[must_use]
pub fn find_policy(id: &str) -> Option<&'static PolicyOption> {
    POLICIES.iter().find(|p| p.id == id)
}

/// One policy's share of a day's costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyDailyCost {
    pub policy_id: &'static str,
    pub cost: f64,
}

/// Aggregate effect of the active ongoing policies for one day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicyEffects {
    pub contact_reduction: f64,
    pub transmission_reduction: f64,
    pub exposed_detection_rate: f64,
    /// Sum over `policy_costs`.
    pub daily_costs: f64,
    /// Per-policy breakdown, in catalog order.
    pub policy_costs: Vec<PolicyDailyCost>,
}

/// Combines the effects of all active ongoing policies.
///
/// Reductions stack additively; detection does not stack, the
/// best-detecting active policy wins. Each aggregate is then clamped to
/// [`EFFECT_CAP`]. Costs are charged as
/// `daily_cost_per_person * population + daily_cost_per_case * (exposed + infected)`
/// per policy, broken out per id in the same pass so the total and the
/// breakdown can never disagree.
#[must_use]
pub fn aggregate_effects(
    active_policies: &BTreeSet<String>,
    exposed: u64,
    infected: u64,
    population: u64,
) -> PolicyEffects {
    let mut effects = PolicyEffects::default();
    #[allow(clippy::cast_precision_loss)]
    let active_cases = (exposed + infected) as f64;
    #[allow(clippy::cast_precision_loss)]
    let population = population as f64;

    for policy in POLICIES {
        if policy.one_time || !active_policies.contains(policy.id) {
            continue;
        }
        effects.contact_reduction += policy.contact_reduction;
        effects.transmission_reduction += policy.transmission_reduction;
        effects.exposed_detection_rate = effects
            .exposed_detection_rate
            .max(policy.exposed_detection_rate);

        let cost =
            policy.daily_cost_per_person * population + policy.daily_cost_per_case * active_cases;
        effects.daily_costs += cost;
        effects.policy_costs.push(PolicyDailyCost {
            policy_id: policy.id,
            cost,
        });
    }

    effects.contact_reduction = effects.contact_reduction.min(EFFECT_CAP);
    effects.transmission_reduction = effects.transmission_reduction.min(EFFECT_CAP);
    effects.exposed_detection_rate = effects.exposed_detection_rate.min(EFFECT_CAP);
    effects
}

/// What happened to a policy on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyAction {
    /// An ongoing measure was toggled on.
    Activated,
    /// An ongoing measure was toggled off.
    Deactivated,
    /// A one-time program was started.
    Triggered,
}

/// A row in the policy activation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEvent {
    pub day: u32,
    pub policy_id: String,
    pub action: PolicyAction,
}

define_report!(PolicyEvent);
