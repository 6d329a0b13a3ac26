//! Economic cost accrual: deaths, vaccine delivery, and per-policy spend.
//!
//! Every cost field is monotonically non-decreasing; accrual only ever adds.
//! The one-time vaccination program never appears in the per-policy records,
//! its spending is tracked separately as upfront R&D plus per-dose delivery.

use crate::policy::{PolicyDailyCost, PolicyEffects};
use crate::state::PolicyCostRecord;

/// One tick's worth of new costs, by category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostAccrual {
    pub death_costs: f64,
    pub vaccine_costs: f64,
    pub policy_costs: f64,
    /// Sum of the three categories.
    pub total: f64,
}

/// Computes the costs incurred by one tick's outcomes.
#[must_use]
pub fn accrue(
    new_deceased: u64,
    daily_vaccinated: u64,
    cost_per_death: f64,
    cost_per_vaccination: f64,
    effects: &PolicyEffects,
) -> CostAccrual {
    #[allow(clippy::cast_precision_loss)]
    let death_costs = new_deceased as f64 * cost_per_death;
    #[allow(clippy::cast_precision_loss)]
    let vaccine_costs = daily_vaccinated as f64 * cost_per_vaccination;
    let policy_costs = effects.daily_costs;
    CostAccrual {
        death_costs,
        vaccine_costs,
        policy_costs,
        total: death_costs + vaccine_costs + policy_costs,
    }
}

/// Folds one day's per-policy costs into the running records.
///
/// A policy seen for the first time gets a new record; an existing record
/// gains one active day and the day's cost. Records keep first-seen order.
pub fn update_policy_records(records: &mut Vec<PolicyCostRecord>, daily: &[PolicyDailyCost]) {
    for cost in daily {
        match records.iter_mut().find(|r| r.policy_id == cost.policy_id) {
            Some(record) => {
                record.days_active += 1;
                record.total_cost += cost.cost;
            }
            None => records.push(PolicyCostRecord {
                policy_id: cost.policy_id.to_string(),
                days_active: 1,
                total_cost: cost.cost,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;
    use crate::numeric::ACC;

    #[test]
    fn accrual_sums_categories() {
        let effects = PolicyEffects {
            daily_costs: 5_000.0,
            ..PolicyEffects::default()
        };
        let accrual = accrue(3, 100, 1_000_000.0, 20.0, &effects);
        assert_almost_eq!(accrual.death_costs, 3_000_000.0, ACC);
        assert_almost_eq!(accrual.vaccine_costs, 2_000.0, ACC);
        assert_almost_eq!(accrual.policy_costs, 5_000.0, ACC);
        assert_almost_eq!(accrual.total, 3_007_000.0, ACC);
    }

    #[test]
    fn quiet_day_accrues_nothing() {
        let accrual = accrue(0, 0, 1_000_000.0, 20.0, &PolicyEffects::default());
        assert_eq!(accrual, CostAccrual::default());
    }

    #[test]
    fn records_created_then_accumulated() {
        let mut records = Vec::new();
        let day_one = [
            PolicyDailyCost {
                policy_id: "masks",
                cost: 3_000.0,
            },
            PolicyDailyCost {
                policy_id: "lockdown",
                cost: 100_000.0,
            },
        ];
        update_policy_records(&mut records, &day_one);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].policy_id, "masks");
        assert_eq!(records[0].days_active, 1);

        // lockdown lifted, masks stay on
        let day_two = [PolicyDailyCost {
            policy_id: "masks",
            cost: 3_000.0,
        }];
        update_policy_records(&mut records, &day_two);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].days_active, 2);
        assert_almost_eq!(records[0].total_cost, 6_000.0, ACC);
        assert_eq!(records[1].days_active, 1);
        assert_almost_eq!(records[1].total_cost, 100_000.0, ACC);
    }
}
