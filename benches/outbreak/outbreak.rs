use criterion::{criterion_group, criterion_main, Criterion};
use episim::params::SimulationConfig;
use episim::simulation::Simulation;

static SEED: u64 = 123;
static DAYS: u32 = 365;

fn year_long_outbreak() -> Simulation {
    let mut simulation = Simulation::with_seed(SimulationConfig::default(), SEED);
    simulation.start();
    simulation.run_days(DAYS);
    simulation
}

fn mitigated_outbreak() -> Simulation {
    let mut simulation = Simulation::with_seed(SimulationConfig::default(), SEED);
    simulation.implement_policy("masks");
    simulation.implement_policy("social_distancing");
    simulation.implement_policy("vaccination");
    simulation.start();
    simulation.run_days(DAYS);
    simulation
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("year-long outbreak", |bencher| {
        bencher.iter_with_large_drop(year_long_outbreak)
    });
    c.bench_function("mitigated outbreak", |bencher| {
        bencher.iter_with_large_drop(mitigated_outbreak)
    });
}

criterion_group!(outbreak_benches, criterion_benchmark);
criterion_main!(outbreak_benches);
