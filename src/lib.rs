//! An engine for compartmental epidemic simulations
//!
//! Episim models an outbreak in a closed population using a stochastic
//! SEIRD compartment model. The primary use case is interactive
//! what-if experimentation: run an outbreak, enact containment policies
//! mid-flight, and watch the epidemic curve and the economic bill respond.
//!
//! The central object is the [`Simulation`](simulation::Simulation), which
//! owns the full model state and provides core services such as:
//! * Maintaining a wall-clock style notion of time and converting it into
//!   simulated days at a configurable cadence
//! * Advancing the SEIRD compartments one day at a time with stochastic
//!   integer rounding so small populations stay plausible
//! * Applying the combined effects of active containment policies to
//!   disease spread and accruing their daily costs
//! * Writing per-day samples and policy events out as CSV reports
//!
//! The supporting modules each own one slice of the model: `transition`
//! holds the compartment math, `policy` the containment catalog and its
//! aggregation rules, `vaccination` the one-time vaccination campaign,
//! `economics` the cost accounting, and `params` the configuration and
//! derived epidemiological rates.
pub mod economics;
pub mod error;
pub mod log;
pub mod macros;
pub mod numeric;
pub mod params;
pub mod pathogen;
pub mod policy;
pub mod prelude;
pub mod report;
pub mod runner;
pub mod schedule;
pub mod simulation;
pub mod state;
pub mod transition;
pub mod vaccination;

// Re-exported for macro use
pub use csv;

pub use error::EpisimError;
pub use report::Report;
pub use simulation::Simulation;
