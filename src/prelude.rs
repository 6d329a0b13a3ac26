pub use crate::error::EpisimError;
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::params::{ConfigChange, DerivedRates, SimulationConfig};
pub use crate::pathogen::{find_pathogen, PathogenPreset};
pub use crate::policy::{find_policy, PolicyEffects, PolicyEvent, PolicyOption};
pub use crate::report::{Report, ReportWriters};
pub use crate::runner::{run_with_args, run_with_custom_args, BaseArgs};
pub use crate::simulation::{Phase, Simulation};
pub use crate::state::{DaySample, SimulationState};
pub use crate::{assert_almost_eq, define_report};
