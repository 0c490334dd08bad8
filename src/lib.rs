/*!

An agent-based SIR epidemic simulation kernel.

A fixed population of agents wanders a bounded rectangular world. Infection
spreads through sustained proximity between susceptible and infectious
agents; each infection runs a timer and resolves into recovery or death.
Vaccination waves immunize part of the susceptible pool, and an optional
quarantine zone pulls infectious agents out of circulation while slots last.

The kernel is headless. A display or analysis layer drives it by submitting
[`commands::Command`]s and calling [`clock::ContextClockExt::tick`], then
reads the world back through [`snapshot::ContextSnapshotExt::frame_snapshot`].
For a fixed seed and command sequence the trajectory is reproducible.

*/

pub mod clock;
pub mod commands;
pub mod config;
mod context;
pub mod error;
pub mod geometry;
pub mod infection;
pub mod logging;
pub mod movement;
mod new_trait;
pub mod params;
pub mod people;
pub mod proximity;
pub mod quarantine;
pub mod random;
pub mod recovery;
pub mod report;
pub mod snapshot;
pub mod stats;
pub mod vaccination;

// All modules import `crate::TypeId` in case we want to change the underlying type of `TypeId`.
pub(crate) use std::any::TypeId;
pub use context::Context;
pub use error::EpisimError;
pub use new_trait::New;

use serde::Serialize;
use std::fmt;

#[inline(always)]
pub fn type_of<T: 'static>() -> TypeId {
    TypeId::of::<T>()
}

/// Stable identity of an agent: its index in the registry. Ids are assigned
/// at seeding and never reused within a run.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub struct PersonId(pub(crate) usize);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One import for everything a simulation driver needs.
pub mod prelude {
    pub use crate::clock::{ContextClockExt, RunState};
    pub use crate::commands::{Command, ContextCommandExt, Scenario};
    pub use crate::config::{ContextConfigExt, RuntimeConfig};
    pub use crate::geometry::{Rect, Vec2};
    pub use crate::infection::ContextInfectionExt;
    pub use crate::movement::ContextMovementExt;
    pub use crate::params::{ContextParamsExt, Params};
    pub use crate::people::{Agent, ContextPeopleExt, HealthStatus, StateCounts};
    pub use crate::proximity::ContextProximityExt;
    pub use crate::quarantine::ContextQuarantineExt;
    pub use crate::random::ContextRandomExt;
    pub use crate::recovery::ContextRecoveryExt;
    pub use crate::report::ContextReportExt;
    pub use crate::snapshot::{ContextSnapshotExt, FrameSnapshot};
    pub use crate::stats::{ContextStatsExt, RunTotals, StatisticsSnapshot};
    pub use crate::vaccination::ContextVaccinationExt;
    pub use crate::{Context, EpisimError, PersonId};
}
