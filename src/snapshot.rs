/*!

Read-only views for the display layer. A [`FrameSnapshot`] carries
everything needed to draw one frame and its statistics panel; taking one
never mutates the world, so a renderer can poll between ticks at will.

*/

use crate::clock::{ContextClockExt, RunState};
use crate::config::ContextConfigExt;
use crate::context::Context;
use crate::geometry::{Rect, Vec2};
use crate::params::ContextParamsExt;
use crate::people::{HealthStatus, PeopleData};
use crate::quarantine::ContextQuarantineExt;
use crate::stats::{ContextStatsExt, RunTotals, StatisticsSnapshot, StatsData};
use crate::PersonId;
use serde::Serialize;

/// What the display layer needs to draw one agent.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct AgentView {
    pub id: PersonId,
    pub position: Vec2,
    pub status: HealthStatus,
    pub quarantined: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ZoneView {
    pub bounds: Rect,
    pub occupancy: usize,
    pub capacity: usize,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ConfigView {
    pub infection_multiplier: f64,
    pub recovery_multiplier: f64,
    pub vaccination_multiplier: f64,
    pub quarantine_enabled: bool,
    pub paused: bool,
}

/// A view of the world between ticks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    /// Living agents in id order.
    pub agents: Vec<AgentView>,
    pub zone: ZoneView,
    pub config: ConfigView,
    pub totals: RunTotals,
    /// Oldest first, bounded by the history capacity.
    pub history: Vec<StatisticsSnapshot>,
}

pub trait ContextSnapshotExt {
    fn frame_snapshot(&self) -> FrameSnapshot;
}

impl ContextSnapshotExt for Context {
    fn frame_snapshot(&self) -> FrameSnapshot {
        let params = self.params();
        let config = self.config();
        let agents = match self.get_data_container::<PeopleData>() {
            None => Vec::new(),
            Some(people_data) => people_data
                .alive()
                .map(|agent| AgentView {
                    id: agent.id,
                    position: agent.position,
                    status: agent.status,
                    quarantined: agent.quarantined,
                })
                .collect(),
        };
        let history = match self.get_data_container::<StatsData>() {
            None => Vec::new(),
            Some(stats_data) => stats_data.history.iter().copied().collect(),
        };
        FrameSnapshot {
            frame: self.frame(),
            agents,
            zone: ZoneView {
                bounds: params.quarantine_zone,
                occupancy: self.zone_occupancy(),
                capacity: params.quarantine_capacity,
                enabled: config.quarantine_enabled,
            },
            config: ConfigView {
                infection_multiplier: config.infection_multiplier,
                recovery_multiplier: config.recovery_multiplier,
                vaccination_multiplier: config.vaccination_multiplier,
                quarantine_enabled: config.quarantine_enabled,
                paused: self.run_state() == RunState::Paused,
            },
            totals: self.run_totals(),
            history,
        }
    }
}
