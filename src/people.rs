/*!

The agent registry. Agents are fixed-shape records indexed by
[`PersonId`]; every field is touched every few frames, so they all live
inline rather than behind per-property lookups. Removed agents keep their
slot so ids stay stable for the whole run.

*/

use crate::context::Context;
use crate::geometry::Vec2;
use crate::new_trait::New;
use crate::params::ContextParamsExt;
use crate::random::ContextRandomExt;
use crate::PersonId;
use log::trace;
use rand_distr::UnitCircle;
use serde::Serialize;

/// The closed set of epidemiological states an agent can occupy.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum HealthStatus {
    Susceptible,
    Infected,
    Recovered,
    Immune,
    /// Died of the infection. The record stays in the registry but the agent
    /// no longer takes part in any pass.
    Removed,
}

/// One agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Agent {
    pub id: PersonId,
    pub position: Vec2,
    /// Unit heading; the speed comes from the parameters.
    pub velocity: Vec2,
    pub status: HealthStatus,
    /// Frames spent infected. Meaningful only while `status` is `Infected`.
    pub infection_timer: u32,
    /// Set when a vaccination wave successfully immunized this agent.
    pub vaccinated: bool,
    pub quarantined: bool,
}

impl Agent {
    pub fn is_alive(&self) -> bool {
        self.status != HealthStatus::Removed
    }
}

pub(crate) struct PeopleData {
    pub(crate) agents: Vec<Agent>,
}

impl Default for PeopleData {
    fn default() -> Self {
        PeopleData { agents: Vec::new() }
    }
}

impl New for PeopleData {
    const new: &'static dyn Fn() -> Self = &PeopleData::default;
}

impl PeopleData {
    pub(crate) fn agent(&self, person_id: PersonId) -> &Agent {
        &self.agents[person_id.0]
    }

    pub(crate) fn agent_mut(&mut self, person_id: PersonId) -> &mut Agent {
        &mut self.agents[person_id.0]
    }

    /// Living agents in id order.
    pub(crate) fn alive(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|agent| agent.is_alive())
    }

    /// Agents in the given state, in id order.
    pub(crate) fn with_status(&self, status: HealthStatus) -> impl Iterator<Item = &Agent> {
        self.agents
            .iter()
            .filter(move |agent| agent.status == status)
    }

    pub(crate) fn tally(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for agent in &self.agents {
            match agent.status {
                HealthStatus::Susceptible => counts.susceptible += 1,
                HealthStatus::Infected => counts.infected += 1,
                HealthStatus::Recovered => counts.recovered += 1,
                HealthStatus::Immune => counts.immune += 1,
                HealthStatus::Removed => counts.removed += 1,
            }
        }
        counts
    }
}

/// A census of the registry by state.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StateCounts {
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
    pub immune: usize,
    pub removed: usize,
}

impl StateCounts {
    /// Every agent ever created, dead or alive.
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.recovered + self.immune + self.removed
    }
}

pub trait ContextPeopleExt {
    /// Total number of registry slots, including removed agents.
    fn get_current_population(&self) -> usize;
    fn count_status(&self, status: HealthStatus) -> usize;
    fn state_counts(&self) -> StateCounts;
    /// Gets a copy of the agent's record, if the id is valid.
    fn get_agent(&self, person_id: PersonId) -> Option<Agent>;
    /// Replaces the registry with a fresh population placed uniformly inside
    /// the spawn margin. The tail of the roster starts out infected.
    fn seed_population(&mut self);
}

impl ContextPeopleExt for Context {
    fn get_current_population(&self) -> usize {
        match self.get_data_container::<PeopleData>() {
            None => 0,
            Some(people_data) => people_data.agents.len(),
        }
    }

    fn count_status(&self, status: HealthStatus) -> usize {
        match self.get_data_container::<PeopleData>() {
            None => 0,
            Some(people_data) => people_data.with_status(status).count(),
        }
    }

    fn state_counts(&self) -> StateCounts {
        match self.get_data_container::<PeopleData>() {
            None => StateCounts::default(),
            Some(people_data) => people_data.tally(),
        }
    }

    fn get_agent(&self, person_id: PersonId) -> Option<Agent> {
        self.get_data_container::<PeopleData>()
            .and_then(|people_data| people_data.agents.get(person_id.0).copied())
    }

    fn seed_population(&mut self) {
        let params = self.params();
        trace!("seeding population of {}", params.population);
        let first_infected = params.population - params.initial_infected;
        let mut agents = Vec::with_capacity(params.population);
        for index in 0..params.population {
            let status = if index < first_infected {
                HealthStatus::Susceptible
            } else {
                HealthStatus::Infected
            };
            let position = Vec2::new(
                self.sample_range(params.spawn_inset..params.world_width - params.spawn_inset),
                self.sample_range(params.spawn_inset..params.world_height - params.spawn_inset),
            );
            let [vx, vy]: [f64; 2] = self.sample_distr(UnitCircle);
            agents.push(Agent {
                id: PersonId(index),
                position,
                velocity: Vec2::new(vx, vy),
                status,
                infection_timer: 0,
                vaccinated: false,
                quarantined: false,
            });
        }
        self.get_data_container_mut::<PeopleData>().agents = agents;
    }
}
