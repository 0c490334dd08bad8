/*!

Infection timers and outcomes. Every infected agent's timer advances once
per frame, the frame it caught the infection included. When the timer
reaches the recovery threshold the outcome resolves immediately: recovery
with the scaled recovery probability, death otherwise.

*/

use crate::config::ContextConfigExt;
use crate::context::Context;
use crate::params::ContextParamsExt;
use crate::people::{HealthStatus, PeopleData};
use crate::random::ContextRandomExt;
use crate::PersonId;
use log::debug;

/// Agents that left the infected pool this frame, by outcome.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RecoveryOutcome {
    pub recovered: Vec<PersonId>,
    pub removed: Vec<PersonId>,
}

pub trait ContextRecoveryExt {
    /// Advances every infection timer and resolves outcomes for agents whose
    /// infection has run its course.
    fn resolve_recoveries(&mut self) -> RecoveryOutcome;
}

impl ContextRecoveryExt for Context {
    fn resolve_recoveries(&mut self) -> RecoveryOutcome {
        let params = self.params();
        let recovery_probability =
            (params.base_recovery_prob * self.config().recovery_multiplier).clamp(0.0, 1.0);

        let infected: Vec<PersonId> = self
            .get_data_container_mut::<PeopleData>()
            .with_status(HealthStatus::Infected)
            .map(|agent| agent.id)
            .collect();

        let mut outcome = RecoveryOutcome::default();
        for person_id in infected {
            let timer = {
                let agent = self
                    .get_data_container_mut::<PeopleData>()
                    .agent_mut(person_id);
                agent.infection_timer += 1;
                agent.infection_timer
            };
            if timer < params.recovery_threshold {
                continue;
            }
            let recovers = self.sample_bool(recovery_probability);
            let agent = self
                .get_data_container_mut::<PeopleData>()
                .agent_mut(person_id);
            if recovers {
                agent.status = HealthStatus::Recovered;
                outcome.recovered.push(person_id);
            } else {
                agent.status = HealthStatus::Removed;
                outcome.removed.push(person_id);
            }
        }
        if !outcome.recovered.is_empty() || !outcome.removed.is_empty() {
            debug!(
                "{} recovered and {} died this frame",
                outcome.recovered.len(),
                outcome.removed.len()
            );
        }
        outcome
    }
}
