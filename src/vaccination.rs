use crate::config::ContextConfigExt;
use crate::context::Context;
use crate::params::ContextParamsExt;
use crate::people::{HealthStatus, PeopleData};
use crate::random::ContextRandomExt;
use crate::PersonId;
use log::debug;

pub trait ContextVaccinationExt {
    /// Runs one vaccination wave over the current susceptible pool and
    /// returns the agents it immunized. Coverage, scaled by the runtime
    /// multiplier, picks candidates; the success probability decides whether
    /// the shot takes. A failed shot leaves the agent untouched.
    fn trigger_vaccination_wave(&mut self) -> Vec<PersonId>;
}

impl ContextVaccinationExt for Context {
    fn trigger_vaccination_wave(&mut self) -> Vec<PersonId> {
        let params = self.params();
        let coverage = (params.vaccination_coverage * self.config().vaccination_multiplier)
            .clamp(0.0, 1.0);
        let candidates: Vec<PersonId> = self
            .get_data_container_mut::<PeopleData>()
            .with_status(HealthStatus::Susceptible)
            .map(|agent| agent.id)
            .collect();
        let pool = candidates.len();

        let mut immunized = Vec::new();
        for person_id in candidates {
            if coverage > 0.0
                && self.sample_bool(coverage)
                && self.sample_bool(params.vaccination_success_prob)
            {
                let agent = self
                    .get_data_container_mut::<PeopleData>()
                    .agent_mut(person_id);
                agent.status = HealthStatus::Immune;
                agent.vaccinated = true;
                immunized.push(person_id);
            }
        }
        debug!(
            "vaccination wave immunized {} of {} susceptible",
            immunized.len(),
            pool
        );
        immunized
    }
}
