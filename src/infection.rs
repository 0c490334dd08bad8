/*!

Transmission. Every active contact record gets one Bernoulli trial per
frame; the per-trial probability grows with how long the pair has stayed in
range, scaled by the runtime infection multiplier and clamped to `[0, 1]`.

*/

use crate::config::ContextConfigExt;
use crate::context::Context;
use crate::params::ContextParamsExt;
use crate::people::{HealthStatus, PeopleData};
use crate::proximity::{ContactData, ContactKey};
use crate::random::ContextRandomExt;
use crate::PersonId;
use log::debug;

/// Contact frames at which the duration factor is well into its plateau.
const DURATION_SCALE: f64 = 300.0;
const DURATION_FACTOR_MAX: f64 = 4.0;

/// Saturating growth of transmission risk with contact duration: 1.0 for a
/// fresh contact, approaching 4.0 as the contact persists.
pub fn duration_factor(duration: u32) -> f64 {
    1.0 + (DURATION_FACTOR_MAX - 1.0) * (1.0 - (-f64::from(duration) / DURATION_SCALE).exp())
}

/// Per-frame transmission probability for one contact.
pub fn transmission_probability(duration: u32, base: f64, multiplier: f64) -> f64 {
    (base * multiplier * duration_factor(duration)).clamp(0.0, 1.0)
}

pub trait ContextInfectionExt {
    /// Runs one trial per active contact record and returns the agents newly
    /// infected this frame. Trials run in key order so a run is reproducible
    /// for a fixed seed.
    fn resolve_infections(&mut self) -> Vec<PersonId>;
}

impl ContextInfectionExt for Context {
    fn resolve_infections(&mut self) -> Vec<PersonId> {
        let params = self.params();
        let multiplier = self.config().infection_multiplier;

        let mut keys: Vec<ContactKey> = self
            .get_data_container_mut::<ContactData>()
            .records
            .keys()
            .copied()
            .collect();
        keys.sort_unstable();

        let mut newly_infected = Vec::new();
        for key in keys {
            let Some(duration) = self
                .get_data_container_mut::<ContactData>()
                .records
                .get(&key)
                .map(|record| record.duration)
            else {
                continue;
            };

            let (low, high) = key.members();
            let target = {
                let people_data = self.get_data_container_mut::<PeopleData>();
                match (people_data.agent(low).status, people_data.agent(high).status) {
                    (HealthStatus::Susceptible, HealthStatus::Infected) => low,
                    (HealthStatus::Infected, HealthStatus::Susceptible) => high,
                    // The susceptible member was infected through another
                    // contact earlier in this pass.
                    _ => {
                        self.get_data_container_mut::<ContactData>().records.remove(&key);
                        continue;
                    }
                }
            };

            let probability =
                transmission_probability(duration, params.base_infection_prob, multiplier);
            if probability > 0.0 && self.sample_bool(probability) {
                let agent = self
                    .get_data_container_mut::<PeopleData>()
                    .agent_mut(target);
                agent.status = HealthStatus::Infected;
                agent.infection_timer = 0;
                self.get_data_container_mut::<ContactData>().records.remove(&key);
                debug!("agent {target} infected after {duration} frames of contact");
                newly_infected.push(target);
            }
        }
        newly_infected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigData;
    use crate::geometry::Vec2;
    use crate::params::Params;
    use crate::people::ContextPeopleExt;
    use crate::proximity::ContextProximityExt;
    use crate::random::ContextRandomExt;

    #[test]
    fn fresh_contact_has_unit_factor() {
        assert!((duration_factor(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn duration_factor_grows_and_saturates() {
        assert!(duration_factor(60) > duration_factor(0));
        assert!(duration_factor(600) > duration_factor(60));
        // The factor approaches 4 from below; far enough out the
        // exponential term rounds away and it sits exactly on the ceiling.
        assert!(duration_factor(10_000) < 4.0);
        let plateau = duration_factor(100_000);
        assert!(plateau > 3.9);
        assert!(plateau <= 4.0);
    }

    #[test]
    fn probability_never_leaves_the_unit_interval() {
        assert_eq!(transmission_probability(100_000, 0.9, 2.0), 1.0);
        assert_eq!(transmission_probability(50, 0.02, 0.0), 0.0);
        // With the reference base rate the ceiling sits well under one,
        // topping out at exactly 0.02 * 2 * 4 for a saturated contact.
        let max = transmission_probability(100_000, 0.02, 2.0);
        assert!(max > 0.15);
        assert!(max <= 0.16);
    }

    fn contact_world(population: usize, initial_infected: usize) -> Context {
        let mut context = Context::new();
        context.init_random(31);
        context.set_params(Params {
            population,
            initial_infected,
            ..Params::default()
        });
        context.seed_population();
        context
    }

    fn place(context: &mut Context, person_id: PersonId, x: f64, y: f64) {
        context
            .get_data_container_mut::<PeopleData>()
            .agent_mut(person_id)
            .position = Vec2::new(x, y);
    }

    #[test]
    fn sustained_contact_eventually_transmits() {
        let mut context = contact_world(2, 1);
        place(&mut context, PersonId(0), 100.0, 100.0);
        place(&mut context, PersonId(1), 105.0, 100.0);

        let mut infected_at = None;
        for pass in 0..5_000 {
            context.update_contacts();
            let newly = context.resolve_infections();
            if !newly.is_empty() {
                assert_eq!(newly, vec![PersonId(0)]);
                infected_at = Some(pass);
                break;
            }
        }
        assert!(infected_at.is_some(), "contact never transmitted");
        assert_eq!(context.count_status(HealthStatus::Infected), 2);
        // The consumed contact record is gone.
        assert_eq!(context.active_contacts(), 0);
    }

    #[test]
    fn infected_agent_timer_starts_at_zero() {
        let mut context = contact_world(2, 1);
        context
            .get_data_container_mut::<PeopleData>()
            .agent_mut(PersonId(1))
            .infection_timer = 250;
        place(&mut context, PersonId(0), 100.0, 100.0);
        place(&mut context, PersonId(1), 105.0, 100.0);

        for _ in 0..5_000 {
            context.update_contacts();
            if !context.resolve_infections().is_empty() {
                break;
            }
        }
        assert_eq!(context.get_agent(PersonId(0)).unwrap().infection_timer, 0);
    }

    #[test]
    fn zero_multiplier_blocks_all_transmission() {
        let mut context = contact_world(2, 1);
        context.get_data_container_mut::<ConfigData>().config.infection_multiplier = 0.0;
        place(&mut context, PersonId(0), 100.0, 100.0);
        place(&mut context, PersonId(1), 105.0, 100.0);

        for _ in 0..1_000 {
            context.update_contacts();
            assert!(context.resolve_infections().is_empty());
        }
        assert_eq!(context.count_status(HealthStatus::Susceptible), 1);
    }

    #[test]
    fn failed_trial_leaves_the_record_in_place() {
        let mut context = contact_world(2, 1);
        context.get_data_container_mut::<ConfigData>().config.infection_multiplier = 0.1;
        place(&mut context, PersonId(0), 100.0, 100.0);
        place(&mut context, PersonId(1), 105.0, 100.0);

        context.update_contacts();
        // A trial at the clamped floor almost certainly fails on any given
        // frame; whether it fails or succeeds, the bookkeeping must agree.
        let newly = context.resolve_infections();
        if newly.is_empty() {
            assert_eq!(context.active_contacts(), 1);
        } else {
            assert_eq!(context.active_contacts(), 0);
        }
    }
}
