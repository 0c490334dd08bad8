/*!

Contact tracking between susceptible and infectious agents. A contact record
accumulates one frame of duration for every frame the pair stays within the
infection radius; the moment a pair separates its record is dropped, so
duration always means consecutive frames in range.

*/

use crate::clock::ContextClockExt;
use crate::context::Context;
use crate::geometry::Vec2;
use crate::new_trait::New;
use crate::params::ContextParamsExt;
use crate::people::{HealthStatus, PeopleData};
use crate::PersonId;
use rustc_hash::FxHashMap;

/// An unordered agent pair stored with the smaller id first.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct ContactKey {
    low: PersonId,
    high: PersonId,
}

impl ContactKey {
    pub fn new(a: PersonId, b: PersonId) -> Self {
        if a.0 <= b.0 {
            ContactKey { low: a, high: b }
        } else {
            ContactKey { low: b, high: a }
        }
    }

    pub fn members(self) -> (PersonId, PersonId) {
        (self.low, self.high)
    }
}

/// Running tally for one susceptible-infectious pair.
#[derive(Copy, Clone, Debug)]
pub struct ContactRecord {
    /// Consecutive frames the pair has been in range.
    pub duration: u32,
    /// Frame the pair was last seen in range.
    pub last_seen: u64,
}

pub(crate) struct ContactData {
    pub(crate) records: FxHashMap<ContactKey, ContactRecord>,
}

impl New for ContactData {
    const new: &'static dyn Fn() -> Self = &|| ContactData {
        records: FxHashMap::default(),
    };
}

pub trait ContextProximityExt {
    /// Refreshes contact records for the current frame: eligible pairs in
    /// range gain a frame of duration, everyone else's record is purged.
    fn update_contacts(&mut self);
    fn active_contacts(&self) -> usize;
}

impl ContextProximityExt for Context {
    fn update_contacts(&mut self) {
        let params = self.params();
        let frame = self.frame();
        let radius_squared = params.infection_radius * params.infection_radius;

        let people_data = self.get_data_container_mut::<PeopleData>();
        let susceptible: Vec<(PersonId, Vec2)> = people_data
            .with_status(HealthStatus::Susceptible)
            .map(|agent| (agent.id, agent.position))
            .collect();
        // Quarantined agents are isolated and cannot seed new contacts.
        let infectious: Vec<(PersonId, Vec2)> = people_data
            .with_status(HealthStatus::Infected)
            .filter(|agent| !agent.quarantined)
            .map(|agent| (agent.id, agent.position))
            .collect();

        let contact_data = self.get_data_container_mut::<ContactData>();
        for (susceptible_id, susceptible_position) in &susceptible {
            for (infectious_id, infectious_position) in &infectious {
                if susceptible_position.distance_squared(*infectious_position) <= radius_squared {
                    let record = contact_data
                        .records
                        .entry(ContactKey::new(*susceptible_id, *infectious_id))
                        .or_insert(ContactRecord {
                            duration: 0,
                            last_seen: frame,
                        });
                    record.duration += 1;
                    record.last_seen = frame;
                }
            }
        }
        contact_data
            .records
            .retain(|_, record| record.last_seen == frame);
    }

    fn active_contacts(&self) -> usize {
        match self.get_data_container::<ContactData>() {
            None => 0,
            Some(contact_data) => contact_data.records.len(),
        }
    }
}
