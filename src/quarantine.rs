/*!

The quarantine zone. While enabled, infectious agents are admitted in id
order until capacity runs out; each admission gets a random spot inside the
zone to steer toward. An occupant leaves the moment its infection ends, and
its slot is reusable the same frame. Disabling the zone releases everyone at
once.

*/

use crate::config::ContextConfigExt;
use crate::context::Context;
use crate::geometry::Vec2;
use crate::new_trait::New;
use crate::params::ContextParamsExt;
use crate::people::{HealthStatus, PeopleData};
use crate::random::ContextRandomExt;
use crate::PersonId;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

/// Margin kept between assigned spots and the zone boundary.
const SPOT_INSET: f64 = 10.0;

pub(crate) struct QuarantineData {
    pub(crate) occupants: FxHashSet<PersonId>,
    /// Spot inside the zone each occupant steers toward.
    pub(crate) targets: FxHashMap<PersonId, Vec2>,
}

impl New for QuarantineData {
    const new: &'static dyn Fn() -> Self = &|| QuarantineData {
        occupants: FxHashSet::default(),
        targets: FxHashMap::default(),
    };
}

impl QuarantineData {
    pub(crate) fn clear(&mut self) {
        self.occupants.clear();
        self.targets.clear();
    }
}

pub trait ContextQuarantineExt {
    /// Reconciles zone membership with the flag, the capacity, and the
    /// current health states.
    fn sync_quarantine(&mut self);
    fn zone_occupancy(&self) -> usize;
}

impl ContextQuarantineExt for Context {
    fn sync_quarantine(&mut self) {
        let params = self.params();

        if !self.config().quarantine_enabled {
            let released: Vec<PersonId> = self
                .get_data_container_mut::<QuarantineData>()
                .occupants
                .drain()
                .collect();
            self.get_data_container_mut::<QuarantineData>().targets.clear();
            if !released.is_empty() {
                debug!("quarantine disabled, releasing {} occupants", released.len());
            }
            let people_data = self.get_data_container_mut::<PeopleData>();
            for person_id in released {
                people_data.agent_mut(person_id).quarantined = false;
            }
            return;
        }

        // Occupants whose infection ended leave immediately.
        let occupants: Vec<PersonId> = self
            .get_data_container_mut::<QuarantineData>()
            .occupants
            .iter()
            .copied()
            .collect();
        let stale: Vec<PersonId> = {
            let people_data = self.get_data_container_mut::<PeopleData>();
            occupants
                .into_iter()
                .filter(|person_id| people_data.agent(*person_id).status != HealthStatus::Infected)
                .collect()
        };
        for person_id in stale {
            let quarantine_data = self.get_data_container_mut::<QuarantineData>();
            quarantine_data.occupants.remove(&person_id);
            quarantine_data.targets.remove(&person_id);
            self.get_data_container_mut::<PeopleData>()
                .agent_mut(person_id)
                .quarantined = false;
            debug!("agent {person_id} released from quarantine");
        }

        // Admissions in id order while slots remain. Slots freed above are
        // reusable right away.
        let candidates: Vec<PersonId> = self
            .get_data_container_mut::<PeopleData>()
            .with_status(HealthStatus::Infected)
            .filter(|agent| !agent.quarantined)
            .map(|agent| agent.id)
            .collect();
        let spot_area = params.quarantine_zone.shrunk(SPOT_INSET);
        for person_id in candidates {
            if self.zone_occupancy() >= params.quarantine_capacity {
                break;
            }
            let spot = Vec2::new(
                self.sample_range(spot_area.x..=spot_area.right()),
                self.sample_range(spot_area.y..=spot_area.bottom()),
            );
            let quarantine_data = self.get_data_container_mut::<QuarantineData>();
            quarantine_data.occupants.insert(person_id);
            quarantine_data.targets.insert(person_id, spot);
            self.get_data_container_mut::<PeopleData>()
                .agent_mut(person_id)
                .quarantined = true;
            debug!("agent {person_id} admitted to quarantine");
        }
    }

    fn zone_occupancy(&self) -> usize {
        match self.get_data_container::<QuarantineData>() {
            None => 0,
            Some(quarantine_data) => quarantine_data.occupants.len(),
        }
    }
}
