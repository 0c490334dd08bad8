/*!

Per-frame motion. Free agents wander with a jittered heading, occasionally
shuffle direction, and sometimes drift toward a nearby agent for a while.
Quarantined agents instead steer toward their assigned spot in the zone and
then mill around it at a crawl. Everyone reflects off the world edges.

Neighbor positions come from a census taken at the start of the pass, so the
outcome does not depend on the order agents are stepped in.

*/

use crate::context::Context;
use crate::geometry::{Rect, Vec2};
use crate::new_trait::New;
use crate::params::{ContextParamsExt, Params};
use crate::people::{Agent, PeopleData};
use crate::quarantine::QuarantineData;
use crate::random::ContextRandomExt;
use crate::PersonId;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::UnitCircle;
use rustc_hash::{FxHashMap, FxHashSet};

/// Distance at which a quarantined agent counts as having reached its spot.
const ARRIVAL_RADIUS: f64 = 2.0;
/// Speed factor while steering toward the assigned spot.
const STEERING_FACTOR: f64 = 0.5;
/// Speed factor once settled inside the zone.
const SETTLED_FACTOR: f64 = 0.3;
/// Half-width of the uniform per-frame heading jitter, in radians.
const JITTER_ANGLE: f64 = 0.25;

/// A temporary pull toward another agent. The pull starts at half strength
/// and decays linearly to zero over the bias's lifetime.
#[derive(Copy, Clone, Debug)]
pub(crate) struct GroupingBias {
    pub(crate) target: PersonId,
    pub(crate) frames_left: u32,
}

pub(crate) struct MovementData {
    pub(crate) biases: FxHashMap<PersonId, GroupingBias>,
}

impl New for MovementData {
    const new: &'static dyn Fn() -> Self = &|| MovementData {
        biases: FxHashMap::default(),
    };
}

fn random_heading(rng: &mut StdRng) -> Vec2 {
    let [x, y]: [f64; 2] = UnitCircle.sample(rng);
    Vec2::new(x, y)
}

/// Bounces the agent off the world edges and clamps it back inside.
fn reflect(agent: &mut Agent, bounds: &Rect) {
    if agent.position.x < bounds.x || agent.position.x > bounds.right() {
        agent.velocity.x = -agent.velocity.x;
    }
    if agent.position.y < bounds.y || agent.position.y > bounds.bottom() {
        agent.velocity.y = -agent.velocity.y;
    }
    agent.position.x = agent.position.x.clamp(bounds.x, bounds.right());
    agent.position.y = agent.position.y.clamp(bounds.y, bounds.bottom());
}

fn pick_grouping_target(
    agent: &Agent,
    census: &[(PersonId, Vec2)],
    params: &Params,
    rng: &mut StdRng,
) -> Option<GroupingBias> {
    let radius_squared = params.grouping_radius * params.grouping_radius;
    let nearby: Vec<PersonId> = census
        .iter()
        .filter(|(person_id, position)| {
            *person_id != agent.id && agent.position.distance_squared(*position) <= radius_squared
        })
        .map(|(person_id, _)| *person_id)
        .collect();
    if nearby.is_empty() {
        return None;
    }
    let target = nearby[rng.random_range(0..nearby.len())];
    Some(GroupingBias {
        target,
        frames_left: params.grouping_frames,
    })
}

/// One frame of free movement: grouping, heading shuffle, jitter, advance,
/// reflection.
fn step_free(
    agent: &mut Agent,
    bias: &mut Option<GroupingBias>,
    census: &[(PersonId, Vec2)],
    params: &Params,
    rng: &mut StdRng,
) {
    if bias.is_none() && params.grouping_prob > 0.0 && rng.random_bool(params.grouping_prob) {
        *bias = pick_grouping_target(agent, census, params, rng);
    }

    if let Some(active) = bias.as_mut() {
        let target_position = census
            .iter()
            .find(|(person_id, _)| *person_id == active.target)
            .map(|(_, position)| *position);
        let mut keep = false;
        if let Some(target) = target_position {
            let weight = 0.5 * f64::from(active.frames_left) / f64::from(params.grouping_frames);
            let pull = (target - agent.position).normalized();
            agent.velocity = (agent.velocity * (1.0 - weight) + pull * weight).normalized();
            active.frames_left -= 1;
            keep = active.frames_left > 0;
        }
        // The bias also ends early if its target died this frame.
        if !keep {
            *bias = None;
        }
    }

    if params.heading_shuffle_prob > 0.0 && rng.random_bool(params.heading_shuffle_prob) {
        agent.velocity = random_heading(rng);
    }

    agent.velocity = agent.velocity.rotated(rng.random_range(-JITTER_ANGLE..JITTER_ANGLE));
    agent.position += agent.velocity * params.movement_speed;
    reflect(agent, &params.world_bounds());
}

/// One frame of quarantined movement: steer toward the assigned spot at half
/// speed, then wander around it at a crawl. The wander heading survives from
/// the agent's free life and only reshuffles occasionally.
fn step_quarantined(agent: &mut Agent, spot: Vec2, params: &Params, rng: &mut StdRng) {
    let offset = spot - agent.position;
    if offset.length() > ARRIVAL_RADIUS {
        agent.position += offset.normalized() * (params.movement_speed * STEERING_FACTOR);
    } else {
        if params.quarantine_shuffle_prob > 0.0 && rng.random_bool(params.quarantine_shuffle_prob)
        {
            agent.velocity = random_heading(rng);
        }
        agent.position += agent.velocity * (params.movement_speed * SETTLED_FACTOR);
    }
    reflect(agent, &params.world_bounds());
}

pub trait ContextMovementExt {
    /// Advances every living agent one frame.
    fn advance_agents(&mut self);
}

impl ContextMovementExt for Context {
    fn advance_agents(&mut self) {
        let params = self.params();
        let spots: FxHashMap<PersonId, Vec2> = self
            .get_data_container_mut::<QuarantineData>()
            .targets
            .clone();
        let census: Vec<(PersonId, Vec2)> = self
            .get_data_container_mut::<PeopleData>()
            .alive()
            .map(|agent| (agent.id, agent.position))
            .collect();

        // A holder that died since the last pass never re-enters the
        // census; prune its leftover bias.
        let living: FxHashSet<PersonId> = census.iter().map(|(person_id, _)| *person_id).collect();
        self.get_data_container_mut::<MovementData>()
            .biases
            .retain(|holder, _| living.contains(holder));

        for (person_id, _) in &census {
            let person_id = *person_id;
            let mut agent = *self.get_data_container_mut::<PeopleData>().agent(person_id);
            let mut bias = self
                .get_data_container_mut::<MovementData>()
                .biases
                .remove(&person_id);
            self.sample(|rng| match spots.get(&person_id) {
                Some(spot) if agent.quarantined => {
                    step_quarantined(&mut agent, *spot, &params, rng);
                }
                _ => step_free(&mut agent, &mut bias, &census, &params, rng),
            });
            if let Some(active) = bias {
                self.get_data_container_mut::<MovementData>()
                    .biases
                    .insert(person_id, active);
            }
            *self
                .get_data_container_mut::<PeopleData>()
                .agent_mut(person_id) = agent;
        }
    }
}
