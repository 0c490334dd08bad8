use crate::context::Context;
use crate::error::EpisimError;
use crate::geometry::Rect;
use crate::new_trait::New;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Fixed parameters of a run, loaded once before the first frame. Knobs
/// meant to move while the simulation runs live in
/// [`crate::config::RuntimeConfig`] instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    /// Number of agents created at seeding.
    pub population: usize,
    /// How many of those start out infected.
    pub initial_infected: usize,
    pub world_width: f64,
    pub world_height: f64,
    /// Margin kept free of spawns along every world edge.
    pub spawn_inset: f64,
    /// Distance at or under which a contact counts.
    pub infection_radius: f64,
    /// Per-frame transmission probability before any scaling.
    pub base_infection_prob: f64,
    /// Frames an infection runs before its outcome is resolved.
    pub recovery_threshold: u32,
    /// Probability the outcome is recovery rather than death.
    pub base_recovery_prob: f64,
    /// Fraction of the susceptible pool a vaccination wave targets.
    pub vaccination_coverage: f64,
    /// Probability a targeted agent actually becomes immune.
    pub vaccination_success_prob: f64,
    /// Distance a free agent covers per frame.
    pub movement_speed: f64,
    /// Neighbors within this distance are grouping candidates.
    pub grouping_radius: f64,
    /// Per-frame chance a free agent starts drifting toward a neighbor.
    pub grouping_prob: f64,
    /// Frames a grouping bias lasts once triggered.
    pub grouping_frames: u32,
    /// Per-frame chance a free agent picks a fresh heading.
    pub heading_shuffle_prob: f64,
    /// Per-frame chance a settled quarantined agent picks a fresh heading.
    pub quarantine_shuffle_prob: f64,
    pub quarantine_zone: Rect,
    pub quarantine_capacity: usize,
    /// Snapshots retained in the statistics history.
    pub history_capacity: usize,
    /// Seed for the kernel's random number generator.
    pub seed: u64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            population: 200,
            initial_infected: 5,
            world_width: 1200.0,
            world_height: 450.0,
            spawn_inset: 50.0,
            infection_radius: 15.0,
            base_infection_prob: 0.02,
            recovery_threshold: 300,
            base_recovery_prob: 0.7,
            vaccination_coverage: 0.3,
            vaccination_success_prob: 0.9,
            movement_speed: 2.0,
            grouping_radius: 50.0,
            grouping_prob: 0.01,
            grouping_frames: 30,
            heading_shuffle_prob: 0.02,
            quarantine_shuffle_prob: 0.05,
            quarantine_zone: Rect::new(950.0, 50.0, 200.0, 200.0),
            quarantine_capacity: 50,
            history_capacity: 500,
            seed: 42,
        }
    }
}

impl Params {
    /// Reads parameters from a JSON file. Fields the file omits keep their
    /// defaults; unknown fields are rejected.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Params, EpisimError> {
        let file = File::open(path.as_ref())?;
        let params: Params = serde_json::from_reader(BufReader::new(file))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), EpisimError> {
        if self.population == 0 {
            return Err(EpisimError::Validation("population must be positive".to_string()));
        }
        if self.initial_infected > self.population {
            return Err(EpisimError::Validation(
                "initial_infected cannot exceed population".to_string(),
            ));
        }
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err(EpisimError::Validation(
                "world dimensions must be positive".to_string(),
            ));
        }
        if self.spawn_inset < 0.0
            || 2.0 * self.spawn_inset >= self.world_width
            || 2.0 * self.spawn_inset >= self.world_height
        {
            return Err(EpisimError::Validation(
                "spawn_inset leaves no room to place agents".to_string(),
            ));
        }
        for (name, value) in [
            ("base_infection_prob", self.base_infection_prob),
            ("base_recovery_prob", self.base_recovery_prob),
            ("vaccination_coverage", self.vaccination_coverage),
            ("vaccination_success_prob", self.vaccination_success_prob),
            ("grouping_prob", self.grouping_prob),
            ("heading_shuffle_prob", self.heading_shuffle_prob),
            ("quarantine_shuffle_prob", self.quarantine_shuffle_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EpisimError::Validation(format!("{name} must lie in [0, 1]")));
            }
        }
        if self.infection_radius < 0.0 || self.movement_speed < 0.0 || self.grouping_radius < 0.0 {
            return Err(EpisimError::Validation(
                "distances and speeds must be non-negative".to_string(),
            ));
        }
        if self.recovery_threshold == 0 {
            return Err(EpisimError::Validation(
                "recovery_threshold must be positive".to_string(),
            ));
        }
        if self.grouping_frames == 0 {
            return Err(EpisimError::Validation(
                "grouping_frames must be positive".to_string(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(EpisimError::Validation(
                "history_capacity must be positive".to_string(),
            ));
        }
        let world = self.world_bounds();
        let zone = &self.quarantine_zone;
        if zone.width < 0.0
            || zone.height < 0.0
            || zone.x < world.x
            || zone.y < world.y
            || zone.right() > world.right()
            || zone.bottom() > world.bottom()
        {
            return Err(EpisimError::Validation(
                "quarantine_zone must lie inside the world".to_string(),
            ));
        }
        Ok(())
    }

    pub fn world_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.world_width, self.world_height)
    }
}

pub(crate) struct ParamsData {
    pub(crate) params: Params,
}

impl New for ParamsData {
    const new: &'static dyn Fn() -> Self = &|| ParamsData {
        params: Params::default(),
    };
}

pub trait ContextParamsExt {
    /// Gets a copy of the active parameters. Defaults apply until
    /// [`crate::clock::ContextClockExt::initialize`] installs a set.
    fn params(&self) -> Params;
    fn set_params(&mut self, params: Params);
}

impl ContextParamsExt for Context {
    fn params(&self) -> Params {
        match self.get_data_container::<ParamsData>() {
            None => Params::default(),
            Some(params_data) => params_data.params.clone(),
        }
    }

    fn set_params(&mut self, params: Params) {
        self.get_data_container_mut::<ParamsData>().params = params;
    }
}
