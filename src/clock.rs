/*!

The simulation clock. `tick` drains the command queue first, then, unless
paused, runs the frame pipeline in a fixed order: movement, proximity,
infection, recovery, quarantine, statistics. The frame counter advances
after the statistics pass, so a snapshot's frame number names the frame it
describes.

*/

use crate::commands::{self, Command};
use crate::config::{ConfigData, ContextConfigExt};
use crate::context::Context;
use crate::error::EpisimError;
use crate::infection::ContextInfectionExt;
use crate::movement::{ContextMovementExt, MovementData};
use crate::new_trait::New;
use crate::params::{ContextParamsExt, Params};
use crate::people::ContextPeopleExt;
use crate::proximity::{ContactData, ContextProximityExt};
use crate::quarantine::{ContextQuarantineExt, QuarantineData};
use crate::random::ContextRandomExt;
use crate::recovery::ContextRecoveryExt;
use crate::stats::{ContextStatsExt, StatsData};
use crate::vaccination::ContextVaccinationExt;
use log::{debug, info, trace};

/// The clock either advances the world or holds it still.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RunState {
    Running,
    Paused,
}

pub(crate) struct ClockData {
    pub(crate) frame: u64,
    pub(crate) state: RunState,
}

impl New for ClockData {
    const new: &'static dyn Fn() -> Self = &|| ClockData {
        frame: 0,
        state: RunState::Running,
    };
}

pub trait ContextClockExt {
    /// Validates and installs `params`, seeds the generator, and builds the
    /// starting world, including the seeding vaccination wave.
    fn initialize(&mut self, params: Params) -> Result<(), EpisimError>;
    /// Runs one frame. Pending commands always apply; the pipeline runs only
    /// while the clock is running.
    fn tick(&mut self);
    fn run_frames(&mut self, count: u64);
    fn frame(&self) -> u64;
    fn run_state(&self) -> RunState;
}

impl ContextClockExt for Context {
    fn initialize(&mut self, params: Params) -> Result<(), EpisimError> {
        params.validate()?;
        info!(
            "initializing simulation: population {}, seed {}",
            params.population, params.seed
        );
        self.init_random(params.seed);
        self.set_params(params);
        reset_world(self);
        Ok(())
    }

    fn tick(&mut self) {
        for command in commands::take_pending(self) {
            apply_command(self, command);
        }
        if self.run_state() == RunState::Paused {
            return;
        }

        self.advance_agents();
        self.update_contacts();
        let infections = self.resolve_infections();
        let outcome = self.resolve_recoveries();
        self.sync_quarantine();
        self.record_frame(
            infections.len(),
            outcome.recovered.len(),
            outcome.removed.len(),
        );

        self.get_data_container_mut::<ClockData>().frame += 1;
    }

    fn run_frames(&mut self, count: u64) {
        for _ in 0..count {
            self.tick();
        }
    }

    fn frame(&self) -> u64 {
        match self.get_data_container::<ClockData>() {
            None => 0,
            Some(clock_data) => clock_data.frame,
        }
    }

    fn run_state(&self) -> RunState {
        match self.get_data_container::<ClockData>() {
            None => RunState::Running,
            Some(clock_data) => clock_data.state,
        }
    }
}

fn apply_command(context: &mut Context, command: Command) {
    trace!("applying command {command:?}");
    match command {
        Command::Pause => context.get_data_container_mut::<ClockData>().state = RunState::Paused,
        Command::Resume => context.get_data_container_mut::<ClockData>().state = RunState::Running,
        Command::Reset => reset_world(context),
        Command::ToggleQuarantine => {
            context.toggle_quarantine();
        }
        Command::AdjustInfectionMultiplier(delta) => context.adjust_infection_multiplier(delta),
        Command::AdjustRecoveryMultiplier(delta) => context.adjust_recovery_multiplier(delta),
        Command::AdjustVaccinationMultiplier(delta) => {
            context.adjust_vaccination_multiplier(delta);
        }
        Command::TriggerVaccinationWave => {
            context.trigger_vaccination_wave();
        }
        Command::LoadScenario(scenario) => {
            info!("loading scenario {scenario:?}");
            context.get_data_container_mut::<ConfigData>().config = scenario.preset();
            reset_world(context);
        }
    }
}

/// Rebuilds the agent world from the active parameters and runs the seeding
/// vaccination wave. The runtime configuration and the generator's stream
/// position carry over.
fn reset_world(context: &mut Context) {
    debug!("resetting world");
    context.seed_population();
    context.get_data_container_mut::<ContactData>().records.clear();
    context.get_data_container_mut::<QuarantineData>().clear();
    context.get_data_container_mut::<MovementData>().biases.clear();
    context.get_data_container_mut::<StatsData>().clear();
    let clock_data = context.get_data_container_mut::<ClockData>();
    clock_data.frame = 0;
    clock_data.state = RunState::Running;
    let immunized = context.trigger_vaccination_wave();
    debug!("world reset, seeding wave immunized {}", immunized.len());
}
