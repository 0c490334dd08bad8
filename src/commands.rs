use crate::config::RuntimeConfig;
use crate::context::Context;
use crate::new_trait::New;
use std::collections::VecDeque;

/// External inputs to the kernel. Commands queue up between frames and are
/// consumed in submission order at the start of the next tick, so they never
/// observe or mutate a half-updated frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Pause,
    Resume,
    /// Rebuilds the agent world from the active parameters. The runtime
    /// configuration and the generator's stream position carry over.
    Reset,
    ToggleQuarantine,
    AdjustInfectionMultiplier(f64),
    AdjustRecoveryMultiplier(f64),
    AdjustVaccinationMultiplier(f64),
    TriggerVaccinationWave,
    LoadScenario(Scenario),
}

/// Canned configurations that make one epidemic outcome overwhelmingly
/// likely. Loading one overwrites the runtime configuration, then resets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Scenario {
    /// Fast spread, slow recovery, no vaccination, no quarantine.
    Extinction,
    /// Damped spread, quick recovery, boosted vaccination, quarantine on.
    Survival,
}

impl Scenario {
    pub(crate) fn preset(self) -> RuntimeConfig {
        match self {
            Scenario::Extinction => RuntimeConfig {
                infection_multiplier: 2.0,
                recovery_multiplier: 0.5,
                vaccination_multiplier: 0.0,
                quarantine_enabled: false,
            },
            Scenario::Survival => RuntimeConfig {
                infection_multiplier: 0.8,
                recovery_multiplier: 1.5,
                vaccination_multiplier: 1.5,
                quarantine_enabled: true,
            },
        }
    }
}

pub(crate) struct CommandQueue {
    pub(crate) pending: VecDeque<Command>,
}

impl New for CommandQueue {
    const new: &'static dyn Fn() -> Self = &|| CommandQueue {
        pending: VecDeque::new(),
    };
}

/// Drains the queue in submission order.
// This is a crate-private free function so that the drain isn't part of the public API.
pub(crate) fn take_pending(context: &mut Context) -> Vec<Command> {
    context
        .get_data_container_mut::<CommandQueue>()
        .pending
        .drain(..)
        .collect()
}

pub trait ContextCommandExt {
    /// Enqueues a command. It takes effect at the start of the next tick,
    /// even while the clock is paused.
    fn submit_command(&mut self, command: Command);
}

impl ContextCommandExt for Context {
    fn submit_command(&mut self, command: Command) {
        self.get_data_container_mut::<CommandQueue>()
            .pending
            .push_back(command);
    }
}
