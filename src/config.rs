use crate::context::Context;
use crate::new_trait::New;
use log::debug;

/// Bounds the adjustment commands hold the infection and recovery
/// multipliers to.
pub const MULTIPLIER_MIN: f64 = 0.1;
pub const MULTIPLIER_MAX: f64 = 2.0;
/// The vaccination multiplier alone may drop all the way to zero, which
/// turns waves into no-ops.
pub const VACCINATION_MULTIPLIER_MIN: f64 = 0.0;

/// Knobs that move while a run is in progress. Unlike the agent world these
/// survive a reset, so an operator's tuning carries over to the next run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    pub infection_multiplier: f64,
    pub recovery_multiplier: f64,
    pub vaccination_multiplier: f64,
    pub quarantine_enabled: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            infection_multiplier: 1.0,
            recovery_multiplier: 1.0,
            vaccination_multiplier: 1.0,
            quarantine_enabled: true,
        }
    }
}

pub(crate) struct ConfigData {
    pub(crate) config: RuntimeConfig,
}

impl New for ConfigData {
    const new: &'static dyn Fn() -> Self = &|| ConfigData {
        config: RuntimeConfig::default(),
    };
}

pub trait ContextConfigExt {
    /// Gets a copy of the current runtime configuration.
    fn config(&self) -> RuntimeConfig;
    fn adjust_infection_multiplier(&mut self, delta: f64);
    fn adjust_recovery_multiplier(&mut self, delta: f64);
    fn adjust_vaccination_multiplier(&mut self, delta: f64);
    /// Flips the quarantine flag and returns the new value.
    fn toggle_quarantine(&mut self) -> bool;
}

impl ContextConfigExt for Context {
    fn config(&self) -> RuntimeConfig {
        match self.get_data_container::<ConfigData>() {
            None => RuntimeConfig::default(),
            Some(config_data) => config_data.config,
        }
    }

    fn adjust_infection_multiplier(&mut self, delta: f64) {
        let config = &mut self.get_data_container_mut::<ConfigData>().config;
        config.infection_multiplier =
            (config.infection_multiplier + delta).clamp(MULTIPLIER_MIN, MULTIPLIER_MAX);
        debug!("infection multiplier set to {}", config.infection_multiplier);
    }

    fn adjust_recovery_multiplier(&mut self, delta: f64) {
        let config = &mut self.get_data_container_mut::<ConfigData>().config;
        config.recovery_multiplier =
            (config.recovery_multiplier + delta).clamp(MULTIPLIER_MIN, MULTIPLIER_MAX);
        debug!("recovery multiplier set to {}", config.recovery_multiplier);
    }

    fn adjust_vaccination_multiplier(&mut self, delta: f64) {
        let config = &mut self.get_data_container_mut::<ConfigData>().config;
        config.vaccination_multiplier = (config.vaccination_multiplier + delta)
            .clamp(VACCINATION_MULTIPLIER_MIN, MULTIPLIER_MAX);
        debug!(
            "vaccination multiplier set to {}",
            config.vaccination_multiplier
        );
    }

    fn toggle_quarantine(&mut self) -> bool {
        let config = &mut self.get_data_container_mut::<ConfigData>().config;
        config.quarantine_enabled = !config.quarantine_enabled;
        debug!(
            "quarantine {}",
            if config.quarantine_enabled { "enabled" } else { "disabled" }
        );
        config.quarantine_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let context = Context::new();
        let config = context.config();
        assert_eq!(config.infection_multiplier, 1.0);
        assert_eq!(config.recovery_multiplier, 1.0);
        assert_eq!(config.vaccination_multiplier, 1.0);
        assert!(config.quarantine_enabled);
    }

    #[test]
    fn multipliers_clamp_at_both_ends() {
        let mut context = Context::new();
        context.adjust_infection_multiplier(100.0);
        assert_eq!(context.config().infection_multiplier, MULTIPLIER_MAX);
        context.adjust_infection_multiplier(-100.0);
        assert_eq!(context.config().infection_multiplier, MULTIPLIER_MIN);

        context.adjust_recovery_multiplier(-0.95);
        assert_eq!(context.config().recovery_multiplier, MULTIPLIER_MIN);
        context.adjust_recovery_multiplier(0.4);
        assert_eq!(context.config().recovery_multiplier, 0.5);
    }

    #[test]
    fn vaccination_multiplier_floors_at_zero() {
        let mut context = Context::new();
        context.adjust_vaccination_multiplier(-100.0);
        assert_eq!(context.config().vaccination_multiplier, 0.0);
        context.adjust_vaccination_multiplier(0.7);
        assert_eq!(context.config().vaccination_multiplier, 0.7);
    }

    #[test]
    fn clamped_values_hold_across_any_sequence() {
        let mut context = Context::new();
        for delta in [0.3, -5.0, 2.4, 2.4, -0.1, 9.9, -3.3] {
            context.adjust_infection_multiplier(delta);
            let value = context.config().infection_multiplier;
            assert!((MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&value));
        }
    }

    #[test]
    fn double_toggle_restores_the_flag() {
        let mut context = Context::new();
        let initial = context.config().quarantine_enabled;
        assert_eq!(context.toggle_quarantine(), !initial);
        assert_eq!(context.toggle_quarantine(), initial);
    }
}
