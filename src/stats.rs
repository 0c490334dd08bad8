use crate::clock::ContextClockExt;
use crate::context::Context;
use crate::new_trait::New;
use crate::params::ContextParamsExt;
use crate::people::ContextPeopleExt;
use serde::Serialize;
use std::collections::VecDeque;

/// One frame's tally, appended to the bounded history.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StatisticsSnapshot {
    pub frame: u64,
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
    pub immune: usize,
    pub removed: usize,
    /// Transmissions resolved this frame.
    pub new_infections: usize,
    /// Infections that ended in recovery this frame.
    pub new_recoveries: usize,
    /// Infections that ended in death this frame.
    pub new_removals: usize,
}

/// Whole-run tallies. Unlike the history these never evict, but they do
/// clear on reset.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RunTotals {
    pub infections: usize,
    pub recoveries: usize,
    pub deaths: usize,
}

pub(crate) struct StatsData {
    pub(crate) history: VecDeque<StatisticsSnapshot>,
    pub(crate) totals: RunTotals,
}

impl New for StatsData {
    const new: &'static dyn Fn() -> Self = &|| StatsData {
        history: VecDeque::new(),
        totals: RunTotals::default(),
    };
}

impl StatsData {
    pub(crate) fn clear(&mut self) {
        self.history.clear();
        self.totals = RunTotals::default();
    }
}

pub trait ContextStatsExt {
    /// Appends this frame's tally to the history, evicting the oldest entry
    /// once the configured capacity is reached.
    fn record_frame(
        &mut self,
        new_infections: usize,
        new_recoveries: usize,
        new_removals: usize,
    ) -> StatisticsSnapshot;
    fn history_len(&self) -> usize;
    fn latest_snapshot(&self) -> Option<StatisticsSnapshot>;
    fn run_totals(&self) -> RunTotals;
}

impl ContextStatsExt for Context {
    fn record_frame(
        &mut self,
        new_infections: usize,
        new_recoveries: usize,
        new_removals: usize,
    ) -> StatisticsSnapshot {
        let counts = self.state_counts();
        let snapshot = StatisticsSnapshot {
            frame: self.frame(),
            susceptible: counts.susceptible,
            infected: counts.infected,
            recovered: counts.recovered,
            immune: counts.immune,
            removed: counts.removed,
            new_infections,
            new_recoveries,
            new_removals,
        };
        let capacity = self.params().history_capacity;
        let stats_data = self.get_data_container_mut::<StatsData>();
        stats_data.totals.infections += new_infections;
        stats_data.totals.recoveries += new_recoveries;
        stats_data.totals.deaths += new_removals;
        stats_data.history.push_back(snapshot);
        while stats_data.history.len() > capacity {
            stats_data.history.pop_front();
        }
        snapshot
    }

    fn history_len(&self) -> usize {
        match self.get_data_container::<StatsData>() {
            None => 0,
            Some(stats_data) => stats_data.history.len(),
        }
    }

    fn latest_snapshot(&self) -> Option<StatisticsSnapshot> {
        self.get_data_container::<StatsData>()
            .and_then(|stats_data| stats_data.history.back().copied())
    }

    fn run_totals(&self) -> RunTotals {
        match self.get_data_container::<StatsData>() {
            None => RunTotals::default(),
            Some(stats_data) => stats_data.totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use crate::people::{ContextPeopleExt, HealthStatus};
    use crate::random::ContextRandomExt;

    #[test]
    fn empty_context_reports_nothing() {
        let context = Context::new();
        assert_eq!(context.history_len(), 0);
        assert!(context.latest_snapshot().is_none());
        assert_eq!(context.run_totals(), RunTotals::default());
    }

    #[test]
    fn recording_captures_the_census_and_the_deltas() {
        let mut context = Context::new();
        context.init_random(71);
        context.set_params(Params {
            population: 12,
            initial_infected: 2,
            ..Params::default()
        });
        context.seed_population();

        let snapshot = context.record_frame(3, 1, 2);
        assert_eq!(snapshot.frame, 0);
        assert_eq!(snapshot.susceptible, 10);
        assert_eq!(snapshot.infected, 2);
        assert_eq!(snapshot.new_infections, 3);
        assert_eq!(snapshot.new_recoveries, 1);
        assert_eq!(snapshot.new_removals, 2);
        assert_eq!(context.latest_snapshot(), Some(snapshot));
    }

    #[test]
    fn totals_accumulate_across_frames() {
        let mut context = Context::new();
        context.set_params(Params::default());
        context.record_frame(2, 0, 1);
        context.record_frame(0, 3, 0);
        context.record_frame(1, 1, 1);

        let totals = context.run_totals();
        assert_eq!(totals.infections, 3);
        assert_eq!(totals.recoveries, 4);
        assert_eq!(totals.deaths, 2);
    }

    #[test]
    fn history_evicts_oldest_at_capacity() {
        let mut context = Context::new();
        context.set_params(Params {
            history_capacity: 4,
            ..Params::default()
        });
        for _ in 0..10 {
            context.record_frame(0, 0, 0);
        }
        assert_eq!(context.history_len(), 4);
    }

    #[test]
    fn census_counts_removed_agents() {
        let mut context = Context::new();
        context.init_random(72);
        context.set_params(Params {
            population: 5,
            initial_infected: 0,
            ..Params::default()
        });
        context.seed_population();
        context
            .get_data_container_mut::<crate::people::PeopleData>()
            .agent_mut(crate::PersonId(4))
            .status = HealthStatus::Removed;

        let snapshot = context.record_frame(0, 0, 1);
        assert_eq!(snapshot.removed, 1);
        assert_eq!(snapshot.susceptible, 4);
        assert_eq!(context.state_counts().total(), 5);
    }
}
