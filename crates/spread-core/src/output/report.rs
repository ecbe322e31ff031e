//! Run Reporting
//!
//! Every step feeds the run statistics; only every Nth step (and time zero)
//! reaches the snapshot log.

use spread_events::RunSummary;

use crate::config::OutputConfig;
use crate::output::logger::SnapshotLogger;
use crate::output::stats::RunStats;
use crate::population::Population;

pub struct RunReporter {
    logger: SnapshotLogger,
    stats: RunStats,
    interval: u64,
    include_activations: bool,
}

impl RunReporter {
    pub fn new(logger: SnapshotLogger, seed: u64, output: &OutputConfig) -> Self {
        Self {
            logger,
            stats: RunStats::new(seed),
            interval: output.snapshot_interval,
            include_activations: output.include_activations,
        }
    }

    fn should_log(&self, population: &Population) -> bool {
        self.interval <= 1 || population.now().step() % self.interval == 0
    }

    /// Record the current step, logging it when it falls on the interval
    pub fn observe(&mut self, population: &Population) -> std::io::Result<()> {
        // Statistics always see activations, whatever the log keeps
        let mut snapshot = population.snapshot(true);
        self.stats.record(&snapshot);

        if self.should_log(population) {
            if !self.include_activations {
                for agent in &mut snapshot.agents {
                    agent.activations.clear();
                }
            }
            self.logger.log(&snapshot)?;
        }
        Ok(())
    }

    pub fn snapshot_count(&self) -> u64 {
        self.logger.snapshot_count()
    }

    /// Flush the log and return the run summary
    pub fn finish(mut self) -> std::io::Result<RunSummary> {
        self.logger.flush()?;
        Ok(self.stats.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::registry::{BehaviourRegistry, BeliefRegistry};
    use crate::systems::step::SimSettings;
    use spread_events::SimTime;

    fn walkers(count: usize) -> Population {
        let mut behaviours = BehaviourRegistry::new();
        let walk = behaviours.register("walk");
        let mut beliefs = BeliefRegistry::new();
        let green = beliefs.register("green");
        beliefs
            .get_mut(green)
            .unwrap()
            .set_performance_relationship(walk, 1.0);

        let mut population = Population::new(beliefs, behaviours, SimSettings::default());
        for i in 0..count {
            let id = population.add_agent(format!("agent{}", i));
            let mut agent = population.agent_mut(id).unwrap();
            agent.set_delta(green, 1.0);
            agent.add_known_behaviour(walk);
            agent.set_activation(SimTime::ZERO, green, 0.5).unwrap();
        }
        population.prime();
        population
    }

    #[test]
    fn test_interval_thins_log_but_not_stats() {
        let mut population = walkers(3);
        let output = OutputConfig {
            snapshot_interval: 10,
            include_activations: false,
            ..OutputConfig::default()
        };
        let mut reporter = RunReporter::new(SnapshotLogger::null(), 7, &output);

        reporter.observe(&population).unwrap();
        population.run(25, |p| reporter.observe(p)).unwrap();

        // t0, t10, t20
        assert_eq!(reporter.snapshot_count(), 3);

        let summary = reporter.finish().unwrap();
        assert_eq!(summary.seed, 7);
        assert_eq!(summary.steps, 25);
        assert_eq!(summary.agent_count, 3);
        assert_eq!(summary.action_totals.get("walk"), Some(&(3 * 26)));
        assert!((summary.mean_activations["green"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_interval_of_one_logs_every_step() {
        let mut population = walkers(1);
        let mut reporter = RunReporter::new(SnapshotLogger::null(), 1, &OutputConfig::default());

        reporter.observe(&population).unwrap();
        population.run(4, |p| reporter.observe(p)).unwrap();

        assert_eq!(reporter.snapshot_count(), 5);
        let summary = reporter.finish().unwrap();
        assert_eq!(summary.action_totals.get("walk"), Some(&5));
    }
}
