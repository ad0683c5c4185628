mod collector;

pub use collector::{ConfigurationStats, MilestoneStats, OutcomeCollector, mean, percentile_90};

use crate::game::trial::Trial;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Instant;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Runs `trial_count` independent trials with `card_count` cards each.
pub fn run_configuration(
    card_count: usize,
    trial_count: usize,
) -> Result<ConfigurationStats, AggregateError> {
    let mut rng = SmallRng::from_entropy();
    run_configuration_with_rng(card_count, trial_count, &mut rng)
}

/// Same as [`run_configuration`] with the caller's random source.
pub fn run_configuration_with_rng<R: rand::Rng + ?Sized>(
    card_count: usize,
    trial_count: usize,
    rng: &mut R,
) -> Result<ConfigurationStats, AggregateError> {
    if card_count == 0 {
        return Err(AggregateError::InvalidArgument(
            "card count must be greater than zero",
        ));
    }
    if trial_count == 0 {
        return Err(AggregateError::InvalidArgument(
            "trial count must be greater than zero",
        ));
    }

    let start = Instant::now();
    let mut collector = OutcomeCollector::new(card_count);
    for _ in 0..trial_count {
        let mut trial = Trial::random(card_count, rng);
        collector.record(trial.play());
    }
    let stats = collector.finalize();

    event!(
        target: "lota_core::stats",
        Level::DEBUG,
        card_count = card_count as u64,
        trials = trial_count as u64,
        unresolved_lota = (trial_count - stats.lota.resolved) as u64,
        elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0
    );

    Ok(stats)
}
