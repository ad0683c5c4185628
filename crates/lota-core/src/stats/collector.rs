use crate::game::outcome::{MilestoneKind, TrialOutcome};
use serde::Serialize;

/// Reduction of one threshold over every trial of a configuration.
///
/// Turn statistics only cover trials where the threshold fired; they are
/// `None` when it never did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneStats {
    pub mean_turn: Option<f64>,
    pub p90_turn: Option<u32>,
    pub mean_winners: Option<f64>,
    pub resolved: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationStats {
    pub card_count: usize,
    pub trials: usize,
    pub pick: MilestoneStats,
    pub line: MilestoneStats,
    pub lota: MilestoneStats,
    /// Share of all trials where more than one card completed a line on the
    /// Line turn.
    pub line_collision_rate: f64,
    pub lota_collision_rate: f64,
}

impl ConfigurationStats {
    pub fn milestone(&self, kind: MilestoneKind) -> &MilestoneStats {
        match kind {
            MilestoneKind::Pick => &self.pick,
            MilestoneKind::Line => &self.line,
            MilestoneKind::Lota => &self.lota,
        }
    }
}

/// Accumulates trial outcomes for a single card count.
#[derive(Debug, Clone)]
pub struct OutcomeCollector {
    card_count: usize,
    trials: usize,
    turns: [Vec<u32>; 3],
    winners: [Vec<u32>; 3],
}

impl OutcomeCollector {
    pub fn new(card_count: usize) -> Self {
        Self {
            card_count,
            trials: 0,
            turns: Default::default(),
            winners: Default::default(),
        }
    }

    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        for kind in MilestoneKind::ORDERED {
            if let Some(milestone) = outcome.get(kind) {
                self.turns[kind.index()].push(milestone.turn);
                self.winners[kind.index()].push(milestone.winners);
            }
        }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn finalize(self) -> ConfigurationStats {
        let summarize = |kind: MilestoneKind| {
            let turns = &self.turns[kind.index()];
            MilestoneStats {
                mean_turn: mean(turns),
                p90_turn: percentile_90(turns),
                mean_winners: mean(&self.winners[kind.index()]),
                resolved: turns.len(),
            }
        };

        ConfigurationStats {
            card_count: self.card_count,
            trials: self.trials,
            pick: summarize(MilestoneKind::Pick),
            line: summarize(MilestoneKind::Line),
            lota: summarize(MilestoneKind::Lota),
            line_collision_rate: self.collision_rate(MilestoneKind::Line),
            lota_collision_rate: self.collision_rate(MilestoneKind::Lota),
        }
    }

    fn collision_rate(&self, kind: MilestoneKind) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        let collisions = self.winners[kind.index()]
            .iter()
            .filter(|&&winners| winners > 1)
            .count();
        collisions as f64 / self.trials as f64
    }
}

pub fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: u64 = values.iter().map(|&v| u64::from(v)).sum();
    Some(total as f64 / values.len() as f64)
}

/// Value at sorted index `floor(0.9 * len)`, without interpolation.
pub fn percentile_90(values: &[u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let index = (sorted.len() * 9 / 10).min(sorted.len() - 1);
    Some(sorted[index])
}
