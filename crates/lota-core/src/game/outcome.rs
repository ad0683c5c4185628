use crate::model::card::Card;
use serde::Serialize;

/// The three win thresholds, in the order they are awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Pick,
    Line,
    Lota,
}

impl MilestoneKind {
    pub const ORDERED: [MilestoneKind; 3] =
        [MilestoneKind::Pick, MilestoneKind::Line, MilestoneKind::Lota];

    pub const fn index(self) -> usize {
        match self {
            MilestoneKind::Pick => 0,
            MilestoneKind::Line => 1,
            MilestoneKind::Lota => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MilestoneKind::Pick => "Pick",
            MilestoneKind::Line => "Line",
            MilestoneKind::Lota => "Lota",
        }
    }

    pub fn is_reached(self, card: &Card) -> bool {
        match self {
            MilestoneKind::Pick => card.has_pick(),
            MilestoneKind::Line => card.has_line(),
            MilestoneKind::Lota => card.has_lota(),
        }
    }
}

/// The turn a threshold first fired and how many cards met it on that turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub turn: u32,
    pub winners: u32,
}

/// Per-trial record. `None` means the draw order ran out first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrialOutcome {
    pub pick: Option<Milestone>,
    pub line: Option<Milestone>,
    pub lota: Option<Milestone>,
}

impl TrialOutcome {
    pub fn get(&self, kind: MilestoneKind) -> Option<Milestone> {
        match kind {
            MilestoneKind::Pick => self.pick,
            MilestoneKind::Line => self.line,
            MilestoneKind::Lota => self.lota,
        }
    }

    pub(crate) fn record(&mut self, kind: MilestoneKind, milestone: Milestone) {
        let slot = match kind {
            MilestoneKind::Pick => &mut self.pick,
            MilestoneKind::Line => &mut self.line,
            MilestoneKind::Lota => &mut self.lota,
        };
        *slot = Some(milestone);
    }

    pub fn is_complete(&self) -> bool {
        self.lota.is_some()
    }
}
