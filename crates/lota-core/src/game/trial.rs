use crate::game::outcome::{Milestone, MilestoneKind, TrialOutcome};
use crate::model::card::Card;
use crate::model::draw::DrawOrder;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialPhase {
    AwaitingPick,
    AwaitingLine,
    AwaitingLota,
    Done,
}

impl TrialPhase {
    pub const fn next(self) -> TrialPhase {
        match self {
            TrialPhase::AwaitingPick => TrialPhase::AwaitingLine,
            TrialPhase::AwaitingLine => TrialPhase::AwaitingLota,
            TrialPhase::AwaitingLota | TrialPhase::Done => TrialPhase::Done,
        }
    }

    /// The threshold checked while in this phase.
    pub const fn awaiting(self) -> Option<MilestoneKind> {
        match self {
            TrialPhase::AwaitingPick => Some(MilestoneKind::Pick),
            TrialPhase::AwaitingLine => Some(MilestoneKind::Line),
            TrialPhase::AwaitingLota => Some(MilestoneKind::Lota),
            TrialPhase::Done => None,
        }
    }
}

/// One playthrough: a draw order and the cards it is played against.
#[derive(Debug, Clone)]
pub struct Trial {
    draw_order: DrawOrder,
    cards: Vec<Card>,
    phase: TrialPhase,
    outcome: TrialOutcome,
    turns_played: u32,
    played: bool,
}

impl Trial {
    pub fn random<R: rand::Rng + ?Sized>(card_count: usize, rng: &mut R) -> Self {
        let draw_order = DrawOrder::shuffled(rng);
        let cards = (0..card_count).map(|_| Card::random(rng)).collect();
        Self::with_parts(draw_order, cards)
    }

    pub fn with_seed(card_count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random(card_count, &mut rng)
    }

    pub fn with_parts(draw_order: DrawOrder, cards: Vec<Card>) -> Self {
        Self {
            draw_order,
            cards,
            phase: TrialPhase::AwaitingPick,
            outcome: TrialOutcome::default(),
            turns_played: 0,
            played: false,
        }
    }

    /// Draws numbers until Lota fires or the order runs out.
    ///
    /// Each turn only the predicate of the current phase is evaluated, so a
    /// turn is credited to at most one milestone. Playing twice is a no-op.
    pub fn play(&mut self) -> &TrialOutcome {
        if self.played {
            return &self.outcome;
        }
        self.played = true;

        for (index, &number) in self.draw_order.numbers().iter().enumerate() {
            let Some(kind) = self.phase.awaiting() else {
                break;
            };
            let turn = index as u32 + 1;
            self.turns_played = turn;

            for card in &mut self.cards {
                card.mark(number);
            }

            let winners = self.cards.iter().filter(|card| kind.is_reached(card)).count();
            if winners > 0 {
                self.outcome.record(
                    kind,
                    Milestone {
                        turn,
                        winners: winners as u32,
                    },
                );
                self.phase = self.phase.next();
            }
        }

        &self.outcome
    }

    pub fn outcome(&self) -> &TrialOutcome {
        &self.outcome
    }

    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn draw_order(&self) -> &DrawOrder {
        &self.draw_order
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    pub fn is_played(&self) -> bool {
        self.played
    }
}
