use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::cards::{Card, deal_hole_cards};
use crate::hands::HandLabel;
use crate::range::{Action, ActionOrder, HandRangeTable};
use crate::scenario::Scenario;

/// Configuration for a practice drill.
#[derive(Debug, Clone)]
pub struct DrillConfig {
    pub hands: u32,
    pub seed: Option<u64>,
    pub scenario: Scenario,
    pub order: ActionOrder,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            hands: 10,
            seed: None,
            scenario: Scenario::default(),
            order: ActionOrder::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DrillStatus {
    AwaitingInput,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grade {
    pub hand: HandLabel,
    pub chosen: Action,
    pub expected: Action,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DrillSummary {
    pub hands_played: u32,
    pub correct: u32,
    pub mistakes: Vec<Grade>,
}

impl DrillSummary {
    pub fn accuracy(&self) -> f32 {
        if self.hands_played == 0 {
            0.0
        } else {
            self.correct as f32 / self.hands_played as f32
        }
    }

    fn record(&mut self, grade: Grade) {
        self.hands_played += 1;
        if grade.correct {
            self.correct += 1;
        } else {
            self.mistakes.push(grade);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillState {
    pub drill_id: Uuid,
    pub hand_index: u32,
    pub scenario: Scenario,
    pub hero_cards: Vec<String>,
    pub hand: Option<HandLabel>,
    pub options: Vec<Action>,
    pub status: DrillStatus,
    pub last_grade: Option<Grade>,
    pub summary: DrillSummary,
}

pub struct Drill {
    id: Uuid,
    rng: StdRng,
    config: DrillConfig,
    table: HandRangeTable,
    options: Vec<Action>,
    current: Option<Deal>,
    last_grade: Option<Grade>,
    summary: DrillSummary,
}

#[derive(Debug, Clone, Copy)]
struct Deal {
    cards: [Card; 2],
    hand: HandLabel,
}

impl Deal {
    fn new(rng: &mut StdRng) -> Self {
        let cards = deal_hole_cards(rng);
        Self {
            cards,
            hand: HandLabel::from_cards(cards[0], cards[1]),
        }
    }
}

impl Drill {
    pub fn new(config: DrillConfig, table: HandRangeTable) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let options = config
            .order
            .actions()
            .iter()
            .copied()
            .filter(|action| *action == Action::Fold || table.count(*action) > 0)
            .collect();
        let current = (config.hands > 0).then(|| Deal::new(&mut rng));
        let id = Uuid::new_v4();
        info!(drill = %id, scenario = %config.scenario, hands = config.hands, "drill started");

        Self {
            id,
            rng,
            config,
            table,
            options,
            current,
            last_grade: None,
            summary: DrillSummary::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn table(&self) -> &HandRangeTable {
        &self.table
    }

    /// The action the table prescribes for the hand currently dealt.
    pub fn expected(&self) -> Option<Action> {
        self.current.map(|deal| self.table.get(deal.hand))
    }

    pub fn snapshot(&self) -> DrillState {
        let (status, hand_index) = match self.current {
            Some(_) => (DrillStatus::AwaitingInput, self.summary.hands_played + 1),
            None => (DrillStatus::Completed, self.summary.hands_played),
        };
        DrillState {
            drill_id: self.id,
            hand_index,
            scenario: self.config.scenario,
            hero_cards: self
                .current
                .map(|deal| deal.cards.iter().map(Card::to_string).collect())
                .unwrap_or_default(),
            hand: self.current.map(|deal| deal.hand),
            options: match self.current {
                Some(_) => self.options.clone(),
                None => Vec::new(),
            },
            status,
            last_grade: self.last_grade,
            summary: self.summary.clone(),
        }
    }

    pub fn offers(&self, action: Action) -> bool {
        self.current.is_some() && self.options.contains(&action)
    }

    /// Grades `action` for the current hand and deals the next one.
    /// Returns `None` once the drill is complete or when `action` was not offered.
    pub fn answer(&mut self, action: Action) -> Option<Grade> {
        let deal = self.current?;
        if !self.options.contains(&action) {
            return None;
        }
        let expected = self.table.get(deal.hand);
        let grade = Grade {
            hand: deal.hand,
            chosen: action,
            expected,
            correct: action == expected,
        };
        self.summary.record(grade);
        self.last_grade = Some(grade);

        if self.summary.hands_played < self.config.hands {
            self.current = Some(Deal::new(&mut self.rng));
        } else {
            self.current = None;
            info!(
                drill = %self.id,
                correct = self.summary.correct,
                hands = self.summary.hands_played,
                "drill completed"
            );
        }
        Some(grade)
    }
}
