//! The 169 canonical starting hands.
//!
//! Every label is built through [`HandLabel`]'s constructors, which only ever
//! produce the canonical form: pairs as `RR`, everything else high rank first
//! with an `s` or `o` suffix.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::cards::{Card, Rank};

pub const HAND_COUNT: usize = 169;
pub const TOTAL_COMBOS: u32 = 1326;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandClass {
    Pair,
    Suited,
    Offsuit,
}

impl HandClass {
    pub fn suffix(self) -> Option<char> {
        match self {
            HandClass::Pair => None,
            HandClass::Suited => Some('s'),
            HandClass::Offsuit => Some('o'),
        }
    }

    pub fn from_suffix(c: char) -> Option<HandClass> {
        match c {
            's' => Some(HandClass::Suited),
            'o' => Some(HandClass::Offsuit),
            _ => None,
        }
    }

    /// Concrete card combinations behind one label of this class.
    pub fn combos(self) -> u32 {
        match self {
            HandClass::Pair => 6,
            HandClass::Suited => 4,
            HandClass::Offsuit => 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hand label '{label}': {reason}")]
pub struct InvalidHandLabelError {
    pub label: String,
    pub reason: String,
}

impl InvalidHandLabelError {
    fn new(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct HandLabel {
    high: Rank,
    low: Rank,
    class: HandClass,
}

impl HandLabel {
    pub fn pair(rank: Rank) -> Self {
        Self {
            high: rank,
            low: rank,
            class: HandClass::Pair,
        }
    }

    /// Builds a label from ranks already in canonical order.
    pub fn new(high: Rank, low: Rank, class: HandClass) -> Result<Self, InvalidHandLabelError> {
        let attempted = || format!("{high}{low}{}", class.suffix().map(String::from).unwrap_or_default());
        match class {
            HandClass::Pair if high != low => Err(InvalidHandLabelError::new(
                attempted(),
                "a pair needs two identical ranks",
            )),
            HandClass::Pair => Ok(Self::pair(high)),
            _ if high == low => Err(InvalidHandLabelError::new(
                attempted(),
                "identical ranks cannot be suited or offsuit",
            )),
            _ if !high.outranks(low) => Err(InvalidHandLabelError::new(
                attempted(),
                "the higher rank must come first",
            )),
            _ => Ok(Self { high, low, class }),
        }
    }

    /// Normalises two dealt cards to their starting-hand class.
    pub fn from_cards(a: Card, b: Card) -> Self {
        if a.rank == b.rank {
            return Self::pair(a.rank);
        }
        let (high, low) = if a.rank.outranks(b.rank) {
            (a.rank, b.rank)
        } else {
            (b.rank, a.rank)
        };
        let class = if a.suit == b.suit {
            HandClass::Suited
        } else {
            HandClass::Offsuit
        };
        Self { high, low, class }
    }

    /// Inverse of [`HandLabel::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= HAND_COUNT {
            return None;
        }
        let (row, col) = (Rank::ORDER[index / 13], Rank::ORDER[index % 13]);
        Some(cell_label(row, col))
    }

    pub fn high(&self) -> Rank {
        self.high
    }

    pub fn low(&self) -> Rank {
        self.low
    }

    pub fn class(&self) -> HandClass {
        self.class
    }

    pub fn combos(&self) -> u32 {
        self.class.combos()
    }

    /// Row and column in the 13×13 chart; suited hands sit above the diagonal.
    pub fn grid_position(&self) -> (usize, usize) {
        let (high, low) = (self.high.position(), self.low.position());
        match self.class {
            HandClass::Pair | HandClass::Suited => (high, low),
            HandClass::Offsuit => (low, high),
        }
    }

    /// Position of this label in [`enumerate_hands`] order.
    pub fn index(&self) -> usize {
        let (row, col) = self.grid_position();
        row * 13 + col
    }
}

impl Display for HandLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.high, self.low)?;
        match self.class.suffix() {
            Some(suffix) => write!(f, "{suffix}"),
            None => Ok(()),
        }
    }
}

/// Accepts only the canonical spelling: uppercase ranks, lowercase suffix.
impl FromStr for HandLabel {
    type Err = InvalidHandLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        let rank_at = |i: usize| {
            Rank::from_char(chars[i])
                .filter(|rank| rank.short_label().starts_with(chars[i]))
                .ok_or_else(|| {
                    InvalidHandLabelError::new(s, format!("unknown rank '{}'", chars[i]))
                })
        };
        match chars.len() {
            2 => {
                let (first, second) = (rank_at(0)?, rank_at(1)?);
                if first != second {
                    return Err(InvalidHandLabelError::new(
                        s,
                        "non-pair labels need an 's' or 'o' suffix",
                    ));
                }
                Ok(Self::pair(first))
            }
            3 => {
                let (first, second) = (rank_at(0)?, rank_at(1)?);
                let class = HandClass::from_suffix(chars[2]).ok_or_else(|| {
                    InvalidHandLabelError::new(s, format!("unknown suffix '{}'", chars[2]))
                })?;
                HandLabel::new(first, second, class).map_err(|err| InvalidHandLabelError {
                    label: s.to_string(),
                    ..err
                })
            }
            _ => Err(InvalidHandLabelError::new(
                s,
                "expected two ranks and an optional suffix",
            )),
        }
    }
}

fn cell_label(row: Rank, col: Rank) -> HandLabel {
    match row.position().cmp(&col.position()) {
        std::cmp::Ordering::Less => HandLabel {
            high: row,
            low: col,
            class: HandClass::Suited,
        },
        std::cmp::Ordering::Greater => HandLabel {
            high: col,
            low: row,
            class: HandClass::Offsuit,
        },
        std::cmp::Ordering::Equal => HandLabel::pair(row),
    }
}

/// All 169 starting hands in canonical order, walking the rank grid row by row.
pub fn enumerate_hands() -> impl Iterator<Item = (HandLabel, HandClass)> + Clone {
    Rank::ORDER
        .into_iter()
        .cartesian_product(Rank::ORDER)
        .map(|(row, col)| {
            let label = cell_label(row, col);
            (label, label.class())
        })
}

pub fn classify(label: &str) -> Result<HandClass, InvalidHandLabelError> {
    label.parse::<HandLabel>().map(|hand| hand.class())
}
