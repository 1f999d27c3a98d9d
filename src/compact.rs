//! Turns a full table back into compact notation.

use crate::cards::Rank;
use crate::hands::{HandClass, HandLabel};
use crate::range::{Action, HandRangeTable, RangeSummary};

impl HandRangeTable {
    /// Shortest run-based notation for every non-fold action.
    ///
    /// The token sets emitted for different actions are disjoint, so expanding
    /// the result reproduces this table under any [`crate::range::ActionOrder`].
    pub fn summarize(&self) -> RangeSummary {
        let mut summary = RangeSummary::new();
        for action in Action::ALL.into_iter().filter(|a| *a != Action::Fold) {
            for token in pair_tokens(self, action) {
                summary.push(action, token);
            }
            for class in [HandClass::Suited, HandClass::Offsuit] {
                for high in Rank::ORDER {
                    for token in kicker_tokens(self, action, high, class) {
                        summary.push(action, token);
                    }
                }
            }
        }
        summary
    }
}

/// Maximal runs of consecutive positions in `0..13` for which `hit` holds.
fn runs(from: usize, hit: impl Fn(usize) -> bool) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = None;
    for pos in from..=13 {
        match (start, pos < 13 && hit(pos)) {
            (None, true) => start = Some(pos),
            (Some(s), false) => {
                out.push((s, pos - 1));
                start = None;
            }
            _ => {}
        }
    }
    out
}

fn pair_tokens(table: &HandRangeTable, action: Action) -> Vec<String> {
    let pair_at = |pos: usize| Rank::from_position(pos).map(HandLabel::pair);
    runs(0, |pos| pair_at(pos).is_some_and(|hand| table.get(hand) == action))
        .into_iter()
        .filter_map(|(top, bottom)| {
            let (top, bottom) = (pair_at(top)?, pair_at(bottom)?);
            Some(match (top == bottom, top.high() == Rank::Ace) {
                (true, _) => top.to_string(),
                (false, true) => format!("{bottom}+"),
                (false, false) => format!("{top}-{bottom}"),
            })
        })
        .collect()
}

fn kicker_tokens(
    table: &HandRangeTable,
    action: Action,
    high: Rank,
    class: HandClass,
) -> Vec<String> {
    let first = high.position() + 1;
    let combo_at = |pos: usize| {
        Rank::from_position(pos).and_then(|low| HandLabel::new(high, low, class).ok())
    };
    runs(first, |pos| {
        combo_at(pos).is_some_and(|hand| table.get(hand) == action)
    })
    .into_iter()
    .filter_map(|(top, bottom)| {
        let (top_pos, top, bottom) = (top, combo_at(top)?, combo_at(bottom)?);
        Some(match (top == bottom, top_pos == first) {
            (true, _) => top.to_string(),
            (false, true) => format!("{bottom}+"),
            (false, false) => format!("{top}-{bottom}"),
        })
    })
    .collect()
}
