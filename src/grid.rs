use serde::{Deserialize, Serialize};

use crate::hands::{HandClass, HandLabel, TOTAL_COMBOS};
use crate::range::{Action, HandRangeTable};

pub const GRID_SIZE: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub label: HandLabel,
    pub class: HandClass,
    pub action: Action,
}

/// The familiar 13×13 chart: pairs on the diagonal, suited hands above it,
/// offsuit hands below it, `A` in the first row and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeGrid {
    pub rows: Vec<Vec<GridCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionShare {
    pub action: Action,
    pub hands: usize,
    pub combos: u32,
    pub combo_share: f32,
}

impl RangeGrid {
    pub fn from_table(table: &HandRangeTable) -> Self {
        let rows = (0..GRID_SIZE)
            .map(|row| {
                (0..GRID_SIZE)
                    .filter_map(|col| HandLabel::from_index(row * GRID_SIZE + col))
                    .map(|label| GridCell {
                        label,
                        class: label.class(),
                        action: table.get(label),
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    pub fn locate(label: HandLabel) -> (usize, usize) {
        label.grid_position()
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flatten()
    }

    /// Hands and combos per action, in [`Action::ALL`] order; absent actions are skipped.
    pub fn breakdown(&self) -> Vec<ActionShare> {
        Action::ALL
            .into_iter()
            .filter_map(|action| {
                let (hands, combos) = self
                    .cells()
                    .filter(|cell| cell.action == action)
                    .fold((0, 0), |(hands, combos), cell| {
                        (hands + 1, combos + cell.class.combos())
                    });
                (hands > 0).then(|| ActionShare {
                    action,
                    hands,
                    combos,
                    combo_share: combos as f32 / TOTAL_COMBOS as f32,
                })
            })
            .collect()
    }
}
