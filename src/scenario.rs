use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::range::{
    ActionOrder, HandRangeTable, RangeSummary, RangeTokenParseError, expand_with_order,
};

const BUILTIN_CHARTS: &str = include_str!("../charts/default.json");

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Utg,
    Mp,
    Co,
    #[default]
    Btn,
    Sb,
    Bb,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    HeadsUp,
    #[default]
    SixMax,
    FullRing,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    #[default]
    Unopened,
    Limp,
    Raise,
    ThreeBet,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Utg => "utg",
            Position::Mp => "mp",
            Position::Co => "co",
            Position::Btn => "btn",
            Position::Sb => "sb",
            Position::Bb => "bb",
        }
    }
}

impl TableType {
    pub fn as_str(self) -> &'static str {
        match self {
            TableType::HeadsUp => "heads_up",
            TableType::SixMax => "six_max",
            TableType::FullRing => "full_ring",
        }
    }
}

impl Facing {
    pub fn as_str(self) -> &'static str {
        match self {
            Facing::Unopened => "unopened",
            Facing::Limp => "limp",
            Facing::Raise => "raise",
            Facing::ThreeBet => "three_bet",
        }
    }
}

/// The spot a range is requested for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Scenario {
    pub position: Position,
    pub stack_depth_bb: u32,
    pub table: TableType,
    pub facing: Facing,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            position: Position::Btn,
            stack_depth_bb: 100,
            table: TableType::SixMax,
            facing: Facing::Unopened,
        }
    }
}

impl Scenario {
    pub fn key(&self) -> String {
        format!(
            "{}/{}/{}bb/{}",
            self.table.as_str(),
            self.position.as_str(),
            self.stack_depth_bb,
            self.facing.as_str()
        )
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// What a decision service hands back for a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionResponse {
    RangeSummary(RangeSummary),
    FullRange(HandRangeTable),
}

impl DecisionResponse {
    pub fn into_table(self, order: &ActionOrder) -> Result<HandRangeTable, RangeTokenParseError> {
        match self {
            DecisionResponse::RangeSummary(summary) => expand_with_order(&summary, order),
            DecisionResponse::FullRange(table) => Ok(table),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no range available for scenario {0}")]
    UnknownScenario(String),
    #[error(transparent)]
    InvalidRange(#[from] RangeTokenParseError),
    #[error("failed to read chart book {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed chart book: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything able to answer "what is the range for this spot?".
pub trait RangeSource: Send + Sync {
    fn lookup(&self, scenario: &Scenario) -> Result<DecisionResponse, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub scenario: Scenario,
    pub response: DecisionResponse,
}

/// A fixed set of charts loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBook {
    pub charts: Vec<ChartEntry>,
}

impl ChartBook {
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn builtin() -> Result<Self, SourceError> {
        Self::from_json(BUILTIN_CHARTS)
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.charts.iter().map(|entry| &entry.scenario)
    }
}

impl RangeSource for ChartBook {
    fn lookup(&self, scenario: &Scenario) -> Result<DecisionResponse, SourceError> {
        self.charts
            .iter()
            .find(|entry| entry.scenario == *scenario)
            .map(|entry| entry.response.clone())
            .ok_or_else(|| SourceError::UnknownScenario(scenario.key()))
    }
}

pub fn resolve(
    source: &dyn RangeSource,
    scenario: &Scenario,
    order: &ActionOrder,
) -> Result<HandRangeTable, SourceError> {
    let table = source.lookup(scenario)?.into_table(order)?;
    debug!(scenario = %scenario, "resolved range table");
    Ok(table)
}
