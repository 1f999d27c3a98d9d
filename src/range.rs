//! Range notation and its expansion into a per-hand action table.
//!
//! A [`RangeSummary`] maps each action to a list of notation tokens such as
//! `"JJ+"`, `"ATs+"` or `"T9s-T7s"`. [`expand`] starts every hand at
//! [`Action::Fold`] and then applies the actions in [`ActionOrder`], so a hand
//! named under several actions ends up with the one applied last.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cards::Rank;
use crate::hands::{HAND_COUNT, HandClass, HandLabel, InvalidHandLabelError, enumerate_hands};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "fold")]
    Fold,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "raise")]
    Raise,
    #[serde(rename = "3-bet")]
    ThreeBet,
    #[serde(rename = "all-in")]
    AllIn,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Fold,
        Action::Call,
        Action::Raise,
        Action::ThreeBet,
        Action::AllIn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Call => "call",
            Action::Raise => "raise",
            Action::ThreeBet => "3-bet",
            Action::AllIn => "all-in",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fold" => Ok(Action::Fold),
            "call" => Ok(Action::Call),
            "raise" => Ok(Action::Raise),
            "3-bet" | "3bet" | "three_bet" => Ok(Action::ThreeBet),
            "all-in" | "allin" | "all_in" => Ok(Action::AllIn),
            _ => Err(format!("Invalid action '{s}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionOrderError {
    #[error("action '{0}' appears more than once in the processing order")]
    Duplicate(Action),
    #[error("action '{0}' is missing from the processing order")]
    Missing(Action),
}

/// Order in which actions are applied during expansion; later entries win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Action>", into = "Vec<Action>")]
pub struct ActionOrder(Vec<Action>);

impl ActionOrder {
    /// `fold` first so explicit fold tokens never hide a playing action,
    /// then `raise` before `call`, with the all-in-leaning actions last.
    pub const DEFAULT: [Action; 5] = [
        Action::Fold,
        Action::Raise,
        Action::Call,
        Action::ThreeBet,
        Action::AllIn,
    ];

    pub fn new(order: Vec<Action>) -> Result<Self, ActionOrderError> {
        for (idx, action) in order.iter().enumerate() {
            if order[..idx].contains(action) {
                return Err(ActionOrderError::Duplicate(*action));
            }
        }
        if let Some(missing) = Action::ALL.iter().find(|a| !order.contains(a)) {
            return Err(ActionOrderError::Missing(*missing));
        }
        Ok(Self(order))
    }

    pub fn actions(&self) -> &[Action] {
        &self.0
    }
}

impl Default for ActionOrder {
    fn default() -> Self {
        Self(Self::DEFAULT.to_vec())
    }
}

impl TryFrom<Vec<Action>> for ActionOrder {
    type Error = ActionOrderError;

    fn try_from(order: Vec<Action>) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<ActionOrder> for Vec<Action> {
    fn from(order: ActionOrder) -> Self {
        order.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid range token '{token}'{}: {reason}", action_suffix(.action))]
pub struct RangeTokenParseError {
    pub token: String,
    pub action: Option<Action>,
    pub reason: String,
}

fn action_suffix(action: &Option<Action>) -> String {
    action
        .map(|action| format!(" for action '{action}'"))
        .unwrap_or_default()
}

impl RangeTokenParseError {
    fn new(token: &str, reason: impl Into<String>) -> Self {
        Self {
            token: token.to_string(),
            action: None,
            reason: reason.into(),
        }
    }

    pub fn for_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}

/// One parsed notation token. Spans are stored normalised: `top` outranks `bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    /// `77`
    Pair(Rank),
    /// `TT+`
    PairPlus(Rank),
    /// `JJ-88`
    PairSpan { top: Rank, bottom: Rank },
    /// `AKs`, `KQo`
    Combo(HandLabel),
    /// `ATs+`: kickers from `low` up to just below `high`.
    KickerPlus {
        high: Rank,
        low: Rank,
        class: HandClass,
    },
    /// `T9s-T7s`
    KickerSpan {
        high: Rank,
        top: Rank,
        bottom: Rank,
        class: HandClass,
    },
}

impl RangeToken {
    pub fn parse(token: &str) -> Result<Self, RangeTokenParseError> {
        let text = token.trim();
        if text.is_empty() {
            return Err(RangeTokenParseError::new(token, "empty token"));
        }

        if let Some((left, right)) = text.split_once('-') {
            return parse_span(token, left.trim(), right.trim());
        }

        if let Some(base) = text.strip_suffix('+') {
            let hand = parse_hand(token, base.trim())?;
            // `AKs+` is legal and covers AKs alone.
            return Ok(match hand.class() {
                HandClass::Pair => RangeToken::PairPlus(hand.high()),
                class => RangeToken::KickerPlus {
                    high: hand.high(),
                    low: hand.low(),
                    class,
                },
            });
        }

        let hand = parse_hand(token, text)?;
        Ok(match hand.class() {
            HandClass::Pair => RangeToken::Pair(hand.high()),
            _ => RangeToken::Combo(hand),
        })
    }

    /// The labels this token denotes, strongest first. Never empty.
    pub fn hands(&self) -> Vec<HandLabel> {
        match *self {
            RangeToken::Pair(rank) => vec![HandLabel::pair(rank)],
            RangeToken::PairPlus(rank) => ranks_between(0, rank.position())
                .map(HandLabel::pair)
                .collect(),
            RangeToken::PairSpan { top, bottom } => {
                ranks_between(top.position(), bottom.position())
                    .map(HandLabel::pair)
                    .collect()
            }
            RangeToken::Combo(hand) => vec![hand],
            RangeToken::KickerPlus { high, low, class } => {
                kickers(high, high.position() + 1, low.position(), class)
            }
            RangeToken::KickerSpan {
                high,
                top,
                bottom,
                class,
            } => kickers(high, top.position(), bottom.position(), class),
        }
    }
}

impl FromStr for RangeToken {
    type Err = RangeTokenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeToken::parse(s)
    }
}

fn ranks_between(from: usize, to: usize) -> impl Iterator<Item = Rank> {
    (from..=to).filter_map(Rank::from_position)
}

fn kickers(high: Rank, from: usize, to: usize, class: HandClass) -> Vec<HandLabel> {
    ranks_between(from, to)
        .filter_map(|low| HandLabel::new(high, low, class).ok())
        .collect()
}

/// Tokens are lenient about case; labels are not, so normalise before parsing.
fn parse_hand(token: &str, text: &str) -> Result<HandLabel, RangeTokenParseError> {
    let canonical: String = text
        .chars()
        .enumerate()
        .map(|(idx, c)| {
            if idx < 2 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect();
    canonical
        .parse::<HandLabel>()
        .map_err(|err| RangeTokenParseError::new(token, err.reason))
}

fn parse_span(token: &str, left: &str, right: &str) -> Result<RangeToken, RangeTokenParseError> {
    if left.ends_with('+') || right.ends_with('+') || right.contains('-') {
        return Err(RangeTokenParseError::new(
            token,
            "a span cannot be combined with '+' or another '-'",
        ));
    }
    let (a, b) = (parse_hand(token, left)?, parse_hand(token, right)?);

    if a.class() != b.class() {
        return Err(RangeTokenParseError::new(
            token,
            format!("span endpoints {a} and {b} are different hand types"),
        ));
    }

    let (top, bottom) = if a.low().position() <= b.low().position() {
        (a, b)
    } else {
        (b, a)
    };

    if a.class() == HandClass::Pair {
        return Ok(RangeToken::PairSpan {
            top: top.high(),
            bottom: bottom.high(),
        });
    }

    if a.high() != b.high() {
        return Err(RangeTokenParseError::new(
            token,
            format!("span endpoints {a} and {b} must share the same high rank"),
        ));
    }

    Ok(RangeToken::KickerSpan {
        high: a.high(),
        top: top.low(),
        bottom: bottom.low(),
        class: a.class(),
    })
}

/// Raw per-action token lists as received from a decision service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeSummary(BTreeMap<Action, Vec<String>>);

impl RangeSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: Action, tokens: &[&str]) -> Self {
        self.0
            .entry(action)
            .or_default()
            .extend(tokens.iter().map(|t| t.to_string()));
        self
    }

    pub fn push(&mut self, action: Action, token: impl Into<String>) {
        self.0.entry(action).or_default().push(token.into());
    }

    /// Appends every token of a comma separated notation such as `"AA, KK, AQs+"`.
    pub fn push_notation(&mut self, action: Action, notation: &str) {
        for token in notation.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            self.push(action, token);
        }
    }

    pub fn tokens(&self, action: Action) -> &[String] {
        self.0.get(&action).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, &[String])> {
        self.0
            .iter()
            .map(|(action, tokens)| (*action, tokens.as_slice()))
    }
}

/// Total mapping from the 169 starting hands to an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandRangeTable {
    actions: [Action; HAND_COUNT],
}

impl HandRangeTable {
    pub fn all_fold() -> Self {
        Self {
            actions: [Action::Fold; HAND_COUNT],
        }
    }

    pub fn get(&self, hand: HandLabel) -> Action {
        self.actions[hand.index()]
    }

    pub fn lookup(&self, label: &str) -> Result<Action, InvalidHandLabelError> {
        label.parse::<HandLabel>().map(|hand| self.get(hand))
    }

    pub fn set(&mut self, hand: HandLabel, action: Action) {
        self.actions[hand.index()] = action;
    }

    /// Every hand with its action, in canonical enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (HandLabel, Action)> + '_ {
        enumerate_hands().map(|(hand, _)| (hand, self.get(hand)))
    }

    pub fn hands_for(&self, action: Action) -> Vec<HandLabel> {
        self.iter()
            .filter(|(_, a)| *a == action)
            .map(|(hand, _)| hand)
            .collect()
    }

    pub fn count(&self, action: Action) -> usize {
        self.actions.iter().filter(|a| **a == action).count()
    }

    /// Builds a table from a full `label -> action` map; absent labels fold.
    /// Keys must be canonical labels and each may appear only once.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, InvalidHandLabelError>
    where
        I: IntoIterator<Item = (S, Action)>,
        S: AsRef<str>,
    {
        let mut builder = TableBuilder::default();
        for (label, action) in entries {
            builder.insert(label.as_ref(), action)?;
        }
        Ok(builder.table)
    }
}

#[derive(Default)]
struct TableBuilder {
    table: HandRangeTable,
    seen: Vec<usize>,
}

impl TableBuilder {
    fn insert(&mut self, label: &str, action: Action) -> Result<(), InvalidHandLabelError> {
        let hand = label.parse::<HandLabel>()?;
        if self.seen.contains(&hand.index()) {
            return Err(InvalidHandLabelError {
                label: label.to_string(),
                reason: "hand listed more than once".to_string(),
            });
        }
        self.seen.push(hand.index());
        self.table.set(hand, action);
        Ok(())
    }
}

impl Default for HandRangeTable {
    fn default() -> Self {
        Self::all_fold()
    }
}

impl Serialize for HandRangeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(HAND_COUNT))?;
        for (hand, action) in self.iter() {
            map.serialize_entry(&hand, &action)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HandRangeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = HandRangeTable;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map from hand labels to actions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut builder = TableBuilder::default();
                while let Some((label, action)) = access.next_entry::<String, Action>()? {
                    builder.insert(&label, action).map_err(de::Error::custom)?;
                }
                Ok(builder.table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Expands a summary using [`ActionOrder::default`].
pub fn expand(summary: &RangeSummary) -> Result<HandRangeTable, RangeTokenParseError> {
    expand_with_order(summary, &ActionOrder::default())
}

/// Fails on the first malformed token in processing order. Every token is
/// parsed before the table is touched, so an error never leaves a partial table.
pub fn expand_with_order(
    summary: &RangeSummary,
    order: &ActionOrder,
) -> Result<HandRangeTable, RangeTokenParseError> {
    let mut parsed = Vec::new();
    for &action in order.actions() {
        for token in summary.tokens(action) {
            let range = RangeToken::parse(token).map_err(|err| {
                warn!(%action, token = %token, "rejecting range token");
                err.for_action(action)
            })?;
            parsed.push((action, range));
        }
    }

    let mut table = HandRangeTable::all_fold();
    for (action, range) in &parsed {
        for hand in range.hands() {
            table.set(hand, *action);
        }
    }
    debug!(tokens = parsed.len(), "expanded range summary");
    Ok(table)
}

/// Collects every malformed token in the summary without building a table.
pub fn validate(summary: &RangeSummary) -> Vec<RangeTokenParseError> {
    summary
        .iter()
        .flat_map(|(action, tokens)| {
            tokens
                .iter()
                .filter_map(move |token| RangeToken::parse(token).err().map(|e| e.for_action(action)))
        })
        .collect()
}
