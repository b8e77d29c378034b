//! Dimension tally scoring.
//!
//! Pure, stateless transformation from an answer sheet to an MBTI-style
//! classification: an eight-letter tally, four trait-pair percentage splits
//! and a four-letter type code. Used for instant feedback while the
//! authoritative server-computed result is in flight (or unavailable).
//!
//! The output carries no timestamp: scoring the same sheet twice yields
//! bit-identical results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quiz::answers::AnswerSheet;

/// A single-letter trait tag attached to a quiz option.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Dimension {
    E,
    I,
    S,
    N,
    T,
    F,
    J,
    P,
}

impl Dimension {
    /// Parse a single-letter tag, case-insensitively. Unknown or multi-letter
    /// tags yield `None` so malformed provider data degrades to untagged
    /// options instead of failing the fetch.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let mut chars = tag.trim().chars();
        let letter = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match letter.to_ascii_uppercase() {
            'E' => Some(Dimension::E),
            'I' => Some(Dimension::I),
            'S' => Some(Dimension::S),
            'N' => Some(Dimension::N),
            'T' => Some(Dimension::T),
            'F' => Some(Dimension::F),
            'J' => Some(Dimension::J),
            'P' => Some(Dimension::P),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Dimension::E => 'E',
            Dimension::I => 'I',
            Dimension::S => 'S',
            Dimension::N => 'N',
            Dimension::T => 'T',
            Dimension::F => 'F',
            Dimension::J => 'J',
            Dimension::P => 'P',
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One of the four opposing-letter dichotomies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TraitPair {
    Ei,
    Sn,
    Tf,
    Jp,
}

impl TraitPair {
    pub const ALL: [TraitPair; 4] = [TraitPair::Ei, TraitPair::Sn, TraitPair::Tf, TraitPair::Jp];

    /// The canonically first letter of the pair (wins ties).
    pub fn first(self) -> Dimension {
        match self {
            TraitPair::Ei => Dimension::E,
            TraitPair::Sn => Dimension::S,
            TraitPair::Tf => Dimension::T,
            TraitPair::Jp => Dimension::J,
        }
    }

    pub fn second(self) -> Dimension {
        match self {
            TraitPair::Ei => Dimension::I,
            TraitPair::Sn => Dimension::N,
            TraitPair::Tf => Dimension::F,
            TraitPair::Jp => Dimension::P,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TraitPair::Ei => "E/I",
            TraitPair::Sn => "S/N",
            TraitPair::Tf => "T/F",
            TraitPair::Jp => "J/P",
        }
    }
}

/// Accumulated weight per dimension letter across all answered questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionTally {
    totals: BTreeMap<Dimension, f64>,
}

impl DimensionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to `dimension`'s running total.
    pub fn add(&mut self, dimension: Dimension, weight: f64) {
        *self.totals.entry(dimension).or_insert(0.0) += weight;
    }

    /// Total for one letter; zero when the letter never occurred.
    pub fn get(&self, dimension: Dimension) -> f64 {
        self.totals.get(&dimension).copied().unwrap_or(0.0)
    }

    /// Sum across all eight letters.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }
}

/// Derived percentages and counts for one opposing pair.
///
/// Invariant: `first_pct + second_pct == 100` exactly. The second side's
/// percentage is the remainder of the first's rounded value, never an
/// independently rounded figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitPairResult {
    pub pair: TraitPair,
    /// Letter awarded to this pair in the type code.
    pub winner: Dimension,
    pub first_pct: u32,
    pub second_pct: u32,
    pub first_count: f64,
    pub second_count: f64,
}

impl TraitPairResult {
    /// Derive a pair result from raw counts.
    ///
    /// Equal counts (including `(0, 0)`) award the pair's canonically first
    /// letter and a 50/50 split. This tie-break direction is intentional;
    /// confirm with stakeholders before changing it.
    pub fn from_counts(pair: TraitPair, first_count: f64, second_count: f64) -> Self {
        let sum = first_count + second_count;
        let (first_pct, winner) = if sum <= 0.0 {
            (50, pair.first())
        } else {
            let pct = ((first_count / sum) * 100.0).round().clamp(0.0, 100.0) as u32;
            let winner = if first_count >= second_count {
                pair.first()
            } else {
                pair.second()
            };
            (pct, winner)
        };
        Self {
            pair,
            winner,
            first_pct,
            second_pct: 100 - first_pct,
            first_count,
            second_count,
        }
    }
}

/// Full scoring output: tally, per-pair splits and the four-letter code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAnalysis {
    /// Four-letter code, one winner per pair in E/I, S/N, T/F, J/P order.
    pub code: String,
    pub tally: DimensionTally,
    pub pairs: Vec<TraitPairResult>,
}

/// Build the eight-letter tally from an answer sheet.
///
/// Records without a dimension tag contribute nothing.
pub fn tally(answers: &AnswerSheet) -> DimensionTally {
    let mut tally = DimensionTally::new();
    for (_, record) in answers.iter() {
        if let Some(dimension) = record.dimension {
            tally.add(dimension, record.weight);
        }
    }
    tally
}

/// Score an answer sheet into a [`TypeAnalysis`].
///
/// Deterministic and side-effect free; safe to call on a partial sheet for
/// a live preview. A sheet with no tagged answers yields all-zero tallies
/// and 50/50 splits for every pair.
pub fn score(answers: &AnswerSheet) -> TypeAnalysis {
    let tally = tally(answers);
    let pairs: Vec<TraitPairResult> = TraitPair::ALL
        .iter()
        .map(|&pair| {
            TraitPairResult::from_counts(pair, tally.get(pair.first()), tally.get(pair.second()))
        })
        .collect();
    let code = pairs.iter().map(|p| p.winner.letter()).collect();
    TypeAnalysis { code, tally, pairs }
}
