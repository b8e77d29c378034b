//! Accumulated answers for an in-progress session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::quiz::question::{AnswerOption, Question};
use crate::scoring::Dimension;

/// One recorded selection. Question and option text are denormalized so the
/// record stays displayable after the question set is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_text: String,
    pub option_text: String,
    pub dimension: Option<Dimension>,
    pub weight: f64,
    /// Mirrors `weight`; kept separate for result payload compatibility.
    pub score: f64,
}

impl AnswerRecord {
    /// Build a record from the selected option of a question.
    pub fn from_selection(question: &Question, option: &AnswerOption) -> Self {
        let weight = option.weight_or_default();
        Self {
            question_text: question.text.clone(),
            option_text: option.text.clone(),
            dimension: option.dimension,
            weight,
            score: weight,
        }
    }
}

/// Map from zero-based question index to the answer recorded for it.
///
/// At most one record exists per index: selecting a different option for an
/// already-answered question replaces the prior record. Records are only
/// removed by abandoning the whole sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    records: BTreeMap<usize, AnswerRecord>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record at `index`. Returns true when a prior
    /// record was replaced.
    pub fn record(&mut self, index: usize, record: AnswerRecord) -> bool {
        self.records.insert(index, record).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&AnswerRecord> {
        self.records.get(&index)
    }

    /// Count of distinct answered question indices.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest answered index, for resuming a partial session.
    pub fn furthest_index(&self) -> Option<usize> {
        self.records.keys().next_back().copied()
    }

    /// Completion percentage over `total` questions. Overwriting an existing
    /// answer leaves this unchanged; only net-new answers move it.
    pub fn progress_pct(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (self.len() as f64 / total as f64 * 100.0).min(100.0)
    }

    pub fn is_complete(&self, total: usize) -> bool {
        total > 0 && self.len() >= total
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &AnswerRecord)> {
        self.records.iter().map(|(&index, record)| (index, record))
    }

    /// Records in question order, for submission payloads.
    pub fn ordered_records(&self) -> Vec<AnswerRecord> {
        self.records.values().cloned().collect()
    }
}
