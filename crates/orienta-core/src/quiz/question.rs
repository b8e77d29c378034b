//! Question and option data for one assessment.
//!
//! A [`QuestionSet`] is the validated, ordered question sequence the session
//! runs over. Options are normalized and sorted at construction so that
//! downstream code never re-checks provider data.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProviderError;
use crate::scoring::Dimension;

/// Identifier of an assessment (e.g. "mbti", "big-five").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(String);

impl TestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A selectable option of one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    /// Which trait letter this option votes for, if any.
    #[serde(default)]
    pub dimension: Option<Dimension>,
    /// Contribution toward the dimension's tally. Missing weights count as 1.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Explicit display position; primary sort key.
    #[serde(default)]
    pub order: Option<u32>,
}

impl AnswerOption {
    /// Effective weight: 1.0 when absent or non-finite.
    pub fn weight_or_default(&self) -> f64 {
        match self.weight {
            Some(w) if w.is_finite() => w,
            _ => 1.0,
        }
    }
}

/// Parse a leading parenthesised letter such as "(A) Strongly agree".
fn leading_letter(text: &str) -> Option<char> {
    let mut chars = text.trim_start().chars();
    if chars.next()? != '(' {
        return None;
    }
    let letter = chars.next()?;
    if !letter.is_ascii_alphabetic() || chars.next()? != ')' {
        return None;
    }
    Some(letter.to_ascii_uppercase())
}

/// Sort options by explicit display order; where orders collide or are
/// absent, fall back to the leading parenthesised letter. The sort is
/// stable, so otherwise-equal options keep their provider order.
pub(crate) fn sort_options(options: &mut [AnswerOption]) {
    options.sort_by(|a, b| match (a.order, b.order) {
        (Some(x), Some(y)) if x != y => x.cmp(&y),
        _ => match (leading_letter(&a.text), leading_letter(&b.text)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => std::cmp::Ordering::Equal,
        },
    });
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    /// Optional section grouping (e.g. "Part II").
    #[serde(default)]
    pub section: Option<String>,
    pub options: Vec<AnswerOption>,
}

/// Validated, ordered question sequence for one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    test_id: TestId,
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Build a set from provider data. Rejects an empty sequence and sorts
    /// every question's options.
    pub fn new(test_id: TestId, mut questions: Vec<Question>) -> Result<Self, ProviderError> {
        if questions.is_empty() {
            return Err(ProviderError::EmptyQuestionSet { test_id });
        }
        for question in &mut questions {
            sort_options(&mut question.options);
        }
        Ok(Self { test_id, questions })
    }

    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false: construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, order: Option<u32>) -> AnswerOption {
        AnswerOption {
            text: text.into(),
            dimension: None,
            weight: None,
            order,
        }
    }

    #[test]
    fn explicit_order_wins() {
        let mut options = vec![
            option("(B) second", Some(2)),
            option("(A) first", Some(1)),
            option("(C) third", Some(3)),
        ];
        sort_options(&mut options);
        let texts: Vec<_> = options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["(A) first", "(B) second", "(C) third"]);
    }

    #[test]
    fn letter_fallback_when_orders_absent() {
        let mut options = vec![
            option("(C) gamma", None),
            option("(A) alpha", None),
            option("(B) beta", None),
        ];
        sort_options(&mut options);
        let texts: Vec<_> = options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["(A) alpha", "(B) beta", "(C) gamma"]);
    }

    #[test]
    fn letter_fallback_when_orders_collide() {
        let mut options = vec![option("(B) beta", Some(1)), option("(A) alpha", Some(1))];
        sort_options(&mut options);
        assert_eq!(options[0].text, "(A) alpha");
    }

    #[test]
    fn unparsable_texts_keep_provider_order() {
        let mut options = vec![option("maybe", None), option("yes", None), option("no", None)];
        sort_options(&mut options);
        let texts: Vec<_> = options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["maybe", "yes", "no"]);
    }

    #[test]
    fn leading_letter_parsing() {
        assert_eq!(leading_letter("(A) yes"), Some('A'));
        assert_eq!(leading_letter("  (b) lower"), Some('B'));
        assert_eq!(leading_letter("A) no paren"), None);
        assert_eq!(leading_letter("(1) digit"), None);
        assert_eq!(leading_letter(""), None);
    }

    #[test]
    fn weight_defaults_to_one() {
        let mut opt = option("x", None);
        assert_eq!(opt.weight_or_default(), 1.0);
        opt.weight = Some(2.5);
        assert_eq!(opt.weight_or_default(), 2.5);
        opt.weight = Some(f64::NAN);
        assert_eq!(opt.weight_or_default(), 1.0);
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = QuestionSet::new(TestId::from("mbti"), vec![]).unwrap_err();
        assert!(matches!(err, ProviderError::EmptyQuestionSet { .. }));
    }
}
