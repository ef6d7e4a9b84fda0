mod recommendation;
mod risk;

pub use recommendation::*;
pub use risk::*;

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Question;

/// Rule mapping a selected option index to a point value for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// 0 points when the selected index matches the designated point-free
    /// index, 1 point otherwise. Covers both the "correct" and "reverse"
    /// orientations of binary instruments.
    Binary { expected_index: usize },
    /// Points equal the selected index (index 0 = 0 points).
    WeightedLinear { max_points: u32 },
    /// Points equal `(options - 1) - selected index`.
    WeightedReverseLinear { max_points: u32 },
}

#[derive(Debug, Clone)]
pub struct ScoredAnswer {
    pub question_id: Uuid,
    pub external_id: String,
    pub question_text: String,
    pub selected_index: usize,
    pub points: u32,
    pub flagged: bool,
}

#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    pub score: u32,
    pub answers: Vec<ScoredAnswer>,
    /// Texts of questions whose answer contributed risk points, in display order.
    pub flagged_behaviors: Vec<String>,
}

pub fn score_question(policy: ScoringPolicy, option_count: usize, selected_index: usize) -> u32 {
    match policy {
        ScoringPolicy::Binary { expected_index } => {
            if selected_index == expected_index {
                0
            } else {
                1
            }
        }
        ScoringPolicy::WeightedLinear { .. } => selected_index as u32,
        ScoringPolicy::WeightedReverseLinear { .. } => (option_count - 1 - selected_index) as u32,
    }
}

/// Score a full submission against the question set, in display order.
///
/// Answers are resolved by external id first, falling back to the internal id.
/// The first missing or out-of-range answer aborts the whole submission with an
/// error naming the offending question; no partial outcome is produced.
pub fn score_submission(
    questions: &[Question],
    answers: &HashMap<String, i32>,
) -> AppResult<ScoringOutcome> {
    let mut score = 0u32;
    let mut scored = Vec::with_capacity(questions.len());
    let mut flagged_behaviors = Vec::new();

    for question in questions {
        let options = question.options();

        let selected = answers
            .get(&question.external_id)
            .or_else(|| answers.get(&question.id.to_string()))
            .copied()
            .ok_or_else(|| AppError::MissingAnswer(question.external_id.clone()))?;

        if selected < 0 || selected as usize >= options.len() {
            return Err(AppError::InvalidAnswer(question.external_id.clone()));
        }
        let selected = selected as usize;

        let policy = question.policy()?;
        let points = score_question(policy, options.len(), selected);

        // A policy can never legitimately award more than the declared
        // per-question maximum; crossing it means the question bank is corrupt.
        if let Some(max) = question.max_points {
            if points > max as u32 {
                return Err(AppError::InternalError(format!(
                    "Question {} scored {} points above its declared maximum {}",
                    question.external_id, points, max
                )));
            }
        }

        let flagged = points >= 1;
        if flagged {
            flagged_behaviors.push(question.text.clone());
        }

        score += points;
        scored.push(ScoredAnswer {
            question_id: question.id,
            external_id: question.external_id.clone(),
            question_text: question.text.clone(),
            selected_index: selected,
            points,
            flagged,
        });
    }

    Ok(ScoringOutcome {
        score,
        answers: scored,
        flagged_behaviors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(
        external_id: &str,
        options: &[&str],
        scoring_policy: &str,
        correct_answer_index: Option<i32>,
        max_points: Option<i32>,
        display_order: i32,
    ) -> Question {
        Question {
            id: Uuid::new_v4(),
            questionnaire_id: Uuid::new_v4(),
            external_id: external_id.to_string(),
            text: format!("Question {}", external_id),
            description: None,
            options_json: serde_json::to_string(options).unwrap(),
            scoring_policy: scoring_policy.to_string(),
            correct_answer_index,
            max_points,
            display_order,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn answers(entries: &[(&str, i32)]) -> HashMap<String, i32> {
        entries
            .iter()
            .map(|(id, idx)| (id.to_string(), *idx))
            .collect()
    }

    #[test]
    fn binary_points_are_zero_or_one() {
        let policy = ScoringPolicy::Binary { expected_index: 0 };
        assert_eq!(score_question(policy, 2, 0), 0);
        assert_eq!(score_question(policy, 2, 1), 1);

        let reverse = ScoringPolicy::Binary { expected_index: 1 };
        assert_eq!(score_question(reverse, 2, 1), 0);
        assert_eq!(score_question(reverse, 2, 0), 1);
    }

    #[test]
    fn weighted_linear_points_equal_selected_index() {
        let policy = ScoringPolicy::WeightedLinear { max_points: 2 };
        for index in 0..3 {
            assert_eq!(score_question(policy, 3, index), index as u32);
        }
    }

    #[test]
    fn weighted_reverse_points_mirror_selected_index() {
        let policy = ScoringPolicy::WeightedReverseLinear { max_points: 2 };
        assert_eq!(score_question(policy, 3, 0), 2);
        assert_eq!(score_question(policy, 3, 1), 1);
        assert_eq!(score_question(policy, 3, 2), 0);
    }

    #[test]
    fn aggregate_equals_count_of_mismatches_for_binary() {
        let questions = vec![
            question("q1", &["yes", "no"], "binary_correct", Some(0), None, 1),
            question("q2", &["yes", "no"], "binary_correct", Some(0), None, 2),
            question("q3", &["yes", "no"], "binary_reverse", Some(1), None, 3),
        ];
        let outcome =
            score_submission(&questions, &answers(&[("q1", 1), ("q2", 0), ("q3", 0)])).unwrap();

        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.flagged_behaviors.len(), 2);
        assert_eq!(outcome.answers[0].points, 1);
        assert!(outcome.answers[0].flagged);
        assert_eq!(outcome.answers[1].points, 0);
        assert!(!outcome.answers[1].flagged);
    }

    #[test]
    fn missing_answer_names_the_question() {
        let questions = vec![
            question("q1", &["yes", "no"], "binary_correct", Some(0), None, 1),
            question("q2", &["yes", "no"], "binary_correct", Some(0), None, 2),
        ];
        let err = score_submission(&questions, &answers(&[("q1", 0)])).unwrap_err();
        assert!(matches!(err, AppError::MissingAnswer(ref id) if id == "q2"));
    }

    #[test]
    fn out_of_range_index_names_the_question() {
        let questions = vec![question(
            "q1",
            &["yes", "no"],
            "binary_correct",
            Some(0),
            None,
            1,
        )];
        let err = score_submission(&questions, &answers(&[("q1", 5)])).unwrap_err();
        assert!(matches!(err, AppError::InvalidAnswer(ref id) if id == "q1"));

        let err = score_submission(&questions, &answers(&[("q1", -1)])).unwrap_err();
        assert!(matches!(err, AppError::InvalidAnswer(ref id) if id == "q1"));
    }

    #[test]
    fn answers_resolve_by_internal_id_as_fallback() {
        let q = question("q1", &["yes", "no"], "binary_correct", Some(0), None, 1);
        let by_internal_id = answers(&[(q.id.to_string().as_str(), 0)]);
        let outcome = score_submission(std::slice::from_ref(&q), &by_internal_id).unwrap();
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn points_above_declared_maximum_are_a_data_integrity_error() {
        // Declared max 1, but a 3-option linear policy can award 2.
        let q = question(
            "q1",
            &["never", "sometimes", "often"],
            "weighted_linear",
            None,
            Some(1),
            1,
        );
        let err = score_submission(std::slice::from_ref(&q), &answers(&[("q1", 2)])).unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[test]
    fn weighted_answers_flag_any_nonzero_points() {
        let q = question(
            "q1",
            &["never", "sometimes", "often"],
            "weighted_reverse_linear",
            None,
            Some(2),
            1,
        );
        let outcome = score_submission(std::slice::from_ref(&q), &answers(&[("q1", 1)])).unwrap();
        assert_eq!(outcome.score, 1);
        assert!(outcome.answers[0].flagged);
        assert_eq!(outcome.flagged_behaviors, vec![q.text.clone()]);
    }
}
