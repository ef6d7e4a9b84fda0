use chrono::Utc;
use uuid::Uuid;

use crate::database::{builtin_questionnaires, SeedQuestionnaire};
use crate::error::AppError;
use crate::models::{Question, Questionnaire, RiskLevel, SubmitAssessmentRequest, SubmittedAnswer};
use crate::services::AssessmentService;

/// Materialize a built-in instrument as database rows, without a database.
fn fixture(slug: &str) -> (Questionnaire, Vec<Question>) {
    let seed: SeedQuestionnaire = builtin_questionnaires()
        .into_iter()
        .find(|s| s.slug == slug)
        .unwrap();

    let now = Utc::now().naive_utc();
    let questionnaire_id = Uuid::new_v4();

    let questionnaire = Questionnaire {
        id: questionnaire_id,
        slug: seed.slug.to_string(),
        title: seed.title.to_string(),
        description: seed.description.to_string(),
        instrument_type: seed.instrument_type.as_str().to_string(),
        max_score: seed.max_score,
        passing_score: seed.passing_score,
        created_at: now,
        updated_at: now,
    };

    let questions = seed
        .questions
        .iter()
        .enumerate()
        .map(|(index, q)| Question {
            id: Uuid::new_v4(),
            questionnaire_id,
            external_id: q.external_id.to_string(),
            text: q.text.to_string(),
            description: q.description.map(String::from),
            options_json: serde_json::to_string(q.options).unwrap(),
            scoring_policy: q.scoring_policy.to_string(),
            correct_answer_index: q.correct_answer_index,
            max_points: q.max_points,
            display_order: (index + 1) as i32,
            created_at: now,
        })
        .collect();

    (questionnaire, questions)
}

fn submission(answers: Vec<(String, i32)>) -> SubmitAssessmentRequest {
    SubmitAssessmentRequest {
        answers: answers
            .into_iter()
            .map(|(question_id, answer_index)| SubmittedAnswer {
                question_id,
                answer_index,
            })
            .collect(),
    }
}

/// Answer every question with its point-free option.
fn all_typical(questions: &[Question]) -> SubmitAssessmentRequest {
    submission(
        questions
            .iter()
            .map(|q| {
                let index = match q.scoring_policy.as_str() {
                    "binary_correct" | "binary_reverse" => q.correct_answer_index.unwrap(),
                    _ => q.max_points.unwrap(),
                };
                (q.external_id.clone(), index)
            })
            .collect(),
    )
}

#[test]
fn mchat_all_typical_answers_score_zero_and_low() {
    let (questionnaire, questions) = fixture("mchat");
    let evaluated =
        AssessmentService::evaluate(&questionnaire, &questions, &all_typical(&questions)).unwrap();

    assert_eq!(evaluated.score, 0);
    assert_eq!(evaluated.total_questions, 23);
    assert_eq!(evaluated.risk_level, RiskLevel::Low);
    assert!(evaluated.flagged_behaviors.is_empty());
    assert!(evaluated.recommendations.flagged_behaviors.is_empty());
    assert!(!evaluated.recommendations.next_steps.is_empty());
}

#[test]
fn mchat_four_atypical_answers_land_in_medium() {
    let (questionnaire, questions) = fixture("mchat");
    let mut request = all_typical(&questions);
    for answer in request.answers.iter_mut().take(4) {
        answer.answer_index = 1 - answer.answer_index;
    }

    let evaluated = AssessmentService::evaluate(&questionnaire, &questions, &request).unwrap();
    assert_eq!(evaluated.score, 4);
    assert_eq!(evaluated.risk_level, RiskLevel::Medium);
    assert_eq!(evaluated.flagged_behaviors.len(), 4);
    // Flagged texts come back in display order, matching the first four items.
    assert_eq!(evaluated.flagged_behaviors[0], questions[0].text);
}

#[test]
fn qchat10_all_typical_answers_score_zero_and_low() {
    let (questionnaire, questions) = fixture("qchat-10");
    let request = submission(
        questions
            .iter()
            .map(|q| (q.external_id.clone(), 2))
            .collect(),
    );

    let evaluated = AssessmentService::evaluate(&questionnaire, &questions, &request).unwrap();
    assert_eq!(evaluated.score, 0);
    assert_eq!(evaluated.risk_level, RiskLevel::Low);
}

#[test]
fn qchat10_all_atypical_answers_max_out_at_high() {
    let (questionnaire, questions) = fixture("qchat-10");
    let request = submission(
        questions
            .iter()
            .map(|q| (q.external_id.clone(), 0))
            .collect(),
    );

    let evaluated = AssessmentService::evaluate(&questionnaire, &questions, &request).unwrap();
    assert_eq!(evaluated.score, 20);
    assert_eq!(evaluated.total_questions, 10);
    assert_eq!(evaluated.risk_level, RiskLevel::High);
    assert_eq!(evaluated.flagged_behaviors.len(), 10);
}

#[test]
fn missing_answer_rejects_the_whole_submission() {
    let (questionnaire, questions) = fixture("mchat");
    let mut request = all_typical(&questions);
    request.answers.retain(|a| a.question_id != "q7");

    let err = AssessmentService::evaluate(&questionnaire, &questions, &request).unwrap_err();
    assert!(matches!(err, AppError::MissingAnswer(ref id) if id == "q7"));
}

#[test]
fn out_of_range_index_rejects_the_whole_submission() {
    let (questionnaire, questions) = fixture("mchat");
    let mut request = all_typical(&questions);
    request.answers[0].answer_index = 5;

    let err = AssessmentService::evaluate(&questionnaire, &questions, &request).unwrap_err();
    assert!(matches!(err, AppError::InvalidAnswer(ref id) if id == "q1"));
}

#[test]
fn answers_may_reference_internal_question_ids() {
    let (questionnaire, questions) = fixture("mchat");
    let request = submission(
        questions
            .iter()
            .map(|q| (q.id.to_string(), q.correct_answer_index.unwrap()))
            .collect(),
    );

    let evaluated = AssessmentService::evaluate(&questionnaire, &questions, &request).unwrap();
    assert_eq!(evaluated.score, 0);
}

#[test]
fn empty_submission_is_a_validation_error() {
    let (questionnaire, questions) = fixture("mchat");
    let err = AssessmentService::evaluate(&questionnaire, &questions, &submission(vec![]))
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[test]
fn blank_question_id_is_a_validation_error() {
    let (questionnaire, questions) = fixture("mchat");
    let request = submission(vec![("  ".to_string(), 0)]);
    let err = AssessmentService::evaluate(&questionnaire, &questions, &request).unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[test]
fn evaluated_answers_follow_display_order() {
    let (questionnaire, questions) = fixture("qchat-10");
    // Submit in reverse order; scored answers still come back q1..q10.
    let request = submission(
        questions
            .iter()
            .rev()
            .map(|q| (q.external_id.clone(), 1))
            .collect(),
    );

    let evaluated = AssessmentService::evaluate(&questionnaire, &questions, &request).unwrap();
    let order: Vec<&str> = evaluated
        .answers
        .iter()
        .map(|a| a.external_id.as_str())
        .collect();
    assert_eq!(order[0], "q1");
    assert_eq!(order[9], "q10");
    // Middle option on every reverse-linear item is 1 point each.
    assert_eq!(evaluated.score, 10);
    assert_eq!(evaluated.risk_level, RiskLevel::Medium);
}

#[test]
fn questionnaire_detail_assembly_is_deterministic_and_hides_scoring_keys() {
    use crate::models::{QuestionPayload, QuestionnaireDetail};

    let (questionnaire, questions) = fixture("mchat");
    let build = |q: &Questionnaire| QuestionnaireDetail {
        id: q.id,
        slug: q.slug.clone(),
        title: q.title.clone(),
        description: q.description.clone(),
        instrument_type: q.instrument_type.clone(),
        max_score: q.max_score,
        passing_score: q.passing_score,
        questions: questions.iter().map(QuestionPayload::from).collect(),
    };

    let first = serde_json::to_value(build(&questionnaire)).unwrap();
    let second = serde_json::to_value(build(&questionnaire)).unwrap();
    assert_eq!(first, second);

    // Scoring keys stay server-side; questions come back in display order.
    let rendered = first.to_string();
    assert!(!rendered.contains("correctAnswerIndex"));
    assert!(!rendered.contains("maxPoints"));
    assert!(!rendered.contains("scoringPolicy"));
    let orders: Vec<i64> = first["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, (1..=23).collect::<Vec<i64>>());
}
