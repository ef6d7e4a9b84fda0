use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    AssessmentResultResponse, Question, Questionnaire, Recommendation, ResultDetailResponse,
    ResultSummaryResponse, RiskLevel, SubmitAssessmentRequest,
};
use crate::repository::{AssessmentRepository, NewAnswer, NewResult, QuestionnaireRepository};
use crate::scoring::{build_recommendations, classify_risk, score_submission, ScoredAnswer};

/// Fully scored submission, not yet persisted.
#[derive(Debug, Clone)]
pub struct EvaluatedSubmission {
    pub score: u32,
    pub total_questions: usize,
    pub risk_level: RiskLevel,
    pub flagged_behaviors: Vec<String>,
    pub recommendations: Recommendation,
    pub answers: Vec<ScoredAnswer>,
}

#[derive(Clone)]
pub struct AssessmentService {
    questionnaire_repository: Arc<QuestionnaireRepository>,
    assessment_repository: Arc<AssessmentRepository>,
}

impl AssessmentService {
    pub fn new(
        questionnaire_repository: Arc<QuestionnaireRepository>,
        assessment_repository: Arc<AssessmentRepository>,
    ) -> Self {
        Self {
            questionnaire_repository,
            assessment_repository,
        }
    }

    /// Score a submission against a questionnaire without touching storage.
    /// Any validation or scoring failure aborts before persistence happens.
    pub fn evaluate(
        questionnaire: &Questionnaire,
        questions: &[Question],
        request: &SubmitAssessmentRequest,
    ) -> AppResult<EvaluatedSubmission> {
        if request.answers.is_empty() {
            return Err(AppError::ValidationError(
                "answers must not be empty".to_string(),
            ));
        }

        let mut by_question: HashMap<String, i32> = HashMap::with_capacity(request.answers.len());
        for answer in &request.answers {
            if answer.question_id.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "questionId must not be empty".to_string(),
                ));
            }
            by_question.insert(answer.question_id.clone(), answer.answer_index);
        }

        let outcome = score_submission(questions, &by_question)?;
        let instrument = questionnaire.instrument()?;
        let risk_level = classify_risk(instrument, outcome.score);
        let recommendations = build_recommendations(risk_level, &outcome.flagged_behaviors);

        Ok(EvaluatedSubmission {
            score: outcome.score,
            total_questions: questions.len(),
            risk_level,
            flagged_behaviors: outcome.flagged_behaviors,
            recommendations,
            answers: outcome.answers,
        })
    }

    pub async fn submit(
        &self,
        user_id: Option<Uuid>,
        identifier: &str,
        request: SubmitAssessmentRequest,
    ) -> AppResult<AssessmentResultResponse> {
        let questionnaire = self
            .questionnaire_repository
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| AppError::NotFound("Questionnaire not found".to_string()))?;

        let questions = self
            .questionnaire_repository
            .list_questions(questionnaire.id)
            .await?;

        let evaluated = Self::evaluate(&questionnaire, &questions, &request)?;

        let flagged_behaviors_json = serde_json::to_string(&evaluated.flagged_behaviors)
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        let recommendations_json = serde_json::to_string(&evaluated.recommendations)
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let new_result = NewResult {
            questionnaire_id: questionnaire.id,
            user_id,
            score: evaluated.score as i32,
            total_questions: evaluated.total_questions as i32,
            risk_level: evaluated.risk_level.as_str().to_string(),
            flagged_behaviors_json,
            recommendations_json,
        };
        let new_answers: Vec<NewAnswer> = evaluated
            .answers
            .iter()
            .map(|a| NewAnswer {
                question_id: a.question_id,
                selected_index: a.selected_index as i32,
                points: a.points as i32,
            })
            .collect();

        let (result, answers) = self
            .assessment_repository
            .create_with_answers(new_result, &new_answers)
            .await?;

        Ok(AssessmentResultResponse::from_rows(result, &answers))
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<ResultSummaryResponse>> {
        let rows = self.assessment_repository.list_by_user(user_id).await?;
        Ok(rows.iter().map(ResultSummaryResponse::from).collect())
    }

    pub async fn get_for_user(
        &self,
        result_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<ResultDetailResponse> {
        let row = self
            .assessment_repository
            .find_by_id_for_user(result_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Result not found".to_string()))?;

        let answers = self.assessment_repository.list_answers(row.id).await?;
        Ok(ResultDetailResponse::from_rows(&row, &answers))
    }
}
