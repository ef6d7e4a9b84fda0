use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{QuestionnaireDetail, QuestionnaireSummary, QuestionPayload};
use crate::repository::QuestionnaireRepository;

#[derive(Clone)]
pub struct QuestionnaireService {
    questionnaire_repository: Arc<QuestionnaireRepository>,
}

impl QuestionnaireService {
    pub fn new(questionnaire_repository: Arc<QuestionnaireRepository>) -> Self {
        Self {
            questionnaire_repository,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<QuestionnaireSummary>> {
        let questionnaires = self.questionnaire_repository.list().await?;
        let counts = self.questionnaire_repository.question_counts().await?;

        Ok(questionnaires
            .into_iter()
            .map(|q| QuestionnaireSummary {
                question_count: counts.get(&q.id).copied().unwrap_or(0),
                id: q.id,
                slug: q.slug,
                title: q.title,
                description: q.description,
                instrument_type: q.instrument_type,
                passing_score: q.passing_score,
                created_at: q.created_at,
                updated_at: q.updated_at,
            })
            .collect())
    }

    pub async fn get(&self, identifier: &str) -> AppResult<QuestionnaireDetail> {
        let questionnaire = self
            .questionnaire_repository
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| AppError::NotFound("Questionnaire not found".to_string()))?;

        let questions = self
            .questionnaire_repository
            .list_questions(questionnaire.id)
            .await?;

        Ok(QuestionnaireDetail {
            id: questionnaire.id,
            slug: questionnaire.slug,
            title: questionnaire.title,
            description: questionnaire.description,
            instrument_type: questionnaire.instrument_type,
            max_score: questionnaire.max_score,
            passing_score: questionnaire.passing_score,
            questions: questions.iter().map(QuestionPayload::from).collect(),
        })
    }
}
