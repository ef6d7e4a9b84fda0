use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AssessmentAnswer, AssessmentResult, ResultWithQuestionnaire};

/// One scored answer ready for persistence, in submission order.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question_id: Uuid,
    pub selected_index: i32,
    pub points: i32,
}

#[derive(Debug, Clone)]
pub struct NewResult {
    pub questionnaire_id: Uuid,
    pub user_id: Option<Uuid>,
    pub score: i32,
    pub total_questions: i32,
    pub risk_level: String,
    pub flagged_behaviors_json: String,
    pub recommendations_json: String,
}

#[derive(Clone)]
pub struct AssessmentRepository {
    pool: PgPool,
}

impl AssessmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a result and its answers in one transaction. Nothing persists
    /// unless every row is written.
    pub async fn create_with_answers(
        &self,
        result: NewResult,
        answers: &[NewAnswer],
    ) -> Result<(AssessmentResult, Vec<AssessmentAnswer>), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let stored: AssessmentResult = sqlx::query_as(
            r#"
            INSERT INTO assessment_results (
                questionnaire_id, user_id, score, total_questions,
                risk_level, flagged_behaviors_json, recommendations_json
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(result.questionnaire_id)
        .bind(result.user_id)
        .bind(result.score)
        .bind(result.total_questions)
        .bind(&result.risk_level)
        .bind(&result.flagged_behaviors_json)
        .bind(&result.recommendations_json)
        .fetch_one(&mut *tx)
        .await?;

        let mut stored_answers = Vec::with_capacity(answers.len());
        for (index, answer) in answers.iter().enumerate() {
            let row: AssessmentAnswer = sqlx::query_as(
                r#"
                INSERT INTO assessment_answers (result_id, question_id, selected_index, points, position)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(stored.id)
            .bind(answer.question_id)
            .bind(answer.selected_index)
            .bind(answer.points)
            .bind((index + 1) as i32)
            .fetch_one(&mut *tx)
            .await?;
            stored_answers.push(row);
        }

        tx.commit().await?;
        Ok((stored, stored_answers))
    }

    pub async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ResultWithQuestionnaire>, sqlx::Error> {
        sqlx::query_as::<_, ResultWithQuestionnaire>(
            r#"
            SELECT r.*, q.slug AS questionnaire_slug, q.title AS questionnaire_title
            FROM assessment_results r
            JOIN questionnaires q ON q.id = r.questionnaire_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_by_id_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ResultWithQuestionnaire>, sqlx::Error> {
        sqlx::query_as::<_, ResultWithQuestionnaire>(
            r#"
            SELECT r.*, q.slug AS questionnaire_slug, q.title AS questionnaire_title
            FROM assessment_results r
            JOIN questionnaires q ON q.id = r.questionnaire_id
            WHERE r.id = $1 AND r.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_answers(
        &self,
        result_id: Uuid,
    ) -> Result<Vec<AssessmentAnswer>, sqlx::Error> {
        sqlx::query_as::<_, AssessmentAnswer>(
            "SELECT * FROM assessment_answers WHERE result_id = $1 ORDER BY position ASC",
        )
        .bind(result_id)
        .fetch_all(&self.pool)
        .await
    }
}
