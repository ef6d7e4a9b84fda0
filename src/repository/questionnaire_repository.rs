use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Question, Questionnaire};

#[derive(Clone)]
pub struct QuestionnaireRepository {
    pool: PgPool,
}

impl QuestionnaireRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Questionnaire>, sqlx::Error> {
        sqlx::query_as::<_, Questionnaire>(
            "SELECT * FROM questionnaires ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn question_counts(&self) -> Result<HashMap<Uuid, i64>, sqlx::Error> {
        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            "SELECT questionnaire_id, COUNT(*) FROM questions GROUP BY questionnaire_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Look up by slug first, falling back to the UUID form of the id.
    pub async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Questionnaire>, sqlx::Error> {
        sqlx::query_as::<_, Questionnaire>(
            "SELECT * FROM questionnaires WHERE slug = $1 OR id::text = $1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_questions(
        &self,
        questionnaire_id: Uuid,
    ) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE questionnaire_id = $1 ORDER BY display_order ASC",
        )
        .bind(questionnaire_id)
        .fetch_all(&self.pool)
        .await
    }
}
