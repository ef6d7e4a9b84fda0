use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Advisory payload attached to every result. `next_steps` and
/// `flagged_behaviors` are present for all risk levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub summary: String,
    pub suggested_action: String,
    pub next_steps: Vec<String>,
    pub flagged_behaviors: Vec<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AssessmentResult {
    pub id: Uuid,
    pub questionnaire_id: Uuid,
    pub user_id: Option<Uuid>,
    pub score: i32,
    pub total_questions: i32,
    pub risk_level: String,
    pub flagged_behaviors_json: String,
    pub recommendations_json: String,
    pub created_at: NaiveDateTime,
}

/// Result row joined with its questionnaire reference, for the results listing.
#[derive(Debug, Clone, FromRow)]
pub struct ResultWithQuestionnaire {
    pub id: Uuid,
    pub questionnaire_id: Uuid,
    pub user_id: Option<Uuid>,
    pub score: i32,
    pub total_questions: i32,
    pub risk_level: String,
    pub flagged_behaviors_json: String,
    pub recommendations_json: String,
    pub created_at: NaiveDateTime,
    pub questionnaire_slug: String,
    pub questionnaire_title: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct AssessmentAnswer {
    pub id: Uuid,
    pub result_id: Uuid,
    pub question_id: Uuid,
    pub selected_index: i32,
    pub points: i32,
    pub position: i32,
    pub created_at: NaiveDateTime,
}

/// Parse a stored JSON string array; malformed data degrades to empty.
pub(crate) fn parse_string_array(value: &str) -> Vec<String> {
    serde_json::from_str(value).unwrap_or_default()
}

/// Parse a stored recommendations payload; malformed data degrades to empty.
pub(crate) fn parse_recommendations(value: &str) -> Recommendation {
    serde_json::from_str(value).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub answer_index: i32,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAssessmentRequest {
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub selected_index: i32,
    pub points: i32,
    pub created_at: NaiveDateTime,
}

impl From<&AssessmentAnswer> for AnswerResponse {
    fn from(answer: &AssessmentAnswer) -> Self {
        Self {
            id: answer.id,
            question_id: answer.question_id,
            selected_index: answer.selected_index,
            points: answer.points,
            created_at: answer.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResultResponse {
    pub id: Uuid,
    pub questionnaire_id: Uuid,
    pub user_id: Option<Uuid>,
    pub score: i32,
    pub total_questions: i32,
    pub risk_level: String,
    pub flagged_behaviors: Vec<String>,
    pub recommendations: Recommendation,
    pub created_at: NaiveDateTime,
    pub answers: Vec<AnswerResponse>,
}

impl AssessmentResultResponse {
    pub fn from_rows(result: AssessmentResult, answers: &[AssessmentAnswer]) -> Self {
        Self {
            id: result.id,
            questionnaire_id: result.questionnaire_id,
            user_id: result.user_id,
            score: result.score,
            total_questions: result.total_questions,
            risk_level: result.risk_level,
            flagged_behaviors: parse_string_array(&result.flagged_behaviors_json),
            recommendations: parse_recommendations(&result.recommendations_json),
            created_at: result.created_at,
            answers: answers.iter().map(AnswerResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireRef {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummaryResponse {
    pub id: Uuid,
    pub questionnaire: QuestionnaireRef,
    pub score: i32,
    pub total_questions: i32,
    pub risk_level: String,
    pub flagged_behaviors: Vec<String>,
    pub recommendations: Recommendation,
    pub created_at: NaiveDateTime,
}

impl From<&ResultWithQuestionnaire> for ResultSummaryResponse {
    fn from(row: &ResultWithQuestionnaire) -> Self {
        Self {
            id: row.id,
            questionnaire: QuestionnaireRef {
                id: row.questionnaire_id,
                slug: row.questionnaire_slug.clone(),
                title: row.questionnaire_title.clone(),
            },
            score: row.score,
            total_questions: row.total_questions,
            risk_level: row.risk_level.clone(),
            flagged_behaviors: parse_string_array(&row.flagged_behaviors_json),
            recommendations: parse_recommendations(&row.recommendations_json),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetailResponse {
    #[serde(flatten)]
    pub summary: ResultSummaryResponse,
    pub answers: Vec<AnswerResponse>,
}

impl ResultDetailResponse {
    pub fn from_rows(row: &ResultWithQuestionnaire, answers: &[AssessmentAnswer]) -> Self {
        Self {
            summary: ResultSummaryResponse::from(row),
            answers: answers.iter().map(AnswerResponse::from).collect(),
        }
    }
}
