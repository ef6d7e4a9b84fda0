use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::scoring::ScoringPolicy;

/// Screening instrument family. Risk thresholds are keyed by this, not by
/// `max_score` (see `scoring::risk`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    /// 23-item binary M-CHAT
    Mchat,
    /// 10-item weighted Q-CHAT (20 max)
    Qchat10,
    /// 25-item weighted Q-CHAT (50 max)
    Qchat25,
}

impl InstrumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentType::Mchat => "mchat",
            InstrumentType::Qchat10 => "qchat10",
            InstrumentType::Qchat25 => "qchat25",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "mchat" => Ok(InstrumentType::Mchat),
            "qchat10" => Ok(InstrumentType::Qchat10),
            "qchat25" => Ok(InstrumentType::Qchat25),
            other => Err(AppError::InternalError(format!(
                "Unknown instrument type '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Questionnaire {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub instrument_type: String,
    pub max_score: i32,
    pub passing_score: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Questionnaire {
    pub fn instrument(&self) -> AppResult<InstrumentType> {
        InstrumentType::parse(&self.instrument_type)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub questionnaire_id: Uuid,
    pub external_id: String,
    pub text: String,
    pub description: Option<String>,
    pub options_json: String,
    pub scoring_policy: String,
    pub correct_answer_index: Option<i32>,
    pub max_points: Option<i32>,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
}

impl Question {
    /// Ordered option labels. Malformed JSON yields an empty list, which makes
    /// every submitted index out of range rather than panicking mid-request.
    pub fn options(&self) -> Vec<String> {
        serde_json::from_str(&self.options_json).unwrap_or_default()
    }

    /// Resolve the stored policy string into the tagged scoring policy. Each
    /// variant carries only the fields its policy needs.
    pub fn policy(&self) -> AppResult<ScoringPolicy> {
        match self.scoring_policy.as_str() {
            // binary_correct and binary_reverse share one mechanism; the only
            // variable is which index counts as point-free
            "binary_correct" | "binary_reverse" => {
                let expected = self.correct_answer_index.ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Question {} has a binary policy without a correct answer index",
                        self.external_id
                    ))
                })?;
                Ok(ScoringPolicy::Binary {
                    expected_index: expected as usize,
                })
            }
            "weighted_linear" => Ok(ScoringPolicy::WeightedLinear {
                max_points: self.declared_max_points()?,
            }),
            "weighted_reverse_linear" => Ok(ScoringPolicy::WeightedReverseLinear {
                max_points: self.declared_max_points()?,
            }),
            other => Err(AppError::InternalError(format!(
                "Unknown scoring policy '{}' on question {}",
                other, self.external_id
            ))),
        }
    }

    fn declared_max_points(&self) -> AppResult<u32> {
        self.max_points
            .filter(|m| *m >= 0)
            .map(|m| m as u32)
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Question {} has a weighted policy without max points",
                    self.external_id
                ))
            })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub instrument_type: String,
    pub passing_score: i32,
    pub question_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Question as exposed over the wire. Scoring fields (expected index, point
/// weights) stay server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub id: Uuid,
    pub external_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<String>,
    pub order: i32,
}

impl From<&Question> for QuestionPayload {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            external_id: question.external_id.clone(),
            text: question.text.clone(),
            description: question.description.clone(),
            options: question.options(),
            order: question.display_order,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireDetail {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub instrument_type: String,
    pub max_score: i32,
    pub passing_score: i32,
    pub questions: Vec<QuestionPayload>,
}
