use anyhow::{ensure, Result};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::InstrumentType;

/// One question of a built-in instrument. `display_order` is assigned from the
/// position in the list (starting at 1).
#[derive(Debug, Clone)]
pub struct SeedQuestion {
    pub external_id: &'static str,
    pub text: &'static str,
    pub description: Option<&'static str>,
    pub options: &'static [&'static str],
    pub scoring_policy: &'static str,
    pub correct_answer_index: Option<i32>,
    pub max_points: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SeedQuestionnaire {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub instrument_type: InstrumentType,
    pub max_score: i32,
    pub passing_score: i32,
    pub questions: Vec<SeedQuestion>,
}

impl SeedQuestion {
    fn max_awardable_points(&self) -> i32 {
        match self.scoring_policy {
            "binary_correct" | "binary_reverse" => 1,
            _ => (self.options.len() as i32) - 1,
        }
    }
}

const YES_NO: &[&str] = &["ใช่", "ไม่ใช่"];

// Frequency scales for the weighted Q-CHAT items. Option order encodes the
// item's direction: index 2 is always the typical-development answer, so every
// item scores with the reverse-linear policy.
const FREQ_ASC: &[&str] = &["ไม่เคย", "บางครั้ง", "บ่อยครั้ง"];
const FREQ_DESC: &[&str] = &["บ่อยครั้ง", "บางครั้ง", "ไม่เคย"];

fn binary(external_id: &'static str, text: &'static str, expected: i32) -> SeedQuestion {
    SeedQuestion {
        external_id,
        text,
        description: None,
        options: YES_NO,
        scoring_policy: if expected == 0 {
            "binary_correct"
        } else {
            "binary_reverse"
        },
        correct_answer_index: Some(expected),
        max_points: None,
    }
}

fn weighted(
    external_id: &'static str,
    text: &'static str,
    options: &'static [&'static str],
) -> SeedQuestion {
    SeedQuestion {
        external_id,
        text,
        description: None,
        options,
        scoring_policy: "weighted_reverse_linear",
        correct_answer_index: None,
        max_points: Some((options.len() as i32) - 1),
    }
}

fn mchat() -> SeedQuestionnaire {
    SeedQuestionnaire {
        slug: "mchat",
        title: "M-CHAT",
        description:
            "แบบคัดกรองออทิสติกสำหรับเด็กเล็ก (Modified Checklist for Autism in Toddlers)",
        instrument_type: InstrumentType::Mchat,
        max_score: 23,
        passing_score: 3,
        questions: vec![
            binary("q1", "ลูกของคุณชอบให้โยกตัว หรือสนุกกับการเล่นกระโดดบนตักของคุณไหม?", 0),
            binary("q2", "ลูกของคุณสนใจเด็กคนอื่นไหม? เช่น มอง เล่นด้วย หรือเดินเข้าไปหา", 0),
            binary("q3", "ลูกของคุณชอบปีนขึ้นสิ่งต่างๆ เช่น บันได หรือเฟอร์นิเจอร์ไหม?", 0),
            binary("q4", "ลูกของคุณสนุกกับการเล่นซ่อนหา หรือเกมอุ๊ยอุ๊ย (peek-a-boo) ไหม?", 0),
            binary("q5", "ลูกของคุณเคยเล่นแบบเลียนแบบ เช่น แกล้งโทรศัพท์ เล่นตุ๊กตา หรือเล่นสมมติอื่นๆ ไหม?", 0),
            binary("q6", "ลูกของคุณเคยใช้นิ้วชี้เพื่อขอสิ่งที่ต้องการไหม?", 0),
            binary("q7", "ลูกของคุณเคยใช้นิ้วชี้เพื่อแสดงสิ่งที่สนใจหรือชักชวนให้คุณดูไหม?", 0),
            binary("q8", "ลูกของคุณสามารถเล่นของเล่นชิ้นเล็กอย่างเหมาะสม ไม่ใช่แค่เอาเข้าปากหรือปัดทิ้ง ใช่ไหม?", 0),
            binary("q9", "ลูกของคุณเคยหยิบสิ่งของมาให้คุณเพื่อแบ่งปันหรือให้ดูไหม?", 0),
            binary("q10", "ลูกของคุณสามารถสบตากับคุณได้นานมากกว่า 1–2 วินาทีไหม?", 0),
            binary("q11", "ลูกของคุณดูไวต่อเสียงมากผิดปกติไหม? เช่น ชอบอุดหูเมื่อได้ยินเสียงดัง", 1),
            binary("q12", "ลูกของคุณยิ้มตอบเมื่อเห็นใบหน้าหรือรอยยิ้มของคุณไหม?", 0),
            binary("q13", "ลูกของคุณเคยเลียนแบบการกระทำของคุณไหม? เช่น คุณทำท่าอะไร เขาทำตาม", 0),
            binary("q14", "เมื่อตามชื่อลูก เขามักจะตอบสนองไหม? เช่น หันมามองหรือแสดงว่ารับรู้", 0),
            binary("q15", "ถ้าคุณชี้ไปที่ของเล่นไกลๆ ลูกของคุณมองตามไหม?", 0),
            binary("q16", "ลูกของคุณเดินได้แล้วหรือยัง?", 0),
            binary("q17", "ลูกของคุณสามารถมองตามสิ่งที่คุณกำลังมองหรือชี้อยู่ได้ไหม?", 0),
            binary("q18", "ลูกของคุณมีการเคลื่อนไหวของนิ้วหรือมือผิดปกติใกล้ใบหน้าไหม? เช่น โบกนิ้วตรงหน้า", 1),
            binary("q19", "ลูกของคุณเคยพยายามดึงความสนใจของคุณให้ดูสิ่งที่เขากำลังทำไหม?", 0),
            binary("q20", "คุณเคยสงสัยว่าลูกของคุณอาจหูตึงหรือไม่ได้ยินไหม?", 1),
            binary("q21", "ลูกของคุณเข้าใจเวลาที่คนอื่นพูดกับเขาไหม?", 0),
            binary("q22", "ลูกของคุณเคยจ้องมองอากาศ หรือเดินไปมาโดยไม่มีจุดหมายไหม?", 1),
            binary("q23", "เมื่อลูกพบสิ่งใหม่ๆ เขามักจะมองหน้าคุณเพื่อตรวจสอบปฏิกิริยาของคุณไหม?", 0),
        ],
    }
}

fn qchat10() -> SeedQuestionnaire {
    SeedQuestionnaire {
        slug: "qchat-10",
        title: "Q-CHAT-10",
        description: "แบบคัดกรองภาวะออทิสติก Q-CHAT-10 (Quantitative Checklist for Autism in Toddlers)",
        instrument_type: InstrumentType::Qchat10,
        max_score: 20,
        passing_score: 7,
        questions: vec![
            weighted("q1", "เมื่อคุณเรียกชื่อ ลูกหันมามองคุณบ่อยแค่ไหน?", FREQ_ASC),
            weighted("q2", "ลูกสบตาคุณได้ง่ายดาย เวลาพูดคุยหรือเล่นด้วยกันบ่อยแค่ไหน?", FREQ_ASC),
            weighted("q3", "ลูกนำสิ่งของมาเรียงต่อกันเป็นแถวๆ บ่อยแค่ไหน?", FREQ_DESC),
            weighted("q4", "คนอื่นๆ ฟังสิ่งที่ลูกพูดรู้เรื่อง หรือเข้าใจสิ่งที่ลูกสื่อสารบ่อยแค่ไหน?", FREQ_ASC),
            weighted("q5", "ลูกใช้นิ้วชี้เพื่อบอกความต้องการ (เช่น ชี้ขอนม ชี้ของที่อยากได้) บ่อยแค่ไหน?", FREQ_ASC),
            weighted("q6", "ลูกใช้นิ้วชี้เพื่อชวนให้คุณดูสิ่งที่เขาสนใจ (เช่น ชี้ให้ดูเครื่องบิน ชี้ให้ดูแมว) บ่อยแค่ไหน?", FREQ_ASC),
            weighted("q7", "ลูกขยับนิ้วมือในลักษณะแปลกๆ ใกล้ๆ ดวงตาของเขาบ่อยแค่ไหน?", FREQ_DESC),
            weighted("q8", "ลูกเล่นบทบาทสมมติ (เช่น ป้อนข้าวตุ๊กตา, คุยโทรศัพท์ของเล่น) บ่อยแค่ไหน?", FREQ_ASC),
            weighted("q9", "ลูกจ้องมองไปยังความว่างเปล่า หรือมองอย่างไร้จุดหมายบ่อยแค่ไหน?", FREQ_DESC),
            weighted("q10", "เมื่อลูกเจอสิ่งแปลกใหม่ ลูกหันกลับมามองหน้าคุณเพื่อดูปฏิกิริยาบ่อยแค่ไหน?", FREQ_ASC),
        ],
    }
}

/// The built-in question bank seeded at startup.
pub fn builtin_questionnaires() -> Vec<SeedQuestionnaire> {
    vec![mchat(), qchat10()]
}

/// Data-integrity checks applied before anything is written. A mismatch
/// between a question's declared bounds and its policy-computed range fails
/// startup rather than surfacing mid-scoring.
pub fn validate_seed(seed: &SeedQuestionnaire) -> Result<()> {
    ensure!(
        !seed.questions.is_empty(),
        "questionnaire '{}' has no questions",
        seed.slug
    );

    let mut seen = std::collections::HashSet::new();
    let mut total_max = 0i32;

    for question in &seed.questions {
        ensure!(
            seen.insert(question.external_id),
            "questionnaire '{}' has duplicate question id '{}'",
            seed.slug,
            question.external_id
        );
        ensure!(
            question.options.len() >= 2,
            "question '{}' of '{}' needs at least two options",
            question.external_id,
            seed.slug
        );

        match question.scoring_policy {
            "binary_correct" | "binary_reverse" => {
                let expected = question.correct_answer_index.unwrap_or(-1);
                ensure!(
                    expected >= 0 && (expected as usize) < question.options.len(),
                    "question '{}' of '{}' has an out-of-range expected index",
                    question.external_id,
                    seed.slug
                );
            }
            "weighted_linear" | "weighted_reverse_linear" => {
                let declared = question.max_points.unwrap_or(-1);
                ensure!(
                    declared == (question.options.len() as i32) - 1,
                    "question '{}' of '{}' declares max {} but its policy can award up to {}",
                    question.external_id,
                    seed.slug,
                    declared,
                    question.options.len() - 1
                );
            }
            other => anyhow::bail!(
                "question '{}' of '{}' has unknown scoring policy '{}'",
                question.external_id,
                seed.slug,
                other
            ),
        }

        total_max += question.max_awardable_points();
    }

    ensure!(
        total_max == seed.max_score,
        "questionnaire '{}' declares max score {} but its questions can award {}",
        seed.slug,
        seed.max_score,
        total_max
    );

    Ok(())
}

/// Seed the question bank. Idempotent: questionnaires are upserted by slug and
/// their question sets replaced, leaving existing assessment results untouched.
pub async fn run_seed(pool: &PgPool) -> Result<()> {
    for seed in builtin_questionnaires() {
        validate_seed(&seed)?;

        let mut tx = pool.begin().await?;

        let (questionnaire_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO questionnaires (slug, title, description, instrument_type, max_score, passing_score)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (slug) DO UPDATE
            SET title = EXCLUDED.title,
                description = EXCLUDED.description,
                instrument_type = EXCLUDED.instrument_type,
                max_score = EXCLUDED.max_score,
                passing_score = EXCLUDED.passing_score,
                updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(seed.slug)
        .bind(seed.title)
        .bind(seed.description)
        .bind(seed.instrument_type.as_str())
        .bind(seed.max_score)
        .bind(seed.passing_score)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM questions WHERE questionnaire_id = $1")
            .bind(questionnaire_id)
            .execute(&mut *tx)
            .await?;

        for (index, question) in seed.questions.iter().enumerate() {
            let options_json = serde_json::to_string(question.options)?;
            sqlx::query(
                r#"
                INSERT INTO questions (
                    questionnaire_id, external_id, text, description, options_json,
                    scoring_policy, correct_answer_index, max_points, display_order
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(questionnaire_id)
            .bind(question.external_id)
            .bind(question.text)
            .bind(question.description)
            .bind(options_json)
            .bind(question.scoring_policy)
            .bind(question.correct_answer_index)
            .bind(question.max_points)
            .bind((index + 1) as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(
            "Seeded questionnaire '{}' ({} questions)",
            seed.slug,
            seed.questions.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_questionnaires_pass_validation() {
        for seed in builtin_questionnaires() {
            validate_seed(&seed).unwrap();
        }
    }

    #[test]
    fn mchat_is_a_23_item_binary_instrument() {
        let seed = mchat();
        assert_eq!(seed.questions.len(), 23);
        assert_eq!(seed.max_score, 23);
        for question in &seed.questions {
            assert!(question.scoring_policy.starts_with("binary"));
            assert_eq!(question.options.len(), 2);
        }
        // The four reverse-keyed items score on "yes"
        let reversed: Vec<&str> = seed
            .questions
            .iter()
            .filter(|q| q.scoring_policy == "binary_reverse")
            .map(|q| q.external_id)
            .collect();
        assert_eq!(reversed, vec!["q11", "q18", "q20", "q22"]);
    }

    #[test]
    fn qchat10_awards_up_to_twenty_points() {
        let seed = qchat10();
        assert_eq!(seed.questions.len(), 10);
        assert_eq!(seed.max_score, 20);
        for question in &seed.questions {
            assert_eq!(question.scoring_policy, "weighted_reverse_linear");
            assert_eq!(question.max_points, Some(2));
            assert_eq!(question.options.len(), 3);
        }
    }

    #[test]
    fn validation_rejects_inconsistent_max_points() {
        let mut seed = qchat10();
        seed.questions[0].max_points = Some(5);
        assert!(validate_seed(&seed).is_err());
    }

    #[test]
    fn validation_rejects_duplicate_external_ids() {
        let mut seed = mchat();
        seed.questions[1].external_id = "q1";
        assert!(validate_seed(&seed).is_err());
    }
}
