use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    let migrations = vec![
        // Enable UUID extension
        r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp";"#,
        // Users table
        r#"CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            email VARCHAR(255) UNIQUE NOT NULL,
            name VARCHAR(100),
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP NOT NULL DEFAULT NOW()
        );"#,
        // Questionnaires table
        r#"CREATE TABLE IF NOT EXISTS questionnaires (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            slug VARCHAR(100) UNIQUE NOT NULL,
            title VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            instrument_type VARCHAR(20) NOT NULL CHECK (instrument_type IN ('mchat', 'qchat10', 'qchat25')),
            max_score INTEGER NOT NULL,
            passing_score INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP NOT NULL DEFAULT NOW()
        );"#,
        // Questions table; external_id is the stable human-assigned identifier
        // (e.g. "q7"), display_order is contiguous from 1 per questionnaire
        r#"CREATE TABLE IF NOT EXISTS questions (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            questionnaire_id UUID NOT NULL REFERENCES questionnaires(id) ON DELETE CASCADE,
            external_id VARCHAR(50) NOT NULL,
            text TEXT NOT NULL,
            description TEXT,
            options_json TEXT NOT NULL,
            scoring_policy VARCHAR(30) NOT NULL CHECK (scoring_policy IN (
                'binary_correct', 'binary_reverse', 'weighted_linear', 'weighted_reverse_linear'
            )),
            correct_answer_index INTEGER,
            max_points INTEGER,
            display_order INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT NOW(),
            UNIQUE (questionnaire_id, external_id),
            UNIQUE (questionnaire_id, display_order)
        );"#,
        // Assessment results table (append-only audit trail)
        r#"CREATE TABLE IF NOT EXISTS assessment_results (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            questionnaire_id UUID NOT NULL REFERENCES questionnaires(id),
            user_id UUID REFERENCES users(id) ON DELETE SET NULL,
            score INTEGER NOT NULL,
            total_questions INTEGER NOT NULL,
            risk_level VARCHAR(10) NOT NULL CHECK (risk_level IN ('low', 'medium', 'high')),
            flagged_behaviors_json TEXT NOT NULL DEFAULT '[]',
            recommendations_json TEXT NOT NULL DEFAULT '{}',
            created_at TIMESTAMP NOT NULL DEFAULT NOW()
        );"#,
        // Per-question answers; position preserves submission order
        r#"CREATE TABLE IF NOT EXISTS assessment_answers (
            id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            result_id UUID NOT NULL REFERENCES assessment_results(id) ON DELETE CASCADE,
            question_id UUID NOT NULL REFERENCES questions(id),
            selected_index INTEGER NOT NULL,
            points INTEGER NOT NULL,
            position INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT NOW()
        );"#,
        // Indexes
        r#"CREATE INDEX IF NOT EXISTS idx_questions_questionnaire ON questions(questionnaire_id, display_order);"#,
        r#"CREATE INDEX IF NOT EXISTS idx_results_user ON assessment_results(user_id, created_at DESC);"#,
        r#"CREATE INDEX IF NOT EXISTS idx_answers_result ON assessment_answers(result_id, position);"#,
    ];

    for migration in migrations {
        sqlx::query(migration).execute(pool).await?;
    }

    info!("Database migrations completed");
    Ok(())
}
