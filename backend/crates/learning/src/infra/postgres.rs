//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{
    AccountId, AlternativeId, AssessmentId, CertificateId, ChallengeId, ChallengeStageId,
    ContentId, LedgerEntryId, ModuleId, QuestionId, RedemptionId, RewardId, TrailId,
    TrailProgressId,
};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entity::{
    Alternative, AnswerRecord, Assessment, Certificate, CertificateDocument, Challenge,
    ChallengeStage, Content, ContentView, LedgerEntry, Module, Question, Redemption,
    RedemptionDetail, Reward, Trail, TrailItem, TrailProgress,
};
use crate::domain::repository::{
    AssessmentRepository, CertificateRepository, ChallengeRepository, CurriculumRepository,
    LearningTx, RewardRepository, UnitOfWork,
};
use crate::domain::value_object::{LedgerEvent, RedemptionStatus};
use crate::error::{LearningError, LearningResult};

/// PostgreSQL-backed learning store
#[derive(Clone)]
pub struct PgLearningStore {
    pool: PgPool,
}

impl PgLearningStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MODULE_COLUMNS: &str = "id, name, description, manager_id, created_at, updated_at";

const CONTENT_COLUMNS: &str = r#"
    id,
    module_id,
    kind,
    title,
    description,
    video_url,
    document_url,
    position,
    created_at,
    updated_at
"#;

const TRAIL_COLUMNS: &str = "id, name, description, manager_id, created_at, updated_at";

const PROGRESS_COLUMNS: &str =
    "id, account_id, trail_id, percent, started_at, finished_at, finished";

const ASSESSMENT_COLUMNS: &str = r#"
    id,
    title,
    description,
    content_id,
    trail_id,
    stage_id,
    manager_id,
    created_at,
    updated_at
"#;

const CHALLENGE_COLUMNS: &str = "id, name, description, manager_id, created_at, updated_at";

const REWARD_COLUMNS: &str = r#"
    id,
    name,
    description,
    cost,
    kind,
    quantity,
    manager_id,
    created_at,
    updated_at
"#;

const REDEMPTION_DETAIL_SELECT: &str = r#"
    SELECT
        r.id AS redemption_id,
        r.account_id,
        r.redeemed_at,
        r.status,
        rw.id,
        rw.name,
        rw.description,
        rw.cost,
        rw.kind,
        rw.quantity,
        rw.manager_id,
        rw.created_at,
        rw.updated_at
    FROM redemptions r
    JOIN rewards rw ON rw.id = r.reward_id
"#;

const LEDGER_COLUMNS: &str =
    "id, account_id, event, reference_id, amount, description, occurred_at";

const CERTIFICATE_COLUMNS: &str = "id, account_id, trail_id, issued_at";

// ============================================================================
// Curriculum Repository Implementation
// ============================================================================

impl CurriculumRepository for PgLearningStore {
    async fn list_modules(&self) -> LearningResult<Vec<Module>> {
        let rows = sqlx::query_as::<_, ModuleRow>(&format!(
            "SELECT {} FROM modules ORDER BY name",
            MODULE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ModuleRow::into_module).collect())
    }

    async fn find_module(&self, id: ModuleId) -> LearningResult<Option<Module>> {
        let row = sqlx::query_as::<_, ModuleRow>(&format!(
            "SELECT {} FROM modules WHERE id = $1",
            MODULE_COLUMNS
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ModuleRow::into_module))
    }

    async fn create_module(&self, module: &Module) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO modules (id, name, description, manager_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(module.id.into_uuid())
        .bind(&module.name)
        .bind(&module.description)
        .bind(module.manager_id.into_uuid())
        .bind(module.created_at)
        .bind(module.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_module(&self, module: &Module) -> LearningResult<()> {
        sqlx::query("UPDATE modules SET name = $2, description = $3, updated_at = $4 WHERE id = $1")
            .bind(module.id.into_uuid())
            .bind(&module.name)
            .bind(&module.description)
            .bind(module.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn module_in_use(&self, id: ModuleId) -> LearningResult<bool> {
        let in_use = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM contents WHERE module_id = $1)
                OR EXISTS(SELECT 1 FROM trail_items WHERE module_id = $1)
            "#,
        )
        .bind(id.into_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(in_use)
    }

    async fn delete_module(&self, id: ModuleId) -> LearningResult<bool> {
        let deleted = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_contents(&self) -> LearningResult<Vec<Content>> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {} FROM contents ORDER BY module_id, position",
            CONTENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ContentRow::into_content).collect())
    }

    async fn list_contents_by_module(&self, module_id: ModuleId) -> LearningResult<Vec<Content>> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {} FROM contents WHERE module_id = $1 ORDER BY position",
            CONTENT_COLUMNS
        ))
        .bind(module_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ContentRow::into_content).collect())
    }

    async fn find_content(&self, id: ContentId) -> LearningResult<Option<Content>> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {} FROM contents WHERE id = $1",
            CONTENT_COLUMNS
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ContentRow::into_content))
    }

    async fn create_content(&self, content: &Content) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contents (
                id,
                module_id,
                kind,
                title,
                description,
                video_url,
                document_url,
                position,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(content.id.into_uuid())
        .bind(content.module_id.into_uuid())
        .bind(&content.kind)
        .bind(&content.title)
        .bind(&content.description)
        .bind(&content.video_url)
        .bind(&content.document_url)
        .bind(content.position)
        .bind(content.created_at)
        .bind(content.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_content(&self, content: &Content) -> LearningResult<()> {
        sqlx::query(
            r#"
            UPDATE contents SET
                module_id = $2,
                kind = $3,
                title = $4,
                description = $5,
                video_url = $6,
                document_url = $7,
                position = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(content.id.into_uuid())
        .bind(content.module_id.into_uuid())
        .bind(&content.kind)
        .bind(&content.title)
        .bind(&content.description)
        .bind(&content.video_url)
        .bind(&content.document_url)
        .bind(content.position)
        .bind(content.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn content_in_use(&self, id: ContentId) -> LearningResult<bool> {
        let in_use = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM content_views WHERE content_id = $1)
                OR EXISTS(SELECT 1 FROM assessments WHERE content_id = $1)
            "#,
        )
        .bind(id.into_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(in_use)
    }

    async fn delete_content(&self, id: ContentId) -> LearningResult<bool> {
        let deleted = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_trails(&self) -> LearningResult<Vec<Trail>> {
        let rows = sqlx::query_as::<_, TrailRow>(&format!(
            "SELECT {} FROM trails ORDER BY name",
            TRAIL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TrailRow::into_trail).collect())
    }

    async fn find_trail(&self, id: TrailId) -> LearningResult<Option<Trail>> {
        let row = sqlx::query_as::<_, TrailRow>(&format!(
            "SELECT {} FROM trails WHERE id = $1",
            TRAIL_COLUMNS
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TrailRow::into_trail))
    }

    async fn trail_items(&self, trail_id: TrailId) -> LearningResult<Vec<TrailItem>> {
        let rows = sqlx::query_as::<_, TrailItemRow>(
            "SELECT trail_id, module_id, position FROM trail_items WHERE trail_id = $1 ORDER BY position",
        )
        .bind(trail_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TrailItemRow::into_item).collect())
    }

    async fn trail_has_progress(&self, trail_id: TrailId) -> LearningResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM trail_progress WHERE trail_id = $1)",
        )
        .bind(trail_id.into_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn trail_has_assessment(&self, trail_id: TrailId) -> LearningResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM assessments WHERE trail_id = $1)",
        )
        .bind(trail_id.into_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn trail_content_ids(&self, trail_id: TrailId) -> LearningResult<Vec<ContentId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT c.id
            FROM contents c
            JOIN trail_items ti ON ti.module_id = c.module_id
            WHERE ti.trail_id = $1
            "#,
        )
        .bind(trail_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(ContentId::from_uuid).collect())
    }

    async fn count_viewed(
        &self,
        account_id: AccountId,
        content_ids: &[ContentId],
    ) -> LearningResult<i64> {
        if content_ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<Uuid> = content_ids.iter().map(|id| id.into_uuid()).collect();

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM content_views WHERE account_id = $1 AND content_id = ANY($2)",
        )
        .bind(account_id.into_uuid())
        .bind(&ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn find_progress(
        &self,
        account_id: AccountId,
        trail_id: TrailId,
    ) -> LearningResult<Option<TrailProgress>> {
        let row = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {} FROM trail_progress WHERE account_id = $1 AND trail_id = $2",
            PROGRESS_COLUMNS
        ))
        .bind(account_id.into_uuid())
        .bind(trail_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProgressRow::into_progress))
    }

    async fn insert_progress(&self, progress: &TrailProgress) -> LearningResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO trail_progress (
                id,
                account_id,
                trail_id,
                percent,
                started_at,
                finished_at,
                finished
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (account_id, trail_id) DO NOTHING
            "#,
        )
        .bind(progress.id.into_uuid())
        .bind(progress.account_id.into_uuid())
        .bind(progress.trail_id.into_uuid())
        .bind(progress.percent)
        .bind(progress.started_at)
        .bind(progress.finished_at)
        .bind(progress.finished)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }

    async fn update_progress(&self, progress: &TrailProgress) -> LearningResult<()> {
        sqlx::query(
            "UPDATE trail_progress SET percent = $2, finished_at = $3, finished = $4 WHERE id = $1",
        )
        .bind(progress.id.into_uuid())
        .bind(progress.percent)
        .bind(progress.finished_at)
        .bind(progress.finished)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Assessment Repository Implementation
// ============================================================================

impl AssessmentRepository for PgLearningStore {
    async fn list_assessments(&self) -> LearningResult<Vec<Assessment>> {
        let rows = sqlx::query_as::<_, AssessmentRow>(&format!(
            "SELECT {} FROM assessments ORDER BY created_at",
            ASSESSMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AssessmentRow::into_assessment).collect())
    }

    async fn find_assessment(&self, id: AssessmentId) -> LearningResult<Option<Assessment>> {
        let row = sqlx::query_as::<_, AssessmentRow>(&format!(
            "SELECT {} FROM assessments WHERE id = $1",
            ASSESSMENT_COLUMNS
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AssessmentRow::into_assessment))
    }

    async fn create_assessment(&self, assessment: &Assessment) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO assessments (
                id,
                title,
                description,
                content_id,
                trail_id,
                stage_id,
                manager_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(assessment.id.into_uuid())
        .bind(&assessment.title)
        .bind(&assessment.description)
        .bind(assessment.content_id.map(ContentId::into_uuid))
        .bind(assessment.trail_id.map(TrailId::into_uuid))
        .bind(assessment.stage_id.map(ChallengeStageId::into_uuid))
        .bind(assessment.manager_id.into_uuid())
        .bind(assessment.created_at)
        .bind(assessment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_assessment(&self, assessment: &Assessment) -> LearningResult<()> {
        sqlx::query(
            r#"
            UPDATE assessments SET
                title = $2,
                description = $3,
                content_id = $4,
                trail_id = $5,
                stage_id = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(assessment.id.into_uuid())
        .bind(&assessment.title)
        .bind(&assessment.description)
        .bind(assessment.content_id.map(ContentId::into_uuid))
        .bind(assessment.trail_id.map(TrailId::into_uuid))
        .bind(assessment.stage_id.map(ChallengeStageId::into_uuid))
        .bind(assessment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_questions(&self, assessment_id: AssessmentId) -> LearningResult<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, assessment_id, text, created_at
            FROM questions
            WHERE assessment_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(assessment_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(QuestionRow::into_question).collect())
    }

    async fn find_question(&self, id: QuestionId) -> LearningResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, assessment_id, text, created_at FROM questions WHERE id = $1",
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(QuestionRow::into_question))
    }

    async fn update_question(&self, question: &Question) -> LearningResult<()> {
        sqlx::query("UPDATE questions SET text = $2 WHERE id = $1")
            .bind(question.id.into_uuid())
            .bind(&question.text)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_alternatives(&self, question_id: QuestionId) -> LearningResult<Vec<Alternative>> {
        let rows = sqlx::query_as::<_, AlternativeRow>(
            "SELECT id, question_id, text, correct FROM alternatives WHERE question_id = $1 ORDER BY id",
        )
        .bind(question_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AlternativeRow::into_alternative).collect())
    }

    async fn assessment_alternatives(
        &self,
        assessment_id: AssessmentId,
    ) -> LearningResult<Vec<Alternative>> {
        let rows = sqlx::query_as::<_, AlternativeRow>(
            r#"
            SELECT a.id, a.question_id, a.text, a.correct
            FROM alternatives a
            JOIN questions q ON q.id = a.question_id
            WHERE q.assessment_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(assessment_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AlternativeRow::into_alternative).collect())
    }

    async fn find_alternative(&self, id: AlternativeId) -> LearningResult<Option<Alternative>> {
        let row = sqlx::query_as::<_, AlternativeRow>(
            "SELECT id, question_id, text, correct FROM alternatives WHERE id = $1",
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AlternativeRow::into_alternative))
    }

    async fn create_alternative(&self, alternative: &Alternative) -> LearningResult<()> {
        sqlx::query(
            "INSERT INTO alternatives (id, question_id, text, correct) VALUES ($1, $2, $3, $4)",
        )
        .bind(alternative.id.into_uuid())
        .bind(alternative.question_id.into_uuid())
        .bind(&alternative.text)
        .bind(alternative.correct)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_alternative(&self, alternative: &Alternative) -> LearningResult<()> {
        sqlx::query("UPDATE alternatives SET text = $2, correct = $3 WHERE id = $1")
            .bind(alternative.id.into_uuid())
            .bind(&alternative.text)
            .bind(alternative.correct)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Challenge Repository Implementation
// ============================================================================

impl ChallengeRepository for PgLearningStore {
    async fn list_challenges(&self) -> LearningResult<Vec<Challenge>> {
        let rows = sqlx::query_as::<_, ChallengeRow>(&format!(
            "SELECT {} FROM challenges ORDER BY name",
            CHALLENGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ChallengeRow::into_challenge).collect())
    }

    async fn find_challenge(&self, id: ChallengeId) -> LearningResult<Option<Challenge>> {
        let row = sqlx::query_as::<_, ChallengeRow>(&format!(
            "SELECT {} FROM challenges WHERE id = $1",
            CHALLENGE_COLUMNS
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ChallengeRow::into_challenge))
    }

    async fn create_challenge(&self, challenge: &Challenge) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO challenges (id, name, description, manager_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(challenge.id.into_uuid())
        .bind(&challenge.name)
        .bind(&challenge.description)
        .bind(challenge.manager_id.into_uuid())
        .bind(challenge.created_at)
        .bind(challenge.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_challenge(&self, challenge: &Challenge) -> LearningResult<()> {
        sqlx::query(
            "UPDATE challenges SET name = $2, description = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(challenge.id.into_uuid())
        .bind(&challenge.name)
        .bind(&challenge.description)
        .bind(challenge.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_stages(&self, challenge_id: ChallengeId) -> LearningResult<Vec<ChallengeStage>> {
        let rows = sqlx::query_as::<_, StageRow>(
            r#"
            SELECT id, challenge_id, assessment_id, position
            FROM challenge_stages
            WHERE challenge_id = $1
            ORDER BY position
            "#,
        )
        .bind(challenge_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StageRow::into_stage).collect())
    }

    async fn find_stage(&self, id: ChallengeStageId) -> LearningResult<Option<ChallengeStage>> {
        let row = sqlx::query_as::<_, StageRow>(
            "SELECT id, challenge_id, assessment_id, position FROM challenge_stages WHERE id = $1",
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StageRow::into_stage))
    }

    async fn create_stage(&self, stage: &ChallengeStage) -> LearningResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO challenge_stages (id, challenge_id, assessment_id, position)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(stage.id.into_uuid())
        .bind(stage.challenge_id.into_uuid())
        .bind(stage.assessment_id.into_uuid())
        .bind(stage.position)
        .execute(&self.pool)
        .await;

        stage_write(result)
    }

    async fn update_stage(&self, stage: &ChallengeStage) -> LearningResult<()> {
        let result = sqlx::query(
            "UPDATE challenge_stages SET assessment_id = $2, position = $3 WHERE id = $1",
        )
        .bind(stage.id.into_uuid())
        .bind(stage.assessment_id.into_uuid())
        .bind(stage.position)
        .execute(&self.pool)
        .await;

        stage_write(result)
    }

    async fn delete_stage(&self, id: ChallengeStageId) -> LearningResult<bool> {
        let deleted = sqlx::query("DELETE FROM challenge_stages WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

/// The only unique key on stages is (challenge_id, position)
fn stage_write(
    result: Result<sqlx::postgres::PgQueryResult, sqlx::Error>,
) -> LearningResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            Err(LearningError::DuplicateStageOrder)
        }
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Reward Repository Implementation
// ============================================================================

impl RewardRepository for PgLearningStore {
    async fn list_rewards(&self) -> LearningResult<Vec<Reward>> {
        let rows = sqlx::query_as::<_, RewardRow>(&format!(
            "SELECT {} FROM rewards ORDER BY cost, name",
            REWARD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RewardRow::into_reward).collect())
    }

    async fn find_reward(&self, id: RewardId) -> LearningResult<Option<Reward>> {
        let row = sqlx::query_as::<_, RewardRow>(&format!(
            "SELECT {} FROM rewards WHERE id = $1",
            REWARD_COLUMNS
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RewardRow::into_reward))
    }

    async fn create_reward(&self, reward: &Reward) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rewards (
                id,
                name,
                description,
                cost,
                kind,
                quantity,
                manager_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(reward.id.into_uuid())
        .bind(&reward.name)
        .bind(&reward.description)
        .bind(reward.cost)
        .bind(&reward.kind)
        .bind(reward.quantity)
        .bind(reward.manager_id.into_uuid())
        .bind(reward.created_at)
        .bind(reward.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn reward_has_redemptions(&self, id: RewardId) -> LearningResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM redemptions WHERE reward_id = $1)",
        )
        .bind(id.into_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn delete_reward(&self, id: RewardId) -> LearningResult<bool> {
        let deleted = sqlx::query("DELETE FROM rewards WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn account_redemptions(
        &self,
        account_id: AccountId,
    ) -> LearningResult<Vec<RedemptionDetail>> {
        let rows = sqlx::query_as::<_, RedemptionDetailRow>(&format!(
            "{} WHERE r.account_id = $1 ORDER BY r.redeemed_at DESC",
            REDEMPTION_DETAIL_SELECT
        ))
        .bind(account_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RedemptionDetailRow::into_detail).collect()
    }

    async fn find_redemption(&self, id: RedemptionId) -> LearningResult<Option<RedemptionDetail>> {
        let row = sqlx::query_as::<_, RedemptionDetailRow>(&format!(
            "{} WHERE r.id = $1",
            REDEMPTION_DETAIL_SELECT
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RedemptionDetailRow::into_detail).transpose()
    }

    async fn coin_balance(&self, account_id: AccountId) -> LearningResult<i64> {
        let balance = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM coin_entries WHERE account_id = $1",
        )
        .bind(account_id.into_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    async fn coin_history(&self, account_id: AccountId) -> LearningResult<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerRow>(&format!(
            "SELECT {} FROM coin_entries WHERE account_id = $1 ORDER BY occurred_at DESC",
            LEDGER_COLUMNS
        ))
        .bind(account_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LedgerRow::into_entry).collect()
    }

    async fn account_exists(&self, account_id: AccountId) -> LearningResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
                .bind(account_id.into_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

// ============================================================================
// Certificate Repository Implementation
// ============================================================================

impl CertificateRepository for PgLearningStore {
    async fn list_certificates(&self) -> LearningResult<Vec<Certificate>> {
        let rows = sqlx::query_as::<_, CertificateRow>(&format!(
            "SELECT {} FROM certificates ORDER BY issued_at DESC",
            CERTIFICATE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CertificateRow::into_certificate).collect())
    }

    async fn account_certificates(
        &self,
        account_id: AccountId,
    ) -> LearningResult<Vec<Certificate>> {
        let rows = sqlx::query_as::<_, CertificateRow>(&format!(
            "SELECT {} FROM certificates WHERE account_id = $1 ORDER BY issued_at DESC",
            CERTIFICATE_COLUMNS
        ))
        .bind(account_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CertificateRow::into_certificate).collect())
    }

    async fn find_certificate(&self, id: CertificateId) -> LearningResult<Option<Certificate>> {
        let row = sqlx::query_as::<_, CertificateRow>(&format!(
            "SELECT {} FROM certificates WHERE id = $1",
            CERTIFICATE_COLUMNS
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CertificateRow::into_certificate))
    }

    async fn certificate_document(
        &self,
        id: CertificateId,
    ) -> LearningResult<Option<CertificateDocument>> {
        let row = sqlx::query_as::<_, CertificateDocumentRow>(
            r#"
            SELECT
                c.id,
                c.account_id,
                c.trail_id,
                c.issued_at,
                t.name AS trail_name,
                t.description AS trail_description,
                a.name AS holder_name,
                a.enrollment_id AS holder_enrollment_id,
                a.sector AS holder_sector
            FROM certificates c
            JOIN trails t ON t.id = c.trail_id
            JOIN accounts a ON a.id = c.account_id
            WHERE c.id = $1
            "#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CertificateDocumentRow::into_document))
    }
}

// ============================================================================
// Unit of Work Implementation
// ============================================================================

impl UnitOfWork for PgLearningStore {
    type Tx = PgLearningTx;

    async fn begin(&self) -> LearningResult<PgLearningTx> {
        let tx = self.pool.begin().await?;
        Ok(PgLearningTx { tx })
    }
}

/// Open transaction; rolled back by sqlx when dropped uncommitted
pub struct PgLearningTx {
    tx: Transaction<'static, Postgres>,
}

impl LearningTx for PgLearningTx {
    async fn lock_account(&mut self, id: AccountId) -> LearningResult<bool> {
        let row = sqlx::query_scalar::<_, Uuid>("SELECT id FROM accounts WHERE id = $1 FOR UPDATE")
            .bind(id.into_uuid())
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.is_some())
    }

    async fn lock_reward(&mut self, id: RewardId) -> LearningResult<Option<Reward>> {
        let row = sqlx::query_as::<_, RewardRow>(&format!(
            "SELECT {} FROM rewards WHERE id = $1 FOR UPDATE",
            REWARD_COLUMNS
        ))
        .bind(id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(RewardRow::into_reward))
    }

    async fn lock_redemption(&mut self, id: RedemptionId) -> LearningResult<Option<Redemption>> {
        let row = sqlx::query_as::<_, RedemptionRow>(
            r#"
            SELECT id, account_id, reward_id, redeemed_at, status
            FROM redemptions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(RedemptionRow::into_redemption).transpose()
    }

    async fn lock_question(&mut self, id: QuestionId) -> LearningResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, assessment_id, text, created_at FROM questions WHERE id = $1 FOR UPDATE",
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(QuestionRow::into_question))
    }

    async fn coin_balance(&mut self, account_id: AccountId) -> LearningResult<i64> {
        let balance = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM coin_entries WHERE account_id = $1",
        )
        .bind(account_id.into_uuid())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(balance)
    }

    async fn insert_view(&mut self, view: &ContentView) -> LearningResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO content_views (account_id, content_id, viewed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id, content_id) DO NOTHING
            "#,
        )
        .bind(view.account_id.into_uuid())
        .bind(view.content_id.into_uuid())
        .bind(view.viewed_at)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }

    async fn insert_answer(&mut self, answer: &AnswerRecord) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO assessment_answers (id, account_id, alternative_id, answered_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(answer.id)
        .bind(answer.account_id.into_uuid())
        .bind(answer.alternative_id.into_uuid())
        .bind(answer.answered_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn append_points(&mut self, entry: &LedgerEntry) -> LearningResult<()> {
        insert_ledger_entry(&mut self.tx, "point_entries", entry).await?;

        sqlx::query("UPDATE accounts SET points = points + $2 WHERE id = $1")
            .bind(entry.account_id.into_uuid())
            .bind(entry.amount)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn append_coins(&mut self, entry: &LedgerEntry) -> LearningResult<()> {
        insert_ledger_entry(&mut self.tx, "coin_entries", entry).await
    }

    async fn insert_redemption(&mut self, redemption: &Redemption) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO redemptions (id, account_id, reward_id, redeemed_at, status)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(redemption.id.into_uuid())
        .bind(redemption.account_id.into_uuid())
        .bind(redemption.reward_id.into_uuid())
        .bind(redemption.redeemed_at)
        .bind(redemption.status.code())
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn update_redemption_status(
        &mut self,
        id: RedemptionId,
        status: RedemptionStatus,
    ) -> LearningResult<()> {
        sqlx::query("UPDATE redemptions SET status = $2 WHERE id = $1")
            .bind(id.into_uuid())
            .bind(status.code())
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn update_reward(&mut self, reward: &Reward) -> LearningResult<()> {
        sqlx::query(
            r#"
            UPDATE rewards SET
                name = $2,
                description = $3,
                cost = $4,
                kind = $5,
                quantity = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(reward.id.into_uuid())
        .bind(&reward.name)
        .bind(&reward.description)
        .bind(reward.cost)
        .bind(&reward.kind)
        .bind(reward.quantity)
        .bind(reward.updated_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn set_reward_quantity(
        &mut self,
        id: RewardId,
        quantity: Option<i64>,
    ) -> LearningResult<()> {
        sqlx::query("UPDATE rewards SET quantity = $2, updated_at = $3 WHERE id = $1")
            .bind(id.into_uuid())
            .bind(quantity)
            .bind(Utc::now())
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn find_progress(
        &mut self,
        account_id: AccountId,
        trail_id: TrailId,
    ) -> LearningResult<Option<TrailProgress>> {
        let row = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {} FROM trail_progress WHERE account_id = $1 AND trail_id = $2",
            PROGRESS_COLUMNS
        ))
        .bind(account_id.into_uuid())
        .bind(trail_id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(ProgressRow::into_progress))
    }

    async fn find_certificate(
        &mut self,
        account_id: AccountId,
        trail_id: TrailId,
    ) -> LearningResult<Option<Certificate>> {
        let row = sqlx::query_as::<_, CertificateRow>(&format!(
            "SELECT {} FROM certificates WHERE account_id = $1 AND trail_id = $2",
            CERTIFICATE_COLUMNS
        ))
        .bind(account_id.into_uuid())
        .bind(trail_id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(CertificateRow::into_certificate))
    }

    async fn insert_certificate(&mut self, certificate: &Certificate) -> LearningResult<()> {
        sqlx::query(
            "INSERT INTO certificates (id, account_id, trail_id, issued_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(certificate.id.into_uuid())
        .bind(certificate.account_id.into_uuid())
        .bind(certificate.trail_id.into_uuid())
        .bind(certificate.issued_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn insert_trail(&mut self, trail: &Trail, items: &[TrailItem]) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO trails (id, name, description, manager_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(trail.id.into_uuid())
        .bind(&trail.name)
        .bind(&trail.description)
        .bind(trail.manager_id.into_uuid())
        .bind(trail.created_at)
        .bind(trail.updated_at)
        .execute(&mut *self.tx)
        .await?;

        insert_trail_items(&mut self.tx, items).await
    }

    async fn update_trail(
        &mut self,
        trail: &Trail,
        items: Option<&[TrailItem]>,
    ) -> LearningResult<()> {
        sqlx::query("UPDATE trails SET name = $2, description = $3, updated_at = $4 WHERE id = $1")
            .bind(trail.id.into_uuid())
            .bind(&trail.name)
            .bind(&trail.description)
            .bind(trail.updated_at)
            .execute(&mut *self.tx)
            .await?;

        if let Some(items) = items {
            sqlx::query("DELETE FROM trail_items WHERE trail_id = $1")
                .bind(trail.id.into_uuid())
                .execute(&mut *self.tx)
                .await?;
            insert_trail_items(&mut self.tx, items).await?;
        }

        Ok(())
    }

    async fn delete_trail(&mut self, id: TrailId) -> LearningResult<bool> {
        sqlx::query("DELETE FROM trail_items WHERE trail_id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM trails WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn insert_question(
        &mut self,
        question: &Question,
        alternatives: &[Alternative],
    ) -> LearningResult<()> {
        sqlx::query(
            "INSERT INTO questions (id, assessment_id, text, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(question.id.into_uuid())
        .bind(question.assessment_id.into_uuid())
        .bind(&question.text)
        .bind(question.created_at)
        .execute(&mut *self.tx)
        .await?;

        for alternative in alternatives {
            sqlx::query(
                "INSERT INTO alternatives (id, question_id, text, correct) VALUES ($1, $2, $3, $4)",
            )
            .bind(alternative.id.into_uuid())
            .bind(alternative.question_id.into_uuid())
            .bind(&alternative.text)
            .bind(alternative.correct)
            .execute(&mut *self.tx)
            .await?;
        }

        Ok(())
    }

    async fn count_alternatives(&mut self, question_id: QuestionId) -> LearningResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM alternatives WHERE question_id = $1")
                .bind(question_id.into_uuid())
                .fetch_one(&mut *self.tx)
                .await?;

        Ok(count)
    }

    async fn delete_alternative(&mut self, id: AlternativeId) -> LearningResult<bool> {
        sqlx::query("DELETE FROM assessment_answers WHERE alternative_id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM alternatives WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn delete_question(&mut self, id: QuestionId) -> LearningResult<bool> {
        sqlx::query(
            r#"
            DELETE FROM assessment_answers
            WHERE alternative_id IN (SELECT id FROM alternatives WHERE question_id = $1)
            "#,
        )
        .bind(id.into_uuid())
        .execute(&mut *self.tx)
        .await?;

        sqlx::query("DELETE FROM alternatives WHERE question_id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn delete_assessment(&mut self, id: AssessmentId) -> LearningResult<bool> {
        sqlx::query(
            r#"
            DELETE FROM assessment_answers
            WHERE alternative_id IN (
                SELECT a.id
                FROM alternatives a
                JOIN questions q ON q.id = a.question_id
                WHERE q.assessment_id = $1
            )
            "#,
        )
        .bind(id.into_uuid())
        .execute(&mut *self.tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM alternatives
            WHERE question_id IN (SELECT id FROM questions WHERE assessment_id = $1)
            "#,
        )
        .bind(id.into_uuid())
        .execute(&mut *self.tx)
        .await?;

        sqlx::query("DELETE FROM questions WHERE assessment_id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM assessments WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn delete_challenge(&mut self, id: ChallengeId) -> LearningResult<bool> {
        sqlx::query("DELETE FROM challenge_stages WHERE challenge_id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM challenges WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn commit(self) -> LearningResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

async fn insert_ledger_entry(
    tx: &mut Transaction<'static, Postgres>,
    table: &str,
    entry: &LedgerEntry,
) -> LearningResult<()> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, account_id, event, reference_id, amount, description, occurred_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
        table
    ))
    .bind(entry.id.into_uuid())
    .bind(entry.account_id.into_uuid())
    .bind(entry.event.code())
    .bind(entry.reference_id)
    .bind(entry.amount)
    .bind(&entry.description)
    .bind(entry.occurred_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_trail_items(
    tx: &mut Transaction<'static, Postgres>,
    items: &[TrailItem],
) -> LearningResult<()> {
    for item in items {
        sqlx::query("INSERT INTO trail_items (trail_id, module_id, position) VALUES ($1, $2, $3)")
            .bind(item.trail_id.into_uuid())
            .bind(item.module_id.into_uuid())
            .bind(item.position)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ModuleRow {
    id: Uuid,
    name: String,
    description: String,
    manager_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ModuleRow {
    fn into_module(self) -> Module {
        Module {
            id: ModuleId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            manager_id: AccountId::from_uuid(self.manager_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    module_id: Uuid,
    kind: String,
    title: String,
    description: String,
    video_url: String,
    document_url: Option<String>,
    position: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ContentRow {
    fn into_content(self) -> Content {
        Content {
            id: ContentId::from_uuid(self.id),
            module_id: ModuleId::from_uuid(self.module_id),
            kind: self.kind,
            title: self.title,
            description: self.description,
            video_url: self.video_url,
            document_url: self.document_url,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TrailRow {
    id: Uuid,
    name: String,
    description: String,
    manager_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TrailRow {
    fn into_trail(self) -> Trail {
        Trail {
            id: TrailId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            manager_id: AccountId::from_uuid(self.manager_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TrailItemRow {
    trail_id: Uuid,
    module_id: Uuid,
    position: i32,
}

impl TrailItemRow {
    fn into_item(self) -> TrailItem {
        TrailItem {
            trail_id: TrailId::from_uuid(self.trail_id),
            module_id: ModuleId::from_uuid(self.module_id),
            position: self.position,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProgressRow {
    id: Uuid,
    account_id: Uuid,
    trail_id: Uuid,
    percent: i32,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    finished: bool,
}

impl ProgressRow {
    fn into_progress(self) -> TrailProgress {
        TrailProgress {
            id: TrailProgressId::from_uuid(self.id),
            account_id: AccountId::from_uuid(self.account_id),
            trail_id: TrailId::from_uuid(self.trail_id),
            percent: self.percent,
            started_at: self.started_at,
            finished_at: self.finished_at,
            finished: self.finished,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AssessmentRow {
    id: Uuid,
    title: String,
    description: String,
    content_id: Option<Uuid>,
    trail_id: Option<Uuid>,
    stage_id: Option<Uuid>,
    manager_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssessmentRow {
    fn into_assessment(self) -> Assessment {
        Assessment {
            id: AssessmentId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            content_id: self.content_id.map(ContentId::from_uuid),
            trail_id: self.trail_id.map(TrailId::from_uuid),
            stage_id: self.stage_id.map(ChallengeStageId::from_uuid),
            manager_id: AccountId::from_uuid(self.manager_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: Uuid,
    assessment_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
}

impl QuestionRow {
    fn into_question(self) -> Question {
        Question {
            id: QuestionId::from_uuid(self.id),
            assessment_id: AssessmentId::from_uuid(self.assessment_id),
            text: self.text,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AlternativeRow {
    id: Uuid,
    question_id: Uuid,
    text: String,
    correct: bool,
}

impl AlternativeRow {
    fn into_alternative(self) -> Alternative {
        Alternative {
            id: AlternativeId::from_uuid(self.id),
            question_id: QuestionId::from_uuid(self.question_id),
            text: self.text,
            correct: self.correct,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChallengeRow {
    id: Uuid,
    name: String,
    description: String,
    manager_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChallengeRow {
    fn into_challenge(self) -> Challenge {
        Challenge {
            id: ChallengeId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            manager_id: AccountId::from_uuid(self.manager_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StageRow {
    id: Uuid,
    challenge_id: Uuid,
    assessment_id: Uuid,
    position: i32,
}

impl StageRow {
    fn into_stage(self) -> ChallengeStage {
        ChallengeStage {
            id: ChallengeStageId::from_uuid(self.id),
            challenge_id: ChallengeId::from_uuid(self.challenge_id),
            assessment_id: AssessmentId::from_uuid(self.assessment_id),
            position: self.position,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RewardRow {
    id: Uuid,
    name: String,
    description: String,
    cost: i64,
    kind: String,
    quantity: Option<i64>,
    manager_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RewardRow {
    fn into_reward(self) -> Reward {
        Reward {
            id: RewardId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            cost: self.cost,
            kind: self.kind,
            quantity: self.quantity,
            manager_id: AccountId::from_uuid(self.manager_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RedemptionRow {
    id: Uuid,
    account_id: Uuid,
    reward_id: Uuid,
    redeemed_at: DateTime<Utc>,
    status: String,
}

impl RedemptionRow {
    fn into_redemption(self) -> LearningResult<Redemption> {
        Ok(Redemption {
            id: RedemptionId::from_uuid(self.id),
            account_id: AccountId::from_uuid(self.account_id),
            reward_id: RewardId::from_uuid(self.reward_id),
            redeemed_at: self.redeemed_at,
            status: parse_status(&self.status)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RedemptionDetailRow {
    redemption_id: Uuid,
    account_id: Uuid,
    redeemed_at: DateTime<Utc>,
    status: String,
    #[sqlx(flatten)]
    reward: RewardRow,
}

impl RedemptionDetailRow {
    fn into_detail(self) -> LearningResult<RedemptionDetail> {
        let reward = self.reward.into_reward();
        Ok(RedemptionDetail {
            redemption: Redemption {
                id: RedemptionId::from_uuid(self.redemption_id),
                account_id: AccountId::from_uuid(self.account_id),
                reward_id: reward.id,
                redeemed_at: self.redeemed_at,
                status: parse_status(&self.status)?,
            },
            reward,
        })
    }
}

fn parse_status(code: &str) -> LearningResult<RedemptionStatus> {
    RedemptionStatus::from_code(code)
        .ok_or_else(|| LearningError::Internal(format!("Invalid redemption status: {}", code)))
}

#[derive(sqlx::FromRow)]
struct LedgerRow {
    id: Uuid,
    account_id: Uuid,
    event: String,
    reference_id: Option<Uuid>,
    amount: i64,
    description: String,
    occurred_at: DateTime<Utc>,
}

impl LedgerRow {
    fn into_entry(self) -> LearningResult<LedgerEntry> {
        let event = LedgerEvent::from_code(&self.event)
            .ok_or_else(|| LearningError::Internal(format!("Invalid ledger event: {}", self.event)))?;

        Ok(LedgerEntry {
            id: LedgerEntryId::from_uuid(self.id),
            account_id: AccountId::from_uuid(self.account_id),
            event,
            reference_id: self.reference_id,
            amount: self.amount,
            description: self.description,
            occurred_at: self.occurred_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CertificateRow {
    id: Uuid,
    account_id: Uuid,
    trail_id: Uuid,
    issued_at: DateTime<Utc>,
}

impl CertificateRow {
    fn into_certificate(self) -> Certificate {
        Certificate {
            id: CertificateId::from_uuid(self.id),
            account_id: AccountId::from_uuid(self.account_id),
            trail_id: TrailId::from_uuid(self.trail_id),
            issued_at: self.issued_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CertificateDocumentRow {
    #[sqlx(flatten)]
    certificate: CertificateRow,
    trail_name: String,
    trail_description: String,
    holder_name: String,
    holder_enrollment_id: String,
    holder_sector: String,
}

impl CertificateDocumentRow {
    fn into_document(self) -> CertificateDocument {
        CertificateDocument {
            certificate: self.certificate.into_certificate(),
            trail_name: self.trail_name,
            trail_description: self.trail_description,
            holder_name: self.holder_name,
            holder_enrollment_id: self.holder_enrollment_id,
            holder_sector: self.holder_sector,
        }
    }
}
