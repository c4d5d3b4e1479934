//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Single-row reads and writes go through the per-area repositories.
//! Workflows that must commit several writes together open a [`LearningTx`]
//! through [`UnitOfWork::begin`]; dropping a transaction without calling
//! `commit` rolls it back.

use std::future::Future;

use kernel::id::{
    AccountId, AlternativeId, AssessmentId, CertificateId, ChallengeId, ChallengeStageId,
    ContentId, ModuleId, QuestionId, RedemptionId, RewardId, TrailId,
};

use crate::domain::entity::{
    Alternative, AnswerRecord, Assessment, Certificate, CertificateDocument, Challenge,
    ChallengeStage, Content, ContentView, LedgerEntry, Module, Question, Redemption,
    RedemptionDetail, Reward, Trail, TrailItem, TrailProgress,
};
use crate::domain::value_object::RedemptionStatus;
use crate::error::LearningResult;

// ============================================================================
// Curriculum
// ============================================================================

#[trait_variant::make(CurriculumRepository: Send)]
pub trait LocalCurriculumRepository {
    async fn list_modules(&self) -> LearningResult<Vec<Module>>;

    async fn find_module(&self, id: ModuleId) -> LearningResult<Option<Module>>;

    async fn create_module(&self, module: &Module) -> LearningResult<()>;

    async fn update_module(&self, module: &Module) -> LearningResult<()>;

    /// Contents or trail items still point at the module
    async fn module_in_use(&self, id: ModuleId) -> LearningResult<bool>;

    async fn delete_module(&self, id: ModuleId) -> LearningResult<bool>;

    async fn list_contents(&self) -> LearningResult<Vec<Content>>;

    /// Contents of one module ordered by position
    async fn list_contents_by_module(&self, module_id: ModuleId) -> LearningResult<Vec<Content>>;

    async fn find_content(&self, id: ContentId) -> LearningResult<Option<Content>>;

    async fn create_content(&self, content: &Content) -> LearningResult<()>;

    async fn update_content(&self, content: &Content) -> LearningResult<()>;

    /// Views or assessments still point at the content
    async fn content_in_use(&self, id: ContentId) -> LearningResult<bool>;

    async fn delete_content(&self, id: ContentId) -> LearningResult<bool>;

    async fn list_trails(&self) -> LearningResult<Vec<Trail>>;

    async fn find_trail(&self, id: TrailId) -> LearningResult<Option<Trail>>;

    /// Items of a trail ordered by position
    async fn trail_items(&self, trail_id: TrailId) -> LearningResult<Vec<TrailItem>>;

    async fn trail_has_progress(&self, trail_id: TrailId) -> LearningResult<bool>;

    /// A trail-level assessment exists
    async fn trail_has_assessment(&self, trail_id: TrailId) -> LearningResult<bool>;

    /// Every content id reachable through the trail's modules
    async fn trail_content_ids(&self, trail_id: TrailId) -> LearningResult<Vec<ContentId>>;

    /// How many of `content_ids` the account has viewed
    async fn count_viewed(
        &self,
        account_id: AccountId,
        content_ids: &[ContentId],
    ) -> LearningResult<i64>;

    async fn find_progress(
        &self,
        account_id: AccountId,
        trail_id: TrailId,
    ) -> LearningResult<Option<TrailProgress>>;

    /// Insert unless a row for (account, trail) exists; returns whether it was inserted
    async fn insert_progress(&self, progress: &TrailProgress) -> LearningResult<bool>;

    async fn update_progress(&self, progress: &TrailProgress) -> LearningResult<()>;
}

// ============================================================================
// Assessments
// ============================================================================

#[trait_variant::make(AssessmentRepository: Send)]
pub trait LocalAssessmentRepository {
    async fn list_assessments(&self) -> LearningResult<Vec<Assessment>>;

    async fn find_assessment(&self, id: AssessmentId) -> LearningResult<Option<Assessment>>;

    async fn create_assessment(&self, assessment: &Assessment) -> LearningResult<()>;

    async fn update_assessment(&self, assessment: &Assessment) -> LearningResult<()>;

    /// Questions of an assessment in creation order
    async fn list_questions(&self, assessment_id: AssessmentId) -> LearningResult<Vec<Question>>;

    async fn find_question(&self, id: QuestionId) -> LearningResult<Option<Question>>;

    async fn update_question(&self, question: &Question) -> LearningResult<()>;

    async fn list_alternatives(&self, question_id: QuestionId) -> LearningResult<Vec<Alternative>>;

    /// Alternatives of every question of an assessment
    async fn assessment_alternatives(
        &self,
        assessment_id: AssessmentId,
    ) -> LearningResult<Vec<Alternative>>;

    async fn find_alternative(&self, id: AlternativeId) -> LearningResult<Option<Alternative>>;

    async fn create_alternative(&self, alternative: &Alternative) -> LearningResult<()>;

    async fn update_alternative(&self, alternative: &Alternative) -> LearningResult<()>;
}

// ============================================================================
// Challenges
// ============================================================================

#[trait_variant::make(ChallengeRepository: Send)]
pub trait LocalChallengeRepository {
    async fn list_challenges(&self) -> LearningResult<Vec<Challenge>>;

    async fn find_challenge(&self, id: ChallengeId) -> LearningResult<Option<Challenge>>;

    async fn create_challenge(&self, challenge: &Challenge) -> LearningResult<()>;

    async fn update_challenge(&self, challenge: &Challenge) -> LearningResult<()>;

    /// Stages of a challenge ordered by position
    async fn list_stages(&self, challenge_id: ChallengeId) -> LearningResult<Vec<ChallengeStage>>;

    async fn find_stage(&self, id: ChallengeStageId) -> LearningResult<Option<ChallengeStage>>;

    /// Fails with `DuplicateStageOrder` when the position is taken
    async fn create_stage(&self, stage: &ChallengeStage) -> LearningResult<()>;

    /// Fails with `DuplicateStageOrder` when the position is taken
    async fn update_stage(&self, stage: &ChallengeStage) -> LearningResult<()>;

    async fn delete_stage(&self, id: ChallengeStageId) -> LearningResult<bool>;
}

// ============================================================================
// Rewards
// ============================================================================

#[trait_variant::make(RewardRepository: Send)]
pub trait LocalRewardRepository {
    async fn list_rewards(&self) -> LearningResult<Vec<Reward>>;

    async fn find_reward(&self, id: RewardId) -> LearningResult<Option<Reward>>;

    async fn create_reward(&self, reward: &Reward) -> LearningResult<()>;

    async fn reward_has_redemptions(&self, id: RewardId) -> LearningResult<bool>;

    async fn delete_reward(&self, id: RewardId) -> LearningResult<bool>;

    /// Redemptions of one account, newest first, with their rewards
    async fn account_redemptions(
        &self,
        account_id: AccountId,
    ) -> LearningResult<Vec<RedemptionDetail>>;

    async fn find_redemption(&self, id: RedemptionId) -> LearningResult<Option<RedemptionDetail>>;

    /// Sum of every coin ledger delta of the account
    async fn coin_balance(&self, account_id: AccountId) -> LearningResult<i64>;

    /// Coin ledger of the account, newest first
    async fn coin_history(&self, account_id: AccountId) -> LearningResult<Vec<LedgerEntry>>;

    async fn account_exists(&self, account_id: AccountId) -> LearningResult<bool>;
}

// ============================================================================
// Certificates
// ============================================================================

#[trait_variant::make(CertificateRepository: Send)]
pub trait LocalCertificateRepository {
    async fn list_certificates(&self) -> LearningResult<Vec<Certificate>>;

    async fn account_certificates(&self, account_id: AccountId)
    -> LearningResult<Vec<Certificate>>;

    async fn find_certificate(&self, id: CertificateId) -> LearningResult<Option<Certificate>>;

    /// Certificate joined with its trail and holder
    async fn certificate_document(
        &self,
        id: CertificateId,
    ) -> LearningResult<Option<CertificateDocument>>;
}

// ============================================================================
// Unit of work
// ============================================================================

/// One open transaction
///
/// `lock_*` methods take a row lock held until commit or rollback, so
/// check-then-write sequences on the same row are serialized.
#[trait_variant::make(LearningTx: Send)]
pub trait LocalLearningTx {
    /// Lock the account row; false when the account does not exist
    async fn lock_account(&mut self, id: AccountId) -> LearningResult<bool>;

    async fn lock_reward(&mut self, id: RewardId) -> LearningResult<Option<Reward>>;

    async fn lock_redemption(&mut self, id: RedemptionId) -> LearningResult<Option<Redemption>>;

    async fn lock_question(&mut self, id: QuestionId) -> LearningResult<Option<Question>>;

    async fn coin_balance(&mut self, account_id: AccountId) -> LearningResult<i64>;

    /// Insert unless already viewed; returns whether it was inserted
    async fn insert_view(&mut self, view: &ContentView) -> LearningResult<bool>;

    async fn insert_answer(&mut self, answer: &AnswerRecord) -> LearningResult<()>;

    /// Append a point entry and add its amount to the cached account total
    async fn append_points(&mut self, entry: &LedgerEntry) -> LearningResult<()>;

    async fn append_coins(&mut self, entry: &LedgerEntry) -> LearningResult<()>;

    async fn insert_redemption(&mut self, redemption: &Redemption) -> LearningResult<()>;

    async fn update_redemption_status(
        &mut self,
        id: RedemptionId,
        status: RedemptionStatus,
    ) -> LearningResult<()>;

    /// Write every editable reward field; call after `lock_reward`
    async fn update_reward(&mut self, reward: &Reward) -> LearningResult<()>;

    async fn set_reward_quantity(
        &mut self,
        id: RewardId,
        quantity: Option<i64>,
    ) -> LearningResult<()>;

    async fn find_progress(
        &mut self,
        account_id: AccountId,
        trail_id: TrailId,
    ) -> LearningResult<Option<TrailProgress>>;

    async fn find_certificate(
        &mut self,
        account_id: AccountId,
        trail_id: TrailId,
    ) -> LearningResult<Option<Certificate>>;

    async fn insert_certificate(&mut self, certificate: &Certificate) -> LearningResult<()>;

    async fn insert_trail(&mut self, trail: &Trail, items: &[TrailItem]) -> LearningResult<()>;

    /// Update trail fields; `Some(items)` replaces the item list
    async fn update_trail(
        &mut self,
        trail: &Trail,
        items: Option<&[TrailItem]>,
    ) -> LearningResult<()>;

    /// Delete items then the trail
    async fn delete_trail(&mut self, id: TrailId) -> LearningResult<bool>;

    async fn insert_question(
        &mut self,
        question: &Question,
        alternatives: &[Alternative],
    ) -> LearningResult<()>;

    async fn count_alternatives(&mut self, question_id: QuestionId) -> LearningResult<i64>;

    /// Delete recorded answers then the alternative
    async fn delete_alternative(&mut self, id: AlternativeId) -> LearningResult<bool>;

    /// Delete answers, alternatives, then the question
    async fn delete_question(&mut self, id: QuestionId) -> LearningResult<bool>;

    /// Delete answers, alternatives, questions, then the assessment
    async fn delete_assessment(&mut self, id: AssessmentId) -> LearningResult<bool>;

    /// Delete stages then the challenge
    async fn delete_challenge(&mut self, id: ChallengeId) -> LearningResult<bool>;

    async fn commit(self) -> LearningResult<()>;
}

/// Opens transactions against the store
pub trait UnitOfWork: Send + Sync {
    type Tx: LearningTx + Send;

    fn begin(&self) -> impl Future<Output = LearningResult<Self::Tx>> + Send;
}

/// Everything the learning use cases and handlers need from a store
pub trait LearningStore:
    CurriculumRepository
    + AssessmentRepository
    + ChallengeRepository
    + RewardRepository
    + CertificateRepository
    + UnitOfWork
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> LearningStore for T where
    T: CurriculumRepository
        + AssessmentRepository
        + ChallengeRepository
        + RewardRepository
        + CertificateRepository
        + UnitOfWork
        + Clone
        + Send
        + Sync
        + 'static
{
}
