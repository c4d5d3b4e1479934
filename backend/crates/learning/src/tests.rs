//! Unit tests for Learning crate
//!
//! Use cases and the router run against an in-memory store whose
//! transactions hold the whole state until commit or drop.

#[cfg(test)]
pub(crate) mod support {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;
    use kernel::id::{
        AccountId, AlternativeId, AssessmentId, CertificateId, ChallengeId, ChallengeStageId,
        ContentId, LedgerEntryId, ModuleId, QuestionId, RedemptionId, RewardId, TrailId,
    };
    use tokio::sync::{Mutex, OwnedMutexGuard};

    use crate::application::{
        AlternativeInput, AssessmentInput, AssessmentUseCase, ContentInput, ContentUseCase,
        LearningConfig, ModuleInput, ModuleUseCase, QuestionInput, QuestionUseCase, RewardInput,
        RewardUseCase, TrailInput, TrailModuleInput, TrailUseCase,
    };
    use crate::domain::entity::{
        Alternative, AnswerRecord, Assessment, Certificate, CertificateDocument, Challenge,
        ChallengeStage, Content, ContentView, LedgerEntry, Module, Question, QuestionSheet,
        Redemption, RedemptionDetail, Reward, Trail, TrailItem, TrailProgress,
    };
    use crate::domain::repository::{
        AssessmentRepository, CertificateRepository, ChallengeRepository, CurriculumRepository,
        LearningTx, RewardRepository, UnitOfWork,
    };
    use crate::domain::value_object::{LedgerEvent, RedemptionStatus};
    use crate::error::{LearningError, LearningResult};

    pub const TEST_SECRET: &[u8] = b"test-secret-with-enough-entropy-0123456789";

    #[derive(Debug, Clone)]
    pub struct AccountRow {
        pub name: String,
        pub enrollment_id: String,
        pub sector: String,
        pub points: i64,
    }

    #[derive(Clone, Default)]
    pub struct State {
        accounts: HashMap<AccountId, AccountRow>,
        modules: HashMap<ModuleId, Module>,
        contents: HashMap<ContentId, Content>,
        views: Vec<ContentView>,
        trails: HashMap<TrailId, Trail>,
        trail_items: Vec<TrailItem>,
        progress: Vec<TrailProgress>,
        assessments: HashMap<AssessmentId, Assessment>,
        questions: Vec<Question>,
        alternatives: Vec<Alternative>,
        answers: Vec<AnswerRecord>,
        challenges: HashMap<ChallengeId, Challenge>,
        stages: Vec<ChallengeStage>,
        rewards: HashMap<RewardId, Reward>,
        redemptions: Vec<Redemption>,
        points: Vec<LedgerEntry>,
        coins: Vec<LedgerEntry>,
        certificates: Vec<Certificate>,
    }

    impl State {
        fn coin_balance(&self, account_id: AccountId) -> i64 {
            self.coins
                .iter()
                .filter(|e| e.account_id == account_id)
                .map(|e| e.amount)
                .sum()
        }

        fn redemption_detail(&self, redemption: &Redemption) -> Option<RedemptionDetail> {
            self.rewards
                .get(&redemption.reward_id)
                .map(|reward| RedemptionDetail {
                    redemption: redemption.clone(),
                    reward: reward.clone(),
                })
        }

        fn question_ids(&self, assessment_id: AssessmentId) -> Vec<QuestionId> {
            self.questions
                .iter()
                .filter(|q| q.assessment_id == assessment_id)
                .map(|q| q.id)
                .collect()
        }

        fn alternative_ids(&self, question_ids: &[QuestionId]) -> Vec<AlternativeId> {
            self.alternatives
                .iter()
                .filter(|a| question_ids.contains(&a.question_id))
                .map(|a| a.id)
                .collect()
        }
    }

    #[derive(Clone, Default)]
    pub struct MemoryLearningStore {
        state: Arc<Mutex<State>>,
        fail_coin_append: Arc<AtomicBool>,
    }

    impl MemoryLearningStore {
        /// Make the next coin ledger write inside a transaction fail
        pub fn fail_next_coin_append(&self) {
            self.fail_coin_append.store(true, Ordering::SeqCst);
        }

        /// Insert a bare account row
        pub async fn seed_account(&self, enrollment_id: &str) -> AccountId {
            let id = AccountId::new();
            self.state.lock().await.accounts.insert(
                id,
                AccountRow {
                    name: format!("Conta {}", enrollment_id),
                    enrollment_id: enrollment_id.to_string(),
                    sector: "TI".to_string(),
                    points: 0,
                },
            );
            id
        }

        /// Mirror an auth account so tokens minted for it resolve here
        pub async fn insert_account(&self, account: &auth::domain::entity::Account) {
            self.state.lock().await.accounts.insert(
                account.id,
                AccountRow {
                    name: account.name.clone(),
                    enrollment_id: account.enrollment_id.as_str().to_string(),
                    sector: account.sector.clone(),
                    points: account.points,
                },
            );
        }

        pub async fn grant_coins(&self, account_id: AccountId, amount: i64) {
            self.state.lock().await.coins.push(LedgerEntry {
                id: LedgerEntryId::new(),
                account_id,
                event: LedgerEvent::Certificate,
                reference_id: None,
                amount,
                description: "Saldo inicial".to_string(),
                occurred_at: Utc::now(),
            });
        }

        /// Cached point total on the account row
        pub async fn points_of(&self, account_id: AccountId) -> i64 {
            self.state
                .lock()
                .await
                .accounts
                .get(&account_id)
                .map(|a| a.points)
                .unwrap_or_default()
        }

        pub async fn point_entries(&self, account_id: AccountId) -> Vec<LedgerEntry> {
            self.state
                .lock()
                .await
                .points
                .iter()
                .filter(|e| e.account_id == account_id)
                .cloned()
                .collect()
        }

        pub async fn answer_count(&self, account_id: AccountId) -> usize {
            self.state
                .lock()
                .await
                .answers
                .iter()
                .filter(|a| a.account_id == account_id)
                .count()
        }

        pub async fn has_viewed(&self, account_id: AccountId, content_id: ContentId) -> bool {
            self.state
                .lock()
                .await
                .views
                .iter()
                .any(|v| v.account_id == account_id && v.content_id == content_id)
        }

        pub async fn redemption_count(&self) -> usize {
            self.state.lock().await.redemptions.len()
        }

        /// Question and alternative rows left, across every assessment
        pub async fn question_rows(&self) -> (usize, usize) {
            let state = self.state.lock().await;
            (state.questions.len(), state.alternatives.len())
        }
    }

    // ========================================================================
    // Repositories
    // ========================================================================

    impl CurriculumRepository for MemoryLearningStore {
        async fn list_modules(&self) -> LearningResult<Vec<Module>> {
            let mut modules: Vec<Module> =
                self.state.lock().await.modules.values().cloned().collect();
            modules.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(modules)
        }

        async fn find_module(&self, id: ModuleId) -> LearningResult<Option<Module>> {
            Ok(self.state.lock().await.modules.get(&id).cloned())
        }

        async fn create_module(&self, module: &Module) -> LearningResult<()> {
            self.state
                .lock()
                .await
                .modules
                .insert(module.id, module.clone());
            Ok(())
        }

        async fn update_module(&self, module: &Module) -> LearningResult<()> {
            self.create_module(module).await
        }

        async fn module_in_use(&self, id: ModuleId) -> LearningResult<bool> {
            let state = self.state.lock().await;
            Ok(state.contents.values().any(|c| c.module_id == id)
                || state.trail_items.iter().any(|i| i.module_id == id))
        }

        async fn delete_module(&self, id: ModuleId) -> LearningResult<bool> {
            Ok(self.state.lock().await.modules.remove(&id).is_some())
        }

        async fn list_contents(&self) -> LearningResult<Vec<Content>> {
            let mut contents: Vec<Content> =
                self.state.lock().await.contents.values().cloned().collect();
            contents.sort_by_key(|c| c.position);
            Ok(contents)
        }

        async fn list_contents_by_module(&self, module_id: ModuleId) -> LearningResult<Vec<Content>> {
            let mut contents: Vec<Content> = self
                .state
                .lock()
                .await
                .contents
                .values()
                .filter(|c| c.module_id == module_id)
                .cloned()
                .collect();
            contents.sort_by_key(|c| c.position);
            Ok(contents)
        }

        async fn find_content(&self, id: ContentId) -> LearningResult<Option<Content>> {
            Ok(self.state.lock().await.contents.get(&id).cloned())
        }

        async fn create_content(&self, content: &Content) -> LearningResult<()> {
            self.state
                .lock()
                .await
                .contents
                .insert(content.id, content.clone());
            Ok(())
        }

        async fn update_content(&self, content: &Content) -> LearningResult<()> {
            self.create_content(content).await
        }

        async fn content_in_use(&self, id: ContentId) -> LearningResult<bool> {
            let state = self.state.lock().await;
            Ok(state.views.iter().any(|v| v.content_id == id)
                || state
                    .assessments
                    .values()
                    .any(|a| a.content_id == Some(id)))
        }

        async fn delete_content(&self, id: ContentId) -> LearningResult<bool> {
            Ok(self.state.lock().await.contents.remove(&id).is_some())
        }

        async fn list_trails(&self) -> LearningResult<Vec<Trail>> {
            let mut trails: Vec<Trail> = self.state.lock().await.trails.values().cloned().collect();
            trails.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(trails)
        }

        async fn find_trail(&self, id: TrailId) -> LearningResult<Option<Trail>> {
            Ok(self.state.lock().await.trails.get(&id).cloned())
        }

        async fn trail_items(&self, trail_id: TrailId) -> LearningResult<Vec<TrailItem>> {
            let mut items: Vec<TrailItem> = self
                .state
                .lock()
                .await
                .trail_items
                .iter()
                .filter(|i| i.trail_id == trail_id)
                .copied()
                .collect();
            items.sort_by_key(|i| i.position);
            Ok(items)
        }

        async fn trail_has_progress(&self, trail_id: TrailId) -> LearningResult<bool> {
            Ok(self
                .state
                .lock()
                .await
                .progress
                .iter()
                .any(|p| p.trail_id == trail_id))
        }

        async fn trail_has_assessment(&self, trail_id: TrailId) -> LearningResult<bool> {
            Ok(self
                .state
                .lock()
                .await
                .assessments
                .values()
                .any(|a| a.trail_id == Some(trail_id)))
        }

        async fn trail_content_ids(&self, trail_id: TrailId) -> LearningResult<Vec<ContentId>> {
            let state = self.state.lock().await;
            let modules: Vec<ModuleId> = state
                .trail_items
                .iter()
                .filter(|i| i.trail_id == trail_id)
                .map(|i| i.module_id)
                .collect();
            Ok(state
                .contents
                .values()
                .filter(|c| modules.contains(&c.module_id))
                .map(|c| c.id)
                .collect())
        }

        async fn count_viewed(
            &self,
            account_id: AccountId,
            content_ids: &[ContentId],
        ) -> LearningResult<i64> {
            Ok(self
                .state
                .lock()
                .await
                .views
                .iter()
                .filter(|v| v.account_id == account_id && content_ids.contains(&v.content_id))
                .count() as i64)
        }

        async fn find_progress(
            &self,
            account_id: AccountId,
            trail_id: TrailId,
        ) -> LearningResult<Option<TrailProgress>> {
            Ok(self
                .state
                .lock()
                .await
                .progress
                .iter()
                .find(|p| p.account_id == account_id && p.trail_id == trail_id)
                .cloned())
        }

        async fn insert_progress(&self, progress: &TrailProgress) -> LearningResult<bool> {
            let mut state = self.state.lock().await;
            if state
                .progress
                .iter()
                .any(|p| p.account_id == progress.account_id && p.trail_id == progress.trail_id)
            {
                return Ok(false);
            }
            state.progress.push(progress.clone());
            Ok(true)
        }

        async fn update_progress(&self, progress: &TrailProgress) -> LearningResult<()> {
            let mut state = self.state.lock().await;
            if let Some(row) = state.progress.iter_mut().find(|p| p.id == progress.id) {
                *row = progress.clone();
            }
            Ok(())
        }
    }

    impl AssessmentRepository for MemoryLearningStore {
        async fn list_assessments(&self) -> LearningResult<Vec<Assessment>> {
            let mut assessments: Vec<Assessment> =
                self.state.lock().await.assessments.values().cloned().collect();
            assessments.sort_by_key(|a| a.created_at);
            Ok(assessments)
        }

        async fn find_assessment(&self, id: AssessmentId) -> LearningResult<Option<Assessment>> {
            Ok(self.state.lock().await.assessments.get(&id).cloned())
        }

        async fn create_assessment(&self, assessment: &Assessment) -> LearningResult<()> {
            self.state
                .lock()
                .await
                .assessments
                .insert(assessment.id, assessment.clone());
            Ok(())
        }

        async fn update_assessment(&self, assessment: &Assessment) -> LearningResult<()> {
            self.create_assessment(assessment).await
        }

        async fn list_questions(&self, assessment_id: AssessmentId) -> LearningResult<Vec<Question>> {
            Ok(self
                .state
                .lock()
                .await
                .questions
                .iter()
                .filter(|q| q.assessment_id == assessment_id)
                .cloned()
                .collect())
        }

        async fn find_question(&self, id: QuestionId) -> LearningResult<Option<Question>> {
            Ok(self
                .state
                .lock()
                .await
                .questions
                .iter()
                .find(|q| q.id == id)
                .cloned())
        }

        async fn update_question(&self, question: &Question) -> LearningResult<()> {
            let mut state = self.state.lock().await;
            if let Some(row) = state.questions.iter_mut().find(|q| q.id == question.id) {
                *row = question.clone();
            }
            Ok(())
        }

        async fn list_alternatives(&self, question_id: QuestionId) -> LearningResult<Vec<Alternative>> {
            Ok(self
                .state
                .lock()
                .await
                .alternatives
                .iter()
                .filter(|a| a.question_id == question_id)
                .cloned()
                .collect())
        }

        async fn assessment_alternatives(
            &self,
            assessment_id: AssessmentId,
        ) -> LearningResult<Vec<Alternative>> {
            let state = self.state.lock().await;
            let questions = state.question_ids(assessment_id);
            Ok(state
                .alternatives
                .iter()
                .filter(|a| questions.contains(&a.question_id))
                .cloned()
                .collect())
        }

        async fn find_alternative(&self, id: AlternativeId) -> LearningResult<Option<Alternative>> {
            Ok(self
                .state
                .lock()
                .await
                .alternatives
                .iter()
                .find(|a| a.id == id)
                .cloned())
        }

        async fn create_alternative(&self, alternative: &Alternative) -> LearningResult<()> {
            self.state
                .lock()
                .await
                .alternatives
                .push(alternative.clone());
            Ok(())
        }

        async fn update_alternative(&self, alternative: &Alternative) -> LearningResult<()> {
            let mut state = self.state.lock().await;
            if let Some(row) = state
                .alternatives
                .iter_mut()
                .find(|a| a.id == alternative.id)
            {
                *row = alternative.clone();
            }
            Ok(())
        }
    }

    impl ChallengeRepository for MemoryLearningStore {
        async fn list_challenges(&self) -> LearningResult<Vec<Challenge>> {
            let mut challenges: Vec<Challenge> =
                self.state.lock().await.challenges.values().cloned().collect();
            challenges.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(challenges)
        }

        async fn find_challenge(&self, id: ChallengeId) -> LearningResult<Option<Challenge>> {
            Ok(self.state.lock().await.challenges.get(&id).cloned())
        }

        async fn create_challenge(&self, challenge: &Challenge) -> LearningResult<()> {
            self.state
                .lock()
                .await
                .challenges
                .insert(challenge.id, challenge.clone());
            Ok(())
        }

        async fn update_challenge(&self, challenge: &Challenge) -> LearningResult<()> {
            self.create_challenge(challenge).await
        }

        async fn list_stages(&self, challenge_id: ChallengeId) -> LearningResult<Vec<ChallengeStage>> {
            let mut stages: Vec<ChallengeStage> = self
                .state
                .lock()
                .await
                .stages
                .iter()
                .filter(|s| s.challenge_id == challenge_id)
                .copied()
                .collect();
            stages.sort_by_key(|s| s.position);
            Ok(stages)
        }

        async fn find_stage(&self, id: ChallengeStageId) -> LearningResult<Option<ChallengeStage>> {
            Ok(self
                .state
                .lock()
                .await
                .stages
                .iter()
                .find(|s| s.id == id)
                .copied())
        }

        async fn create_stage(&self, stage: &ChallengeStage) -> LearningResult<()> {
            let mut state = self.state.lock().await;
            if state
                .stages
                .iter()
                .any(|s| s.challenge_id == stage.challenge_id && s.position == stage.position)
            {
                return Err(LearningError::DuplicateStageOrder);
            }
            state.stages.push(*stage);
            Ok(())
        }

        async fn update_stage(&self, stage: &ChallengeStage) -> LearningResult<()> {
            let mut state = self.state.lock().await;
            if state.stages.iter().any(|s| {
                s.id != stage.id
                    && s.challenge_id == stage.challenge_id
                    && s.position == stage.position
            }) {
                return Err(LearningError::DuplicateStageOrder);
            }
            if let Some(row) = state.stages.iter_mut().find(|s| s.id == stage.id) {
                *row = *stage;
            }
            Ok(())
        }

        async fn delete_stage(&self, id: ChallengeStageId) -> LearningResult<bool> {
            let mut state = self.state.lock().await;
            let before = state.stages.len();
            state.stages.retain(|s| s.id != id);
            Ok(state.stages.len() < before)
        }
    }

    impl RewardRepository for MemoryLearningStore {
        async fn list_rewards(&self) -> LearningResult<Vec<Reward>> {
            let mut rewards: Vec<Reward> =
                self.state.lock().await.rewards.values().cloned().collect();
            rewards.sort_by_key(|r| r.cost);
            Ok(rewards)
        }

        async fn find_reward(&self, id: RewardId) -> LearningResult<Option<Reward>> {
            Ok(self.state.lock().await.rewards.get(&id).cloned())
        }

        async fn create_reward(&self, reward: &Reward) -> LearningResult<()> {
            self.state
                .lock()
                .await
                .rewards
                .insert(reward.id, reward.clone());
            Ok(())
        }

        async fn reward_has_redemptions(&self, id: RewardId) -> LearningResult<bool> {
            Ok(self
                .state
                .lock()
                .await
                .redemptions
                .iter()
                .any(|r| r.reward_id == id))
        }

        async fn delete_reward(&self, id: RewardId) -> LearningResult<bool> {
            Ok(self.state.lock().await.rewards.remove(&id).is_some())
        }

        async fn account_redemptions(
            &self,
            account_id: AccountId,
        ) -> LearningResult<Vec<RedemptionDetail>> {
            let state = self.state.lock().await;
            let mut details: Vec<RedemptionDetail> = state
                .redemptions
                .iter()
                .filter(|r| r.account_id == account_id)
                .filter_map(|r| state.redemption_detail(r))
                .collect();
            details.sort_by(|a, b| b.redemption.redeemed_at.cmp(&a.redemption.redeemed_at));
            Ok(details)
        }

        async fn find_redemption(&self, id: RedemptionId) -> LearningResult<Option<RedemptionDetail>> {
            let state = self.state.lock().await;
            Ok(state
                .redemptions
                .iter()
                .find(|r| r.id == id)
                .and_then(|r| state.redemption_detail(r)))
        }

        async fn coin_balance(&self, account_id: AccountId) -> LearningResult<i64> {
            Ok(self.state.lock().await.coin_balance(account_id))
        }

        async fn coin_history(&self, account_id: AccountId) -> LearningResult<Vec<LedgerEntry>> {
            let mut history: Vec<LedgerEntry> = self
                .state
                .lock()
                .await
                .coins
                .iter()
                .filter(|e| e.account_id == account_id)
                .cloned()
                .collect();
            history.reverse();
            Ok(history)
        }

        async fn account_exists(&self, account_id: AccountId) -> LearningResult<bool> {
            Ok(self.state.lock().await.accounts.contains_key(&account_id))
        }
    }

    impl CertificateRepository for MemoryLearningStore {
        async fn list_certificates(&self) -> LearningResult<Vec<Certificate>> {
            Ok(self.state.lock().await.certificates.clone())
        }

        async fn account_certificates(
            &self,
            account_id: AccountId,
        ) -> LearningResult<Vec<Certificate>> {
            Ok(self
                .state
                .lock()
                .await
                .certificates
                .iter()
                .filter(|c| c.account_id == account_id)
                .cloned()
                .collect())
        }

        async fn find_certificate(&self, id: CertificateId) -> LearningResult<Option<Certificate>> {
            Ok(self
                .state
                .lock()
                .await
                .certificates
                .iter()
                .find(|c| c.id == id)
                .cloned())
        }

        async fn certificate_document(
            &self,
            id: CertificateId,
        ) -> LearningResult<Option<CertificateDocument>> {
            let state = self.state.lock().await;
            let Some(certificate) = state.certificates.iter().find(|c| c.id == id) else {
                return Ok(None);
            };
            let (Some(trail), Some(holder)) = (
                state.trails.get(&certificate.trail_id),
                state.accounts.get(&certificate.account_id),
            ) else {
                return Ok(None);
            };
            Ok(Some(CertificateDocument {
                certificate: certificate.clone(),
                trail_name: trail.name.clone(),
                trail_description: trail.description.clone(),
                holder_name: holder.name.clone(),
                holder_enrollment_id: holder.enrollment_id.clone(),
                holder_sector: holder.sector.clone(),
            }))
        }
    }

    // ========================================================================
    // Unit of work
    // ========================================================================

    /// Holds the state lock for its whole life; writes land on a copy that
    /// replaces the state on commit
    pub struct MemoryLearningTx {
        guard: OwnedMutexGuard<State>,
        work: State,
        fail_coin_append: Arc<AtomicBool>,
    }

    impl UnitOfWork for MemoryLearningStore {
        type Tx = MemoryLearningTx;

        async fn begin(&self) -> LearningResult<MemoryLearningTx> {
            let guard = self.state.clone().lock_owned().await;
            let work = guard.clone();
            Ok(MemoryLearningTx {
                guard,
                work,
                fail_coin_append: self.fail_coin_append.clone(),
            })
        }
    }

    impl LearningTx for MemoryLearningTx {
        async fn lock_account(&mut self, id: AccountId) -> LearningResult<bool> {
            Ok(self.work.accounts.contains_key(&id))
        }

        async fn lock_reward(&mut self, id: RewardId) -> LearningResult<Option<Reward>> {
            Ok(self.work.rewards.get(&id).cloned())
        }

        async fn lock_redemption(&mut self, id: RedemptionId) -> LearningResult<Option<Redemption>> {
            Ok(self.work.redemptions.iter().find(|r| r.id == id).cloned())
        }

        async fn lock_question(&mut self, id: QuestionId) -> LearningResult<Option<Question>> {
            Ok(self.work.questions.iter().find(|q| q.id == id).cloned())
        }

        async fn coin_balance(&mut self, account_id: AccountId) -> LearningResult<i64> {
            Ok(self.work.coin_balance(account_id))
        }

        async fn insert_view(&mut self, view: &ContentView) -> LearningResult<bool> {
            if self
                .work
                .views
                .iter()
                .any(|v| v.account_id == view.account_id && v.content_id == view.content_id)
            {
                return Ok(false);
            }
            self.work.views.push(view.clone());
            Ok(true)
        }

        async fn insert_answer(&mut self, answer: &AnswerRecord) -> LearningResult<()> {
            self.work.answers.push(answer.clone());
            Ok(())
        }

        async fn append_points(&mut self, entry: &LedgerEntry) -> LearningResult<()> {
            let account = self
                .work
                .accounts
                .get_mut(&entry.account_id)
                .ok_or(LearningError::NotFound("Usuário não encontrado"))?;
            account.points += entry.amount;
            self.work.points.push(entry.clone());
            Ok(())
        }

        async fn append_coins(&mut self, entry: &LedgerEntry) -> LearningResult<()> {
            if self.fail_coin_append.swap(false, Ordering::SeqCst) {
                return Err(LearningError::Internal("coin ledger unavailable".to_string()));
            }
            self.work.coins.push(entry.clone());
            Ok(())
        }

        async fn insert_redemption(&mut self, redemption: &Redemption) -> LearningResult<()> {
            self.work.redemptions.push(redemption.clone());
            Ok(())
        }

        async fn update_redemption_status(
            &mut self,
            id: RedemptionId,
            status: RedemptionStatus,
        ) -> LearningResult<()> {
            if let Some(row) = self.work.redemptions.iter_mut().find(|r| r.id == id) {
                row.status = status;
            }
            Ok(())
        }

        async fn update_reward(&mut self, reward: &Reward) -> LearningResult<()> {
            self.work.rewards.insert(reward.id, reward.clone());
            Ok(())
        }

        async fn set_reward_quantity(
            &mut self,
            id: RewardId,
            quantity: Option<i64>,
        ) -> LearningResult<()> {
            if let Some(reward) = self.work.rewards.get_mut(&id) {
                reward.quantity = quantity;
            }
            Ok(())
        }

        async fn find_progress(
            &mut self,
            account_id: AccountId,
            trail_id: TrailId,
        ) -> LearningResult<Option<TrailProgress>> {
            Ok(self
                .work
                .progress
                .iter()
                .find(|p| p.account_id == account_id && p.trail_id == trail_id)
                .cloned())
        }

        async fn find_certificate(
            &mut self,
            account_id: AccountId,
            trail_id: TrailId,
        ) -> LearningResult<Option<Certificate>> {
            Ok(self
                .work
                .certificates
                .iter()
                .find(|c| c.account_id == account_id && c.trail_id == trail_id)
                .cloned())
        }

        async fn insert_certificate(&mut self, certificate: &Certificate) -> LearningResult<()> {
            self.work.certificates.push(certificate.clone());
            Ok(())
        }

        async fn insert_trail(&mut self, trail: &Trail, items: &[TrailItem]) -> LearningResult<()> {
            self.work.trails.insert(trail.id, trail.clone());
            self.work.trail_items.extend_from_slice(items);
            Ok(())
        }

        async fn update_trail(
            &mut self,
            trail: &Trail,
            items: Option<&[TrailItem]>,
        ) -> LearningResult<()> {
            self.work.trails.insert(trail.id, trail.clone());
            if let Some(items) = items {
                self.work.trail_items.retain(|i| i.trail_id != trail.id);
                self.work.trail_items.extend_from_slice(items);
            }
            Ok(())
        }

        async fn delete_trail(&mut self, id: TrailId) -> LearningResult<bool> {
            self.work.trail_items.retain(|i| i.trail_id != id);
            Ok(self.work.trails.remove(&id).is_some())
        }

        async fn insert_question(
            &mut self,
            question: &Question,
            alternatives: &[Alternative],
        ) -> LearningResult<()> {
            self.work.questions.push(question.clone());
            self.work.alternatives.extend_from_slice(alternatives);
            Ok(())
        }

        async fn count_alternatives(&mut self, question_id: QuestionId) -> LearningResult<i64> {
            Ok(self
                .work
                .alternatives
                .iter()
                .filter(|a| a.question_id == question_id)
                .count() as i64)
        }

        async fn delete_alternative(&mut self, id: AlternativeId) -> LearningResult<bool> {
            self.work.answers.retain(|a| a.alternative_id != id);
            let before = self.work.alternatives.len();
            self.work.alternatives.retain(|a| a.id != id);
            Ok(self.work.alternatives.len() < before)
        }

        async fn delete_question(&mut self, id: QuestionId) -> LearningResult<bool> {
            let alternatives = self.work.alternative_ids(&[id]);
            self.work
                .answers
                .retain(|a| !alternatives.contains(&a.alternative_id));
            self.work.alternatives.retain(|a| a.question_id != id);
            let before = self.work.questions.len();
            self.work.questions.retain(|q| q.id != id);
            Ok(self.work.questions.len() < before)
        }

        async fn delete_assessment(&mut self, id: AssessmentId) -> LearningResult<bool> {
            let questions = self.work.question_ids(id);
            let alternatives = self.work.alternative_ids(&questions);
            self.work
                .answers
                .retain(|a| !alternatives.contains(&a.alternative_id));
            self.work
                .alternatives
                .retain(|a| !questions.contains(&a.question_id));
            self.work.questions.retain(|q| q.assessment_id != id);
            Ok(self.work.assessments.remove(&id).is_some())
        }

        async fn delete_challenge(&mut self, id: ChallengeId) -> LearningResult<bool> {
            self.work.stages.retain(|s| s.challenge_id != id);
            Ok(self.work.challenges.remove(&id).is_some())
        }

        async fn commit(self) -> LearningResult<()> {
            let MemoryLearningTx { mut guard, work, .. } = self;
            *guard = work;
            Ok(())
        }
    }

    // ========================================================================
    // Fixtures
    // ========================================================================

    pub fn config() -> Arc<LearningConfig> {
        Arc::new(LearningConfig::default())
    }

    pub async fn module(store: &MemoryLearningStore, manager: AccountId, name: &str) -> Module {
        ModuleUseCase::new(Arc::new(store.clone()))
            .create(
                manager,
                ModuleInput {
                    name: Some(name.to_string()),
                    description: Some(format!("Módulo {}", name)),
                },
            )
            .await
            .unwrap()
    }

    pub async fn content(store: &MemoryLearningStore, module_id: ModuleId, position: i32) -> Content {
        ContentUseCase::new(Arc::new(store.clone()), config())
            .create(ContentInput {
                module_id: Some(module_id),
                kind: Some("VIDEO".to_string()),
                title: Some(format!("Aula {}", position)),
                description: Some("Conteúdo de teste".to_string()),
                video_url: Some(format!("https://videos.example/{}", position)),
                document_url: None,
                position: Some(position),
            })
            .await
            .unwrap()
    }

    pub async fn trail(store: &MemoryLearningStore, manager: AccountId, modules: &[ModuleId]) -> Trail {
        TrailUseCase::new(Arc::new(store.clone()))
            .create(
                manager,
                TrailInput {
                    name: Some("Trilha de Segurança".to_string()),
                    description: Some("Boas práticas".to_string()),
                    modules: Some(
                        modules
                            .iter()
                            .enumerate()
                            .map(|(i, &module_id)| TrailModuleInput {
                                module_id,
                                position: i as i32 + 1,
                            })
                            .collect(),
                    ),
                },
            )
            .await
            .unwrap()
            .trail
    }

    pub async fn assessment_on_content(
        store: &MemoryLearningStore,
        manager: AccountId,
        content_id: ContentId,
    ) -> Assessment {
        AssessmentUseCase::new(Arc::new(store.clone()))
            .create(
                manager,
                AssessmentInput {
                    title: Some("Avaliação".to_string()),
                    description: Some("Teste de fixação".to_string()),
                    content_id: Some(content_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    }

    /// Question with `count` alternatives; the first one is correct
    pub async fn question(
        store: &MemoryLearningStore,
        assessment_id: AssessmentId,
        count: usize,
    ) -> QuestionSheet {
        QuestionUseCase::new(Arc::new(store.clone()))
            .create(
                assessment_id,
                QuestionInput {
                    text: Some("Qual a resposta?".to_string()),
                    alternatives: (0..count)
                        .map(|i| AlternativeInput {
                            text: Some(format!("Opção {}", i)),
                            correct: Some(i == 0),
                        })
                        .collect(),
                },
            )
            .await
            .unwrap()
    }

    pub async fn reward(
        store: &MemoryLearningStore,
        manager: AccountId,
        cost: i64,
        quantity: Option<i64>,
    ) -> Reward {
        RewardUseCase::new(Arc::new(store.clone()))
            .create(
                manager,
                RewardInput {
                    name: Some("Caneca".to_string()),
                    description: Some("Caneca personalizada".to_string()),
                    cost: Some(cost),
                    kind: Some("BRINDE".to_string()),
                    quantity,
                },
            )
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod curriculum_tests {
    use std::sync::Arc;

    use tokio_test::assert_ok;

    use super::support::*;
    use crate::application::{
        ContentUseCase, IssueCertificateUseCase, ModuleUseCase, TrailUseCase, ViewOutcome,
    };
    use crate::domain::repository::RewardRepository;
    use crate::domain::value_object::LedgerEvent;
    use crate::error::LearningError;

    #[tokio::test]
    async fn test_mark_viewed_awards_points_once() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        let module = module(&store, manager, "Segurança").await;
        let content = content(&store, module.id, 1).await;
        let use_case = ContentUseCase::new(Arc::new(store.clone()), config());

        let first = assert_ok!(use_case.mark_viewed(member, content.id).await);
        assert_eq!(first, ViewOutcome::Marked { points: 10 });

        let second = assert_ok!(use_case.mark_viewed(member, content.id).await);
        assert_eq!(second, ViewOutcome::AlreadyViewed);

        assert_eq!(store.points_of(member).await, 10);
        let entries = store.point_entries(member).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, LedgerEvent::ContentViewed);
        assert_eq!(entries[0].reference_id, Some(content.id.into_uuid()));
    }

    #[tokio::test]
    async fn test_mark_viewed_unknown_content() {
        let store = MemoryLearningStore::default();
        let member = store.seed_account("A100").await;

        let result = ContentUseCase::new(Arc::new(store.clone()), config())
            .mark_viewed(member, kernel::id::ContentId::new())
            .await;
        assert!(matches!(result, Err(LearningError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_progress_completion_and_certificate() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        let module = module(&store, manager, "Segurança").await;
        let first = content(&store, module.id, 1).await;
        let second = content(&store, module.id, 2).await;
        let trail = trail(&store, manager, &[module.id]).await;

        let trails = TrailUseCase::new(Arc::new(store.clone()));
        let contents = ContentUseCase::new(Arc::new(store.clone()), config());
        let certificates = IssueCertificateUseCase::new(Arc::new(store.clone()), config());

        let (_, started) = assert_ok!(trails.start(member, trail.id).await);
        assert!(started);
        let (_, started) = assert_ok!(trails.start(member, trail.id).await);
        assert!(!started);

        assert_ok!(contents.mark_viewed(member, first.id).await);
        let report = assert_ok!(trails.progress(member, trail.id).await);
        assert_eq!(report.total_contents, 2);
        assert_eq!(report.viewed_contents, 1);
        assert_eq!(report.progress.percent, 50);
        assert!(!report.progress.finished);

        let early = certificates.execute(member, trail.id).await;
        assert!(matches!(early, Err(LearningError::TrailNotCompleted)));

        assert_ok!(contents.mark_viewed(member, second.id).await);
        let report = assert_ok!(trails.progress(member, trail.id).await);
        assert_eq!(report.progress.percent, 100);
        assert!(report.progress.finished);
        assert!(report.progress.finished_at.is_some());

        let (certificate, issued) = assert_ok!(certificates.execute(member, trail.id).await);
        assert!(issued);
        let (again, issued) = assert_ok!(certificates.execute(member, trail.id).await);
        assert!(!issued);
        assert_eq!(again.id, certificate.id);

        assert_eq!(store.points_of(member).await, 10 + 10 + 100);
        assert_eq!(store.coin_balance(member).await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_progress_requires_start() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        let module = module(&store, manager, "Segurança").await;
        let trail = trail(&store, manager, &[module.id]).await;

        let result = TrailUseCase::new(Arc::new(store.clone()))
            .progress(member, trail.id)
            .await;
        assert!(matches!(result, Err(LearningError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_guards() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        let module = module(&store, manager, "Segurança").await;
        content(&store, module.id, 1).await;
        let trail = trail(&store, manager, &[module.id]).await;

        let result = ModuleUseCase::new(Arc::new(store.clone()))
            .delete(module.id)
            .await;
        assert!(matches!(result, Err(LearningError::Conflict(_))));

        let trails = TrailUseCase::new(Arc::new(store.clone()));
        assert_ok!(trails.start(member, trail.id).await);
        let result = trails.delete(trail.id).await;
        assert!(matches!(result, Err(LearningError::HasDependents(_))));
    }

    #[tokio::test]
    async fn test_trail_requires_modules() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;

        let result = TrailUseCase::new(Arc::new(store.clone()))
            .create(
                manager,
                crate::application::TrailInput {
                    name: Some("Vazia".to_string()),
                    description: Some("Sem módulos".to_string()),
                    modules: Some(Vec::new()),
                },
            )
            .await;
        assert!(matches!(result, Err(LearningError::Validation(_))));
    }
}

#[cfg(test)]
mod assessment_tests {
    use std::sync::Arc;

    use tokio_test::{assert_err, assert_ok};

    use super::support::*;
    use crate::application::{
        AlternativeInput, AlternativeUseCase, AssessmentUseCase, ChallengeInput, ChallengeUseCase,
        QuestionInput, QuestionUseCase, StageInput, SubmitAnswersUseCase,
    };
    use crate::domain::value_object::LedgerEvent;
    use crate::error::LearningError;

    #[tokio::test]
    async fn test_question_needs_two_alternatives_and_a_correct_one() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let module = module(&store, manager, "Segurança").await;
        let content = content(&store, module.id, 1).await;
        let assessment = assessment_on_content(&store, manager, content.id).await;
        let questions = QuestionUseCase::new(Arc::new(store.clone()));

        let alternative = |text: &str, correct: bool| AlternativeInput {
            text: Some(text.to_string()),
            correct: Some(correct),
        };

        let single = questions
            .create(
                assessment.id,
                QuestionInput {
                    text: Some("Pergunta".to_string()),
                    alternatives: vec![alternative("A", true)],
                },
            )
            .await;
        assert!(matches!(single, Err(LearningError::Validation(_))));

        let none_correct = questions
            .create(
                assessment.id,
                QuestionInput {
                    text: Some("Pergunta".to_string()),
                    alternatives: vec![alternative("A", false), alternative("B", false)],
                },
            )
            .await;
        assert!(matches!(none_correct, Err(LearningError::Validation(_))));

        let sheet = assert_ok!(
            questions
                .create(
                    assessment.id,
                    QuestionInput {
                        text: Some("Pergunta".to_string()),
                        alternatives: vec![alternative("A", false), alternative("B", true)],
                    },
                )
                .await
        );
        assert_eq!(sheet.alternatives.len(), 2);
    }

    #[tokio::test]
    async fn test_alternative_floor() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let module = module(&store, manager, "Segurança").await;
        let content = content(&store, module.id, 1).await;
        let assessment = assessment_on_content(&store, manager, content.id).await;
        let sheet = question(&store, assessment.id, 3).await;
        let alternatives = AlternativeUseCase::new(Arc::new(store.clone()));

        assert_ok!(alternatives.delete(sheet.alternatives[2].id).await);
        let result = alternatives.delete(sheet.alternatives[1].id).await;
        assert!(matches!(result, Err(LearningError::AlternativeFloor)));

        let remaining = assert_ok!(alternatives.list(sheet.question.id).await);
        assert_eq!(remaining.len(), 2);
    }

    #[tokio::test]
    async fn test_submission_scoring() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        let module = module(&store, manager, "Segurança").await;
        let content = content(&store, module.id, 1).await;
        let assessment = assessment_on_content(&store, manager, content.id).await;
        let q1 = question(&store, assessment.id, 2).await;
        let q2 = question(&store, assessment.id, 2).await;
        let q3 = question(&store, assessment.id, 2).await;

        let answers = [
            (q1.question.id, q1.alternatives[0].id),
            (q2.question.id, q2.alternatives[0].id),
            (q3.question.id, q3.alternatives[1].id),
        ];
        let result = assert_ok!(
            SubmitAnswersUseCase::new(Arc::new(store.clone()))
                .execute(member, assessment.id, &answers)
                .await
        );

        assert_eq!(result.score.correct, 2);
        assert_eq!(result.score.total, 3);
        assert_eq!(result.score.percent, 67);
        assert_eq!(result.score.points, 67);
        assert_eq!(result.answers.len(), 3);

        assert_eq!(store.answer_count(member).await, 3);
        assert!(store.has_viewed(member, content.id).await);
        let entries = store.point_entries(member).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, LedgerEvent::Assessment);
        assert_eq!(entries[0].amount, 67);
        assert_eq!(store.points_of(member).await, 67);
    }

    #[tokio::test]
    async fn test_zero_score_is_still_recorded() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        let module = module(&store, manager, "Segurança").await;
        let content = content(&store, module.id, 1).await;
        let assessment = assessment_on_content(&store, manager, content.id).await;
        let sheet = question(&store, assessment.id, 2).await;

        let result = assert_ok!(
            SubmitAnswersUseCase::new(Arc::new(store.clone()))
                .execute(
                    member,
                    assessment.id,
                    &[(sheet.question.id, sheet.alternatives[1].id)],
                )
                .await
        );
        assert_eq!(result.score.points, 0);
        let entries = store.point_entries(member).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, LedgerEvent::Assessment);
        assert_eq!(entries[0].amount, 0);
        assert_eq!(entries[0].description, "Avaliação 'Avaliação' - 0% de acerto");
        assert_eq!(store.points_of(member).await, 0);
    }

    #[tokio::test]
    async fn test_question_delete_removes_alternatives_and_answers() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        let module = module(&store, manager, "Segurança").await;
        let content = content(&store, module.id, 1).await;
        let assessment = assessment_on_content(&store, manager, content.id).await;
        let kept = question(&store, assessment.id, 2).await;
        let dropped = question(&store, assessment.id, 3).await;

        assert_ok!(
            SubmitAnswersUseCase::new(Arc::new(store.clone()))
                .execute(
                    member,
                    assessment.id,
                    &[
                        (kept.question.id, kept.alternatives[0].id),
                        (dropped.question.id, dropped.alternatives[0].id),
                    ],
                )
                .await
        );
        assert_eq!(store.answer_count(member).await, 2);

        let questions = QuestionUseCase::new(Arc::new(store.clone()));
        assert_ok!(questions.delete(dropped.question.id).await);

        assert_eq!(store.answer_count(member).await, 1);
        assert_eq!(store.question_rows().await, (1, 2));
        let missing = AlternativeUseCase::new(Arc::new(store.clone()))
            .list(dropped.question.id)
            .await;
        assert!(matches!(missing, Err(LearningError::NotFound(_))));

        let again = questions.delete(dropped.question.id).await;
        assert!(matches!(again, Err(LearningError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_assessment_delete_cascades() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        let module = module(&store, manager, "Segurança").await;
        let content = content(&store, module.id, 1).await;
        let assessment = assessment_on_content(&store, manager, content.id).await;
        let sheet = question(&store, assessment.id, 2).await;

        assert_ok!(
            SubmitAnswersUseCase::new(Arc::new(store.clone()))
                .execute(
                    member,
                    assessment.id,
                    &[(sheet.question.id, sheet.alternatives[0].id)],
                )
                .await
        );

        let assessments = AssessmentUseCase::new(Arc::new(store.clone()));
        assert_ok!(assessments.delete(assessment.id).await);

        assert_eq!(store.answer_count(member).await, 0);
        assert_eq!(store.question_rows().await, (0, 0));
        let gone = assessments.get(assessment.id).await;
        assert!(matches!(gone, Err(LearningError::NotFound(_))));
        // the ledger keeps the attempt
        assert_eq!(store.point_entries(member).await.len(), 1);
    }

    #[tokio::test]
    async fn test_submission_must_answer_every_question() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        let module = module(&store, manager, "Segurança").await;
        let content = content(&store, module.id, 1).await;
        let assessment = assessment_on_content(&store, manager, content.id).await;
        let q1 = question(&store, assessment.id, 2).await;
        let q2 = question(&store, assessment.id, 2).await;
        let submit = SubmitAnswersUseCase::new(Arc::new(store.clone()));

        let partial = submit
            .execute(member, assessment.id, &[(q1.question.id, q1.alternatives[0].id)])
            .await;
        assert!(matches!(partial, Err(LearningError::IncompleteSubmission)));

        let crossed = submit
            .execute(
                member,
                assessment.id,
                &[
                    (q1.question.id, q2.alternatives[0].id),
                    (q2.question.id, q2.alternatives[0].id),
                ],
            )
            .await;
        assert!(matches!(crossed, Err(LearningError::Validation(_))));

        assert_err!(submit.execute(member, assessment.id, &[]).await);
        assert_eq!(store.answer_count(member).await, 0);
    }

    #[tokio::test]
    async fn test_stage_order_is_unique_per_challenge() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let module = module(&store, manager, "Segurança").await;
        let content = content(&store, module.id, 1).await;
        let first = assessment_on_content(&store, manager, content.id).await;
        let second = assessment_on_content(&store, manager, content.id).await;
        let challenges = ChallengeUseCase::new(Arc::new(store.clone()));

        let challenge = assert_ok!(
            challenges
                .create(
                    manager,
                    ChallengeInput {
                        name: Some("Desafio".to_string()),
                        description: Some("Etapas".to_string()),
                    },
                )
                .await
        );

        assert_ok!(
            challenges
                .add_stage(
                    challenge.id,
                    StageInput {
                        assessment_id: Some(first.id),
                        position: Some(1),
                    },
                )
                .await
        );
        let duplicate = challenges
            .add_stage(
                challenge.id,
                StageInput {
                    assessment_id: Some(second.id),
                    position: Some(1),
                },
            )
            .await;
        assert!(matches!(duplicate, Err(LearningError::DuplicateStageOrder)));

        let detail = assert_ok!(challenges.get(challenge.id).await);
        assert_eq!(detail.stages.len(), 1);
    }
}

#[cfg(test)]
mod reward_tests {
    use std::sync::Arc;

    use tokio_test::assert_ok;

    use super::support::*;
    use crate::application::{
        ChangeRedemptionStatusUseCase, CoinBalanceUseCase, RedeemRewardUseCase, RewardInput,
        RewardUseCase,
    };
    use crate::domain::repository::RewardRepository;
    use crate::domain::value_object::{LedgerEvent, RedemptionStatus};
    use crate::error::LearningError;

    #[tokio::test]
    async fn test_insufficient_coins() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        store.grant_coins(member, 10).await;
        let reward = reward(&store, manager, 30, None).await;

        let result = RedeemRewardUseCase::new(Arc::new(store.clone()))
            .execute(member, reward.id)
            .await;
        assert!(matches!(
            result,
            Err(LearningError::InsufficientCoins {
                balance: 10,
                cost: 30
            })
        ));
        assert_eq!(store.redemption_count().await, 0);
    }

    #[tokio::test]
    async fn test_redeem_and_cancel_round_trip() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        store.grant_coins(member, 100).await;
        let reward = reward(&store, manager, 30, Some(2)).await;
        let status = ChangeRedemptionStatusUseCase::new(Arc::new(store.clone()));

        let detail = assert_ok!(
            RedeemRewardUseCase::new(Arc::new(store.clone()))
                .execute(member, reward.id)
                .await
        );
        assert_eq!(detail.redemption.status, RedemptionStatus::Requested);
        assert_eq!(detail.reward.quantity, Some(1));
        assert_eq!(store.coin_balance(member).await.unwrap(), 70);

        let processing = assert_ok!(status.execute(detail.redemption.id, Some("PROCESSANDO")).await);
        assert_eq!(processing.redemption.status, RedemptionStatus::Processing);
        assert_eq!(store.coin_balance(member).await.unwrap(), 70);

        let cancelled = assert_ok!(status.execute(detail.redemption.id, Some("CANCELADO")).await);
        assert_eq!(cancelled.redemption.status, RedemptionStatus::Cancelled);
        assert_eq!(cancelled.reward.quantity, Some(2));
        assert_eq!(store.coin_balance(member).await.unwrap(), 100);

        // cancelling again refunds nothing
        assert_ok!(status.execute(detail.redemption.id, Some("CANCELADO")).await);
        assert_eq!(store.coin_balance(member).await.unwrap(), 100);

        let reopened = status.execute(detail.redemption.id, Some("ENTREGUE")).await;
        assert!(matches!(reopened, Err(LearningError::RedemptionClosed)));

        let statement = assert_ok!(
            CoinBalanceUseCase::new(Arc::new(store.clone()))
                .execute(member)
                .await
        );
        assert_eq!(statement.balance, 100);
        assert_eq!(statement.history[0].event, LedgerEvent::RewardRefund);
    }

    #[tokio::test]
    async fn test_invalid_status() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        store.grant_coins(member, 100).await;
        let reward = reward(&store, manager, 30, None).await;
        let detail = assert_ok!(
            RedeemRewardUseCase::new(Arc::new(store.clone()))
                .execute(member, reward.id)
                .await
        );
        let status = ChangeRedemptionStatusUseCase::new(Arc::new(store.clone()));

        let result = status.execute(detail.redemption.id, Some("PERDIDO")).await;
        assert!(matches!(result, Err(LearningError::InvalidStatus)));

        let result = status.execute(detail.redemption.id, None).await;
        assert!(matches!(result, Err(LearningError::Validation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_redeem_of_last_unit() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let first = store.seed_account("A100").await;
        let second = store.seed_account("A200").await;
        store.grant_coins(first, 100).await;
        store.grant_coins(second, 100).await;
        let reward = reward(&store, manager, 30, Some(1)).await;
        let redeem = RedeemRewardUseCase::new(Arc::new(store.clone()));

        let (a, b) = tokio::join!(
            redeem.execute(first, reward.id),
            redeem.execute(second, reward.id)
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(LearningError::RewardExhausted)))
        );
        assert_eq!(store.redemption_count().await, 1);
        let stock = store.find_reward(reward.id).await.unwrap().unwrap();
        assert_eq!(stock.quantity, Some(0));
        assert_eq!(
            store.coin_balance(first).await.unwrap() + store.coin_balance(second).await.unwrap(),
            170
        );
    }

    #[tokio::test]
    async fn test_failed_redeem_leaves_nothing_behind() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        store.grant_coins(member, 100).await;
        let reward = reward(&store, manager, 30, Some(1)).await;
        let redeem = RedeemRewardUseCase::new(Arc::new(store.clone()));

        store.fail_next_coin_append();
        let result = redeem.execute(member, reward.id).await;
        assert!(matches!(result, Err(LearningError::Internal(_))));

        assert_eq!(store.redemption_count().await, 0);
        assert_eq!(store.coin_balance(member).await.unwrap(), 100);
        let stock = store.find_reward(reward.id).await.unwrap().unwrap();
        assert_eq!(stock.quantity, Some(1));

        // the same unit is still available once the ledger recovers
        let detail = assert_ok!(redeem.execute(member, reward.id).await);
        assert_eq!(detail.reward.quantity, Some(0));
    }

    #[tokio::test]
    async fn test_failed_refund_keeps_redemption_open() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        store.grant_coins(member, 100).await;
        let reward = reward(&store, manager, 30, Some(1)).await;
        let detail = assert_ok!(
            RedeemRewardUseCase::new(Arc::new(store.clone()))
                .execute(member, reward.id)
                .await
        );
        let status = ChangeRedemptionStatusUseCase::new(Arc::new(store.clone()));

        store.fail_next_coin_append();
        let result = status.execute(detail.redemption.id, Some("CANCELADO")).await;
        assert!(matches!(result, Err(LearningError::Internal(_))));

        let after = store.find_redemption(detail.redemption.id).await.unwrap().unwrap();
        assert_eq!(after.redemption.status, RedemptionStatus::Requested);
        assert_eq!(after.reward.quantity, Some(0));
        assert_eq!(store.coin_balance(member).await.unwrap(), 70);
    }

    #[tokio::test]
    async fn test_reward_edit_keeps_sold_stock() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        store.grant_coins(member, 100).await;
        let reward = reward(&store, manager, 30, Some(1)).await;
        let rewards = RewardUseCase::new(Arc::new(store.clone()));
        let redeem = RedeemRewardUseCase::new(Arc::new(store.clone()));

        let rename = || RewardInput {
            name: Some("Caneca nova".to_string()),
            ..Default::default()
        };
        let (renamed, redeemed) = tokio::join!(
            rewards.update(reward.id, rename()),
            redeem.execute(member, reward.id)
        );
        assert_ok!(renamed);
        assert_ok!(redeemed);

        let renamed = assert_ok!(rewards.update(reward.id, rename()).await);
        assert_eq!(renamed.quantity, Some(0));

        let stock = store.find_reward(reward.id).await.unwrap().unwrap();
        assert_eq!(stock.name, "Caneca nova");
        assert_eq!(stock.quantity, Some(0));
        assert_eq!(store.redemption_count().await, 1);

        let second = redeem.execute(member, reward.id).await;
        assert!(matches!(second, Err(LearningError::RewardExhausted)));
    }

    #[tokio::test]
    async fn test_reward_with_redemptions_cannot_be_deleted() {
        let store = MemoryLearningStore::default();
        let manager = store.seed_account("G001").await;
        let member = store.seed_account("A100").await;
        store.grant_coins(member, 100).await;
        let reward = reward(&store, manager, 30, None).await;
        assert_ok!(
            RedeemRewardUseCase::new(Arc::new(store.clone()))
                .execute(member, reward.id)
                .await
        );

        let result = RewardUseCase::new(Arc::new(store.clone()))
            .delete(reward.id)
            .await;
        assert!(matches!(result, Err(LearningError::HasDependents(_))));
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use auth::domain::entity::Account;
    use auth::domain::value_object::{AccountPassword, EnrollmentId, RawPassword, Role};
    use auth::{AccessGate, AuthConfig, TokenService};

    use super::support::*;
    use crate::application::LearningConfig;
    use crate::presentation::router::learning_router_generic;

    struct Fixture {
        store: MemoryLearningStore,
        app: Router,
        tokens: TokenService,
    }

    impl Fixture {
        fn new() -> Self {
            let store = MemoryLearningStore::default();
            let config = AuthConfig::with_secret(TEST_SECRET);
            let app = learning_router_generic(
                store.clone(),
                LearningConfig::default(),
                AccessGate::from_config(&config),
            );
            Self {
                store,
                app,
                tokens: TokenService::new(&config),
            }
        }

        /// Create an account in the store and mint an access token for it
        async fn account(&self, enrollment_id: &str, role: Role) -> (Account, String) {
            let password = RawPassword::new("senha123".to_string()).unwrap();
            let account = Account::new(
                format!("Conta {}", enrollment_id),
                EnrollmentId::new(enrollment_id).unwrap(),
                AccountPassword::from_raw(&password).unwrap(),
                "TI".to_string(),
                role,
                None,
            );
            self.store.insert_account(&account).await;
            let token = self.tokens.issue(&account).unwrap().token;
            (account, token)
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }
    }

    fn json_with_token(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_routes_require_token() {
        let fixture = Fixture::new();

        let (status, body) = fixture
            .send(Request::builder().uri("/modules").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Token não fornecido");
    }

    #[tokio::test]
    async fn test_module_management_is_elevated() {
        let fixture = Fixture::new();
        let (_, member) = fixture.account("A100", Role::Member).await;
        let (manager_account, manager) = fixture.account("G001", Role::Manager).await;
        let body = json!({ "nome": "Segurança", "descricao": "Fundamentos" });

        let (status, _) = fixture
            .send(json_with_token("POST", "/modules", &member, body.clone()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, created) = fixture
            .send(json_with_token("POST", "/modules", &manager, body))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["nome"], "Segurança");
        assert_eq!(created["gestor_id"], manager_account.id.to_string());

        let (status, listing) = fixture.send(get_with_token("/modules", &member)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing.as_array().map(Vec::len), Some(1));

        let (status, body) = fixture
            .send(json_with_token(
                "POST",
                "/modules",
                &manager,
                json!({ "nome": "Sem descrição" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_answer_key_visible_only_to_managers() {
        let fixture = Fixture::new();
        let (_, member) = fixture.account("A100", Role::Member).await;
        let (manager_account, manager) = fixture.account("G001", Role::Manager).await;
        let module = module(&fixture.store, manager_account.id, "Segurança").await;
        let content = content(&fixture.store, module.id, 1).await;
        let assessment = assessment_on_content(&fixture.store, manager_account.id, content.id).await;
        question(&fixture.store, assessment.id, 2).await;
        let uri = format!("/assessments/{}", assessment.id);

        let (status, hidden) = fixture.send(get_with_token(&uri, &member)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(hidden["questoes"][0]["alternativas"][0].get("correta").is_none());

        let (_, shown) = fixture.send(get_with_token(&uri, &manager)).await;
        assert_eq!(shown["questoes"][0]["alternativas"][0]["correta"], true);
    }

    #[tokio::test]
    async fn test_mark_viewed_messages() {
        let fixture = Fixture::new();
        let (member_account, member) = fixture.account("A100", Role::Member).await;
        let (manager_account, _) = fixture.account("G001", Role::Manager).await;
        let module = module(&fixture.store, manager_account.id, "Segurança").await;
        let content = content(&fixture.store, module.id, 1).await;
        let uri = format!("/contents/{}/mark-viewed", content.id);

        let (status, body) = fixture
            .send(json_with_token("POST", &uri, &member, json!({})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Conteúdo marcado como assistido com sucesso");
        assert_eq!(body["pontos"], 10);

        let (status, body) = fixture
            .send(json_with_token("POST", &uri, &member, json!({})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Conteúdo já foi marcado como assistido");
        assert!(body.get("pontos").is_none());

        assert_eq!(fixture.store.points_of(member_account.id).await, 10);
    }

    #[tokio::test]
    async fn test_balance_of_other_account() {
        let fixture = Fixture::new();
        let (member_account, member) = fixture.account("A100", Role::Member).await;
        let (other_account, _) = fixture.account("A200", Role::Member).await;
        let (_, admin) = fixture.account("ADM", Role::Admin).await;
        fixture.store.grant_coins(member_account.id, 40).await;

        let (status, body) = fixture.send(get_with_token("/rewards/balance", &member)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saldo_moedas"], 40);
        assert_eq!(body["historico"].as_array().map(Vec::len), Some(1));

        let (status, _) = fixture
            .send(get_with_token(
                &format!("/rewards/balance/user/{}", other_account.id),
                &member,
            ))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = fixture
            .send(get_with_token(
                &format!("/rewards/balance/user/{}", member_account.id),
                &admin,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saldo_moedas"], 40);
    }

    #[tokio::test]
    async fn test_redeem_then_cancel_over_http() {
        let fixture = Fixture::new();
        let (member_account, member) = fixture.account("A100", Role::Member).await;
        let (manager_account, manager) = fixture.account("G001", Role::Manager).await;
        fixture.store.grant_coins(member_account.id, 50).await;
        let reward = reward(&fixture.store, manager_account.id, 20, Some(1)).await;

        let (status, body) = fixture
            .send(json_with_token(
                "POST",
                &format!("/rewards/{}/redeem", reward.id),
                &member,
                json!({}),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resgate"]["status"], "RESGATADO");
        let redemption_id = body["resgate"]["id"].as_str().unwrap().to_string();
        let status_uri = format!("/redemptions/{}/status", redemption_id);

        let (status, _) = fixture
            .send(json_with_token(
                "PUT",
                &status_uri,
                &member,
                json!({ "status": "CANCELADO" }),
            ))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = fixture
            .send(json_with_token(
                "PUT",
                &status_uri,
                &manager,
                json!({ "status": "CANCELADO" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Status do resgate alterado para CANCELADO");

        let (_, body) = fixture.send(get_with_token("/rewards/mine", &member)).await;
        assert_eq!(body["resgates"][0]["status"], "CANCELADO");

        let (_, body) = fixture.send(get_with_token("/rewards/balance", &member)).await;
        assert_eq!(body["saldo_moedas"], 50);
    }

    #[tokio::test]
    async fn test_malformed_path_id() {
        let fixture = Fixture::new();
        let (_, member) = fixture.account("A100", Role::Member).await;

        let (status, body) = fixture.send(get_with_token("/trails/42", &member)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
