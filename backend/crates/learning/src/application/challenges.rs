//! Challenge Use Cases
//!
//! Challenges group assessments into ordered stages.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{AccountId, AssessmentId, ChallengeId, ChallengeStageId};

use super::non_blank;
use crate::domain::entity::{Challenge, ChallengeStage};
use crate::domain::repository::{LearningStore, LearningTx};
use crate::error::{LearningError, LearningResult};

const CHALLENGE_NOT_FOUND: &str = "Desafio não encontrado";
const STAGE_NOT_FOUND: &str = "Etapa não encontrada";

#[derive(Debug, Default)]
pub struct ChallengeInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct StageInput {
    pub assessment_id: Option<AssessmentId>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct ChallengeDetail {
    pub challenge: Challenge,
    pub stages: Vec<ChallengeStage>,
}

pub struct ChallengeUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> ChallengeUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> LearningResult<Vec<Challenge>> {
        self.store.list_challenges().await
    }

    pub async fn get(&self, id: ChallengeId) -> LearningResult<ChallengeDetail> {
        let challenge = self.find(id).await?;
        let stages = self.store.list_stages(id).await?;
        Ok(ChallengeDetail { challenge, stages })
    }

    pub async fn create(
        &self,
        manager_id: AccountId,
        input: ChallengeInput,
    ) -> LearningResult<Challenge> {
        let (Some(name), Some(description)) = (non_blank(input.name), non_blank(input.description))
        else {
            return Err(LearningError::Validation(
                "Nome e descrição são obrigatórios".to_string(),
            ));
        };

        let now = Utc::now();
        let challenge = Challenge {
            id: ChallengeId::new(),
            name,
            description,
            manager_id,
            created_at: now,
            updated_at: now,
        };
        self.store.create_challenge(&challenge).await?;

        tracing::info!(challenge_id = %challenge.id, "Challenge created");
        Ok(challenge)
    }

    pub async fn update(&self, id: ChallengeId, input: ChallengeInput) -> LearningResult<Challenge> {
        let mut challenge = self.find(id).await?;
        if let Some(name) = non_blank(input.name) {
            challenge.name = name;
        }
        if let Some(description) = non_blank(input.description) {
            challenge.description = description;
        }
        challenge.updated_at = Utc::now();
        self.store.update_challenge(&challenge).await?;
        Ok(challenge)
    }

    /// Delete stages and the challenge together
    pub async fn delete(&self, id: ChallengeId) -> LearningResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_challenge(id).await? {
            return Err(LearningError::NotFound(CHALLENGE_NOT_FOUND));
        }
        tx.commit().await?;

        tracing::info!(challenge_id = %id, "Challenge deleted");
        Ok(())
    }

    // ========================================================================
    // Stages
    // ========================================================================

    pub async fn stages(&self, challenge_id: ChallengeId) -> LearningResult<Vec<ChallengeStage>> {
        self.find(challenge_id).await?;
        self.store.list_stages(challenge_id).await
    }

    pub async fn add_stage(
        &self,
        challenge_id: ChallengeId,
        input: StageInput,
    ) -> LearningResult<ChallengeStage> {
        self.find(challenge_id).await?;

        let (Some(assessment_id), Some(position)) = (input.assessment_id, input.position) else {
            return Err(LearningError::Validation(
                "ID da avaliação e ordem são obrigatórios".to_string(),
            ));
        };
        self.ensure_assessment(assessment_id).await?;

        let stage = ChallengeStage {
            id: ChallengeStageId::new(),
            challenge_id,
            assessment_id,
            position,
        };
        self.store.create_stage(&stage).await?;

        tracing::info!(stage_id = %stage.id, challenge_id = %challenge_id, position, "Stage added");
        Ok(stage)
    }

    pub async fn update_stage(
        &self,
        id: ChallengeStageId,
        input: StageInput,
    ) -> LearningResult<ChallengeStage> {
        let mut stage = self
            .store
            .find_stage(id)
            .await?
            .ok_or(LearningError::NotFound(STAGE_NOT_FOUND))?;

        if let Some(assessment_id) = input.assessment_id {
            self.ensure_assessment(assessment_id).await?;
            stage.assessment_id = assessment_id;
        }
        if let Some(position) = input.position {
            stage.position = position;
        }
        self.store.update_stage(&stage).await?;
        Ok(stage)
    }

    pub async fn delete_stage(&self, id: ChallengeStageId) -> LearningResult<()> {
        if !self.store.delete_stage(id).await? {
            return Err(LearningError::NotFound(STAGE_NOT_FOUND));
        }
        tracing::info!(stage_id = %id, "Stage deleted");
        Ok(())
    }

    async fn find(&self, id: ChallengeId) -> LearningResult<Challenge> {
        self.store
            .find_challenge(id)
            .await?
            .ok_or(LearningError::NotFound(CHALLENGE_NOT_FOUND))
    }

    async fn ensure_assessment(&self, id: AssessmentId) -> LearningResult<()> {
        self.store
            .find_assessment(id)
            .await?
            .map(|_| ())
            .ok_or(LearningError::NotFound("Avaliação não encontrada"))
    }
}
