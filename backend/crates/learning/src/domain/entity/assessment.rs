//! Assessment Engine entities

use chrono::{DateTime, Utc};
use kernel::id::{
    AccountId, AlternativeId, AssessmentId, ChallengeId, ChallengeStageId, ContentId, QuestionId,
    TrailId,
};
use uuid::Uuid;

/// Minimum number of alternatives a question must keep
pub const MIN_ALTERNATIVES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub id: AssessmentId,
    pub title: String,
    pub description: String,
    pub content_id: Option<ContentId>,
    pub trail_id: Option<TrailId>,
    pub stage_id: Option<ChallengeStageId>,
    pub manager_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    pub fn has_parent(&self) -> bool {
        self.content_id.is_some() || self.trail_id.is_some() || self.stage_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub assessment_id: AssessmentId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub id: AlternativeId,
    pub question_id: QuestionId,
    pub text: String,
    pub correct: bool,
}

/// Question together with its alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSheet {
    pub question: Question,
    pub alternatives: Vec<Alternative>,
}

impl QuestionSheet {
    /// Group flat alternatives under their questions, keeping question order
    pub fn assemble(questions: Vec<Question>, alternatives: Vec<Alternative>) -> Vec<Self> {
        questions
            .into_iter()
            .map(|question| {
                let alternatives = alternatives
                    .iter()
                    .filter(|a| a.question_id == question.id)
                    .cloned()
                    .collect();
                QuestionSheet {
                    question,
                    alternatives,
                }
            })
            .collect()
    }
}

/// One recorded answer; history accumulates across submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub id: Uuid,
    pub account_id: AccountId,
    pub alternative_id: AlternativeId,
    pub answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn now(account_id: AccountId, alternative_id: AlternativeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            alternative_id,
            answered_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub id: ChallengeId,
    pub name: String,
    pub description: String,
    pub manager_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Links a challenge to one assessment at a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeStage {
    pub id: ChallengeStageId,
    pub challenge_id: ChallengeId,
    pub assessment_id: AssessmentId,
    pub position: i32,
}
