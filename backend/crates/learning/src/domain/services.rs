//! Domain Services
//!
//! Pure functions for scoring, progress and ledger arithmetic.
//! No I/O; all workflow decisions that can be computed up front live here.

use std::collections::HashMap;

use kernel::id::{AlternativeId, QuestionId};

use crate::domain::entity::{Alternative, QuestionSheet, Reward};
use crate::domain::value_object::RedemptionStatus;
use crate::error::{LearningError, LearningResult};

// ============================================================================
// Scoring
// ============================================================================

/// Aggregate score of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
    /// `round(100 · correct / total)`
    pub percent: i64,
    /// `ceil(100 · correct / total)`: one point per started percent
    pub points: i64,
}

impl Score {
    pub fn new(correct: u32, total: u32) -> Self {
        if total == 0 {
            return Self {
                correct: 0,
                total: 0,
                percent: 0,
                points: 0,
            };
        }
        let scaled = u64::from(correct) * 100;
        let total_u = u64::from(total);
        Self {
            correct,
            total,
            // round half up without floating point
            percent: ((scaled * 2 + total_u) / (total_u * 2)) as i64,
            points: scaled.div_ceil(total_u) as i64,
        }
    }
}

/// A question together with the alternative the account picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer<'a> {
    pub sheet: &'a QuestionSheet,
    pub chosen: &'a Alternative,
}

/// Match submitted answers against the assessment's questions
///
/// The answer set is keyed by question id (a repeated question keeps the
/// last choice) and must have exactly as many entries as the assessment has
/// questions. Each question must then resolve to one of its own alternatives.
pub fn grade<'a>(
    sheets: &'a [QuestionSheet],
    answers: &[(QuestionId, AlternativeId)],
) -> LearningResult<(Vec<GradedAnswer<'a>>, Score)> {
    if answers.is_empty() {
        return Err(LearningError::Validation(
            "É necessário fornecer ao menos uma resposta".to_string(),
        ));
    }

    let chosen: HashMap<QuestionId, AlternativeId> = answers.iter().copied().collect();
    if chosen.len() != sheets.len() {
        return Err(LearningError::IncompleteSubmission);
    }

    let mut graded = Vec::with_capacity(sheets.len());
    let mut correct = 0u32;
    for sheet in sheets {
        let alternative = chosen
            .get(&sheet.question.id)
            .and_then(|alt_id| sheet.alternatives.iter().find(|a| a.id == *alt_id))
            .ok_or_else(|| {
                LearningError::Validation(format!(
                    "Alternativa não encontrada para a questão {}",
                    sheet.question.id
                ))
            })?;
        if alternative.correct {
            correct += 1;
        }
        graded.push(GradedAnswer {
            sheet,
            chosen: alternative,
        });
    }

    Ok((graded, Score::new(correct, sheets.len() as u32)))
}

// ============================================================================
// Trail progress
// ============================================================================

/// `round(viewed / total · 100)`, 0 for an empty trail
pub fn progress_percent(viewed: i64, total: i64) -> i32 {
    if total <= 0 {
        return 0;
    }
    let viewed = viewed.clamp(0, total);
    ((viewed * 200 + total) / (total * 2)) as i32
}

// ============================================================================
// Rewards
// ============================================================================

/// Availability and balance checks before a redemption
pub fn ensure_redeemable(reward: &Reward, balance: i64) -> LearningResult<()> {
    if reward.is_exhausted() {
        return Err(LearningError::RewardExhausted);
    }
    if balance < reward.cost {
        return Err(LearningError::InsufficientCoins {
            balance,
            cost: reward.cost,
        });
    }
    Ok(())
}

/// What a status change has to do besides writing the new status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// Nothing to write
    Unchanged,
    /// Plain status update
    Update,
    /// Status update plus refund and stock restore
    Cancel,
}

pub fn plan_status_change(
    current: RedemptionStatus,
    next: RedemptionStatus,
) -> LearningResult<StatusTransition> {
    match (current.is_cancelled(), next.is_cancelled()) {
        (true, true) => Ok(StatusTransition::Unchanged),
        (true, false) => Err(LearningError::RedemptionClosed),
        (false, true) => Ok(StatusTransition::Cancel),
        (false, false) if current == next => Ok(StatusTransition::Unchanged),
        (false, false) => Ok(StatusTransition::Update),
    }
}

/// Parse the wire status of a status-change request
pub fn parse_status(raw: Option<&str>) -> LearningResult<RedemptionStatus> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LearningError::Validation("Status é obrigatório".to_string()))?;
    RedemptionStatus::from_code(raw).ok_or(LearningError::InvalidStatus)
}

// ============================================================================
// Certificates
// ============================================================================

/// Human-readable certificate code: `CERT-` + first 8 hex digits of the id
pub fn certificate_code(id: &uuid::Uuid) -> String {
    let simple = id.simple().to_string();
    format!("CERT-{}", simple[..8].to_uppercase())
}
