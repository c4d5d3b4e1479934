//! Assessment Engine Use Cases
//!
//! Authoring (assessments, questions, alternatives) and answer submission.
//! Deletes cascade explicitly inside one transaction since the schema does
//! not cascade.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{
    AccountId, AlternativeId, AssessmentId, ChallengeStageId, ContentId, QuestionId, TrailId,
};

use super::non_blank;
use crate::domain::entity::{
    Alternative, AnswerRecord, Assessment, ContentView, LedgerEntry, MIN_ALTERNATIVES, Question,
    QuestionSheet,
};
use crate::domain::repository::{LearningStore, LearningTx};
use crate::domain::services::{self, Score};
use crate::domain::value_object::LedgerEvent;
use crate::error::{LearningError, LearningResult};

const ASSESSMENT_NOT_FOUND: &str = "Avaliação não encontrada";
const QUESTION_NOT_FOUND: &str = "Questão não encontrada";
const ALTERNATIVE_NOT_FOUND: &str = "Alternativa não encontrada";

// ============================================================================
// Assessments
// ============================================================================

#[derive(Debug, Default)]
pub struct AssessmentInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content_id: Option<ContentId>,
    pub trail_id: Option<TrailId>,
    pub stage_id: Option<ChallengeStageId>,
}

/// Assessment with its questions and their alternatives
#[derive(Debug, Clone)]
pub struct AssessmentDetail {
    pub assessment: Assessment,
    pub questions: Vec<QuestionSheet>,
}

pub struct AssessmentUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> AssessmentUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> LearningResult<Vec<Assessment>> {
        self.store.list_assessments().await
    }

    pub async fn get(&self, id: AssessmentId) -> LearningResult<AssessmentDetail> {
        let assessment = find_assessment(&*self.store, id).await?;
        let questions = load_sheets(&*self.store, id).await?;
        Ok(AssessmentDetail {
            assessment,
            questions,
        })
    }

    pub async fn create(
        &self,
        manager_id: AccountId,
        input: AssessmentInput,
    ) -> LearningResult<Assessment> {
        let (Some(title), Some(description)) = (non_blank(input.title), non_blank(input.description))
        else {
            return Err(LearningError::Validation(
                "Dados incompletos. Forneça título e descrição para a avaliação".to_string(),
            ));
        };

        let now = Utc::now();
        let assessment = Assessment {
            id: AssessmentId::new(),
            title,
            description,
            content_id: input.content_id,
            trail_id: input.trail_id,
            stage_id: input.stage_id,
            manager_id,
            created_at: now,
            updated_at: now,
        };
        if !assessment.has_parent() {
            return Err(LearningError::Validation(
                "A avaliação precisa estar associada a um conteúdo, uma trilha ou uma etapa de desafio"
                    .to_string(),
            ));
        }
        self.ensure_parents(&assessment).await?;

        self.store.create_assessment(&assessment).await?;

        tracing::info!(assessment_id = %assessment.id, manager_id = %manager_id, "Assessment created");
        Ok(assessment)
    }

    pub async fn update(
        &self,
        id: AssessmentId,
        input: AssessmentInput,
    ) -> LearningResult<Assessment> {
        let mut assessment = find_assessment(&*self.store, id).await?;

        if let Some(title) = non_blank(input.title) {
            assessment.title = title;
        }
        if let Some(description) = non_blank(input.description) {
            assessment.description = description;
        }
        if input.content_id.is_some() {
            assessment.content_id = input.content_id;
        }
        if input.trail_id.is_some() {
            assessment.trail_id = input.trail_id;
        }
        if input.stage_id.is_some() {
            assessment.stage_id = input.stage_id;
        }
        self.ensure_parents(&assessment).await?;

        assessment.updated_at = Utc::now();
        self.store.update_assessment(&assessment).await?;
        Ok(assessment)
    }

    /// Delete answers, alternatives, questions and the assessment together
    pub async fn delete(&self, id: AssessmentId) -> LearningResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_assessment(id).await? {
            return Err(LearningError::NotFound(ASSESSMENT_NOT_FOUND));
        }
        tx.commit().await?;

        tracing::info!(assessment_id = %id, "Assessment deleted");
        Ok(())
    }

    async fn ensure_parents(&self, assessment: &Assessment) -> LearningResult<()> {
        if let Some(content_id) = assessment.content_id {
            if self.store.find_content(content_id).await?.is_none() {
                return Err(LearningError::NotFound("Conteúdo não encontrado"));
            }
        }
        if let Some(trail_id) = assessment.trail_id {
            if self.store.find_trail(trail_id).await?.is_none() {
                return Err(LearningError::NotFound("Trilha não encontrada"));
            }
        }
        if let Some(stage_id) = assessment.stage_id {
            if self.store.find_stage(stage_id).await?.is_none() {
                return Err(LearningError::NotFound("Etapa de desafio não encontrada"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Questions
// ============================================================================

#[derive(Debug, Default)]
pub struct AlternativeInput {
    pub text: Option<String>,
    pub correct: Option<bool>,
}

#[derive(Debug, Default)]
pub struct QuestionInput {
    pub text: Option<String>,
    pub alternatives: Vec<AlternativeInput>,
}

pub struct QuestionUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> QuestionUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self, assessment_id: AssessmentId) -> LearningResult<Vec<QuestionSheet>> {
        find_assessment(&*self.store, assessment_id).await?;
        load_sheets(&*self.store, assessment_id).await
    }

    /// Insert the question with all of its alternatives atomically
    pub async fn create(
        &self,
        assessment_id: AssessmentId,
        input: QuestionInput,
    ) -> LearningResult<QuestionSheet> {
        find_assessment(&*self.store, assessment_id).await?;

        let incomplete = || {
            LearningError::Validation(
                "Dados incompletos. Forneça texto e pelo menos duas alternativas".to_string(),
            )
        };
        let text = non_blank(input.text).ok_or_else(incomplete)?;
        if input.alternatives.len() < MIN_ALTERNATIVES {
            return Err(incomplete());
        }

        let question = Question {
            id: QuestionId::new(),
            assessment_id,
            text,
            created_at: Utc::now(),
        };
        let alternatives = input
            .alternatives
            .into_iter()
            .map(|alt| {
                Ok(Alternative {
                    id: AlternativeId::new(),
                    question_id: question.id,
                    text: non_blank(alt.text).ok_or_else(incomplete)?,
                    correct: alt.correct.unwrap_or(false),
                })
            })
            .collect::<LearningResult<Vec<_>>>()?;
        if !alternatives.iter().any(|a| a.correct) {
            return Err(LearningError::Validation(
                "É necessário indicar pelo menos uma alternativa como correta".to_string(),
            ));
        }

        let mut tx = self.store.begin().await?;
        tx.insert_question(&question, &alternatives).await?;
        tx.commit().await?;

        tracing::info!(
            question_id = %question.id,
            assessment_id = %assessment_id,
            alternatives = alternatives.len(),
            "Question created"
        );
        Ok(QuestionSheet {
            question,
            alternatives,
        })
    }

    pub async fn update(&self, id: QuestionId, text: Option<String>) -> LearningResult<Question> {
        let mut question = find_question(&*self.store, id).await?;
        let text = non_blank(text)
            .ok_or_else(|| LearningError::Validation("Texto da questão é obrigatório".to_string()))?;
        question.text = text;
        self.store.update_question(&question).await?;
        Ok(question)
    }

    /// Delete recorded answers, alternatives and the question together
    pub async fn delete(&self, id: QuestionId) -> LearningResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_question(id).await? {
            return Err(LearningError::NotFound(QUESTION_NOT_FOUND));
        }
        tx.commit().await?;

        tracing::info!(question_id = %id, "Question deleted");
        Ok(())
    }
}

// ============================================================================
// Alternatives
// ============================================================================

pub struct AlternativeUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> AlternativeUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self, question_id: QuestionId) -> LearningResult<Vec<Alternative>> {
        find_question(&*self.store, question_id).await?;
        self.store.list_alternatives(question_id).await
    }

    pub async fn create(
        &self,
        question_id: QuestionId,
        input: AlternativeInput,
    ) -> LearningResult<Alternative> {
        find_question(&*self.store, question_id).await?;

        let (Some(text), Some(correct)) = (non_blank(input.text), input.correct) else {
            return Err(LearningError::Validation(
                "Dados incompletos. Forneça texto e indique se é correta".to_string(),
            ));
        };

        let alternative = Alternative {
            id: AlternativeId::new(),
            question_id,
            text,
            correct,
        };
        self.store.create_alternative(&alternative).await?;
        Ok(alternative)
    }

    pub async fn update(
        &self,
        id: AlternativeId,
        input: AlternativeInput,
    ) -> LearningResult<Alternative> {
        let mut alternative = self.find(id).await?;
        if let Some(text) = non_blank(input.text) {
            alternative.text = text;
        }
        if let Some(correct) = input.correct {
            alternative.correct = correct;
        }
        self.store.update_alternative(&alternative).await?;
        Ok(alternative)
    }

    /// Refused while the question is at the alternative floor
    pub async fn delete(&self, id: AlternativeId) -> LearningResult<()> {
        let alternative = self.find(id).await?;

        let mut tx = self.store.begin().await?;
        // serializes concurrent deletes on the same question
        if tx.lock_question(alternative.question_id).await?.is_none() {
            return Err(LearningError::NotFound(QUESTION_NOT_FOUND));
        }
        if tx.count_alternatives(alternative.question_id).await? <= MIN_ALTERNATIVES as i64 {
            return Err(LearningError::AlternativeFloor);
        }
        if !tx.delete_alternative(id).await? {
            return Err(LearningError::NotFound(ALTERNATIVE_NOT_FOUND));
        }
        tx.commit().await?;

        tracing::info!(alternative_id = %id, question_id = %alternative.question_id, "Alternative deleted");
        Ok(())
    }

    async fn find(&self, id: AlternativeId) -> LearningResult<Alternative> {
        self.store
            .find_alternative(id)
            .await?
            .ok_or(LearningError::NotFound(ALTERNATIVE_NOT_FOUND))
    }
}

// ============================================================================
// Submission
// ============================================================================

/// One graded answer
#[derive(Debug, Clone)]
pub struct AnswerBreakdown {
    pub question_id: QuestionId,
    pub question_text: String,
    pub chosen: Alternative,
}

#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub assessment_id: AssessmentId,
    pub score: Score,
    pub answers: Vec<AnswerBreakdown>,
}

pub struct SubmitAnswersUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> SubmitAnswersUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Grade and record a submission
    ///
    /// Answer rows, the content view side effect and the point award are
    /// committed together.
    pub async fn execute(
        &self,
        account_id: AccountId,
        assessment_id: AssessmentId,
        answers: &[(QuestionId, AlternativeId)],
    ) -> LearningResult<SubmissionResult> {
        let assessment = find_assessment(&*self.store, assessment_id).await?;
        let sheets = load_sheets(&*self.store, assessment_id).await?;

        let (graded, score) = services::grade(&sheets, answers)?;

        let mut tx = self.store.begin().await?;
        for answer in &graded {
            tx.insert_answer(&AnswerRecord::now(account_id, answer.chosen.id))
                .await?;
        }
        if let Some(content_id) = assessment.content_id {
            tx.insert_view(&ContentView::now(account_id, content_id))
                .await?;
        }
        // every attempt is recorded, a zero score included
        let entry = LedgerEntry::new(
            account_id,
            LedgerEvent::Assessment,
            assessment_id,
            score.points,
            format!(
                "Avaliação '{}' - {}% de acerto",
                assessment.title, score.percent
            ),
        );
        tx.append_points(&entry).await?;
        tx.commit().await?;

        tracing::info!(
            account_id = %account_id,
            assessment_id = %assessment_id,
            correct = score.correct,
            total = score.total,
            points = score.points,
            "Assessment submitted"
        );

        let answers = graded
            .into_iter()
            .map(|g| AnswerBreakdown {
                question_id: g.sheet.question.id,
                question_text: g.sheet.question.text.clone(),
                chosen: g.chosen.clone(),
            })
            .collect();

        Ok(SubmissionResult {
            assessment_id,
            score,
            answers,
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn find_assessment<S: LearningStore>(store: &S, id: AssessmentId) -> LearningResult<Assessment> {
    store
        .find_assessment(id)
        .await?
        .ok_or(LearningError::NotFound(ASSESSMENT_NOT_FOUND))
}

async fn find_question<S: LearningStore>(store: &S, id: QuestionId) -> LearningResult<Question> {
    store
        .find_question(id)
        .await?
        .ok_or(LearningError::NotFound(QUESTION_NOT_FOUND))
}

async fn load_sheets<S: LearningStore>(
    store: &S,
    assessment_id: AssessmentId,
) -> LearningResult<Vec<QuestionSheet>> {
    let questions = store.list_questions(assessment_id).await?;
    let alternatives = store.assessment_alternatives(assessment_id).await?;
    Ok(QuestionSheet::assemble(questions, alternatives))
}
