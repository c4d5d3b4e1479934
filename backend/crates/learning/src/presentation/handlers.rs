//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use auth::Caller;
use kernel::extract::{ApiJson, ApiPath};
use kernel::id::{
    AccountId, AlternativeId, AssessmentId, CertificateId, ChallengeId, ChallengeStageId,
    ContentId, ModuleId, QuestionId, RedemptionId, RewardId, TrailId,
};
use std::sync::Arc;

use crate::application::{
    AlternativeUseCase, AssessmentUseCase, CertificateQueryUseCase, ChallengeUseCase,
    ChangeRedemptionStatusUseCase, CoinBalanceUseCase, ContentUseCase, IssueCertificateUseCase,
    LearningConfig, ModuleUseCase, QuestionUseCase, RedeemRewardUseCase, RewardUseCase,
    SubmitAnswersUseCase, TrailUseCase, ViewOutcome,
};
use crate::domain::repository::LearningStore;
use crate::error::LearningResult;
use crate::presentation::dto::{
    AlternativeRequest, AlternativeResponse, AssessmentDetailResponse, AssessmentRequest,
    AssessmentResponse, BalanceResponse, CertificateDocumentResponse, CertificatePrint,
    CertificateResponse, ChallengeDetailResponse, ChallengeRequest, ChallengeResponse,
    ContentRequest, ContentResponse, IssueCertificateResponse, MessageResponse, ModuleRequest,
    ModuleResponse, ProgressDetails, ProgressReportResponse, ProgressResponse, QuestionRequest,
    QuestionResponse, RedeemResponse, RedemptionListResponse, RedemptionResponse, RewardRequest,
    RewardResponse, StageRequest, StageResponse, StartTrailResponse, StatusChangeResponse,
    StatusRequest, SubmissionResponse, SubmitRequest, TrailDetailResponse, TrailRequest,
    TrailResponse, ViewedResponse,
};

/// Shared state for learning handlers
#[derive(Clone)]
pub struct LearningAppState<S>
where
    S: LearningStore,
{
    pub store: Arc<S>,
    pub config: Arc<LearningConfig>,
}

impl<S> LearningAppState<S>
where
    S: LearningStore,
{
    pub fn new(store: S, config: LearningConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Modules
// ============================================================================

/// GET /modules
pub async fn list_modules<S>(
    State(state): State<LearningAppState<S>>,
) -> LearningResult<Json<Vec<ModuleResponse>>>
where
    S: LearningStore,
{
    let modules = ModuleUseCase::new(state.store.clone()).list().await?;
    Ok(Json(modules.iter().map(ModuleResponse::from).collect()))
}

/// GET /modules/{id}
pub async fn get_module<S>(
    State(state): State<LearningAppState<S>>,
    ApiPath(id): ApiPath<ModuleId>,
) -> LearningResult<Json<ModuleResponse>>
where
    S: LearningStore,
{
    let module = ModuleUseCase::new(state.store.clone()).get(id).await?;
    Ok(Json(ModuleResponse::from(&module)))
}

/// POST /modules
pub async fn create_module<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiJson(req): ApiJson<ModuleRequest>,
) -> LearningResult<(StatusCode, Json<ModuleResponse>)>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let module = ModuleUseCase::new(state.store.clone())
        .create(caller.id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ModuleResponse::from(&module))))
}

/// PUT /modules/{id}
pub async fn update_module<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ModuleId>,
    ApiJson(req): ApiJson<ModuleRequest>,
) -> LearningResult<Json<ModuleResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let module = ModuleUseCase::new(state.store.clone())
        .update(id, req.into())
        .await?;
    Ok(Json(ModuleResponse::from(&module)))
}

/// DELETE /modules/{id}
pub async fn delete_module<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ModuleId>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    ModuleUseCase::new(state.store.clone()).delete(id).await?;
    Ok(Json(MessageResponse::new("Módulo excluído com sucesso")))
}

// ============================================================================
// Contents
// ============================================================================

/// GET /contents
pub async fn list_contents<S>(
    State(state): State<LearningAppState<S>>,
) -> LearningResult<Json<Vec<ContentResponse>>>
where
    S: LearningStore,
{
    let contents = ContentUseCase::new(state.store.clone(), state.config.clone())
        .list()
        .await?;
    Ok(Json(contents.iter().map(ContentResponse::from).collect()))
}

/// GET /contents/module/{id}
pub async fn list_module_contents<S>(
    State(state): State<LearningAppState<S>>,
    ApiPath(module_id): ApiPath<ModuleId>,
) -> LearningResult<Json<Vec<ContentResponse>>>
where
    S: LearningStore,
{
    let contents = ContentUseCase::new(state.store.clone(), state.config.clone())
        .list_by_module(module_id)
        .await?;
    Ok(Json(contents.iter().map(ContentResponse::from).collect()))
}

/// GET /contents/{id}
pub async fn get_content<S>(
    State(state): State<LearningAppState<S>>,
    ApiPath(id): ApiPath<ContentId>,
) -> LearningResult<Json<ContentResponse>>
where
    S: LearningStore,
{
    let content = ContentUseCase::new(state.store.clone(), state.config.clone())
        .get(id)
        .await?;
    Ok(Json(ContentResponse::from(&content)))
}

/// POST /contents
pub async fn create_content<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiJson(req): ApiJson<ContentRequest>,
) -> LearningResult<(StatusCode, Json<ContentResponse>)>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let content = ContentUseCase::new(state.store.clone(), state.config.clone())
        .create(req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ContentResponse::from(&content))))
}

/// PUT /contents/{id}
pub async fn update_content<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ContentId>,
    ApiJson(req): ApiJson<ContentRequest>,
) -> LearningResult<Json<ContentResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let content = ContentUseCase::new(state.store.clone(), state.config.clone())
        .update(id, req.into())
        .await?;
    Ok(Json(ContentResponse::from(&content)))
}

/// DELETE /contents/{id}
pub async fn delete_content<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ContentId>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    ContentUseCase::new(state.store.clone(), state.config.clone())
        .delete(id)
        .await?;
    Ok(Json(MessageResponse::new("Conteúdo excluído com sucesso")))
}

/// POST /contents/{id}/mark-viewed
pub async fn mark_viewed<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ContentId>,
) -> LearningResult<Json<ViewedResponse>>
where
    S: LearningStore,
{
    let outcome = ContentUseCase::new(state.store.clone(), state.config.clone())
        .mark_viewed(caller.id, id)
        .await?;

    let response = match outcome {
        ViewOutcome::Marked { points } => ViewedResponse {
            message: "Conteúdo marcado como assistido com sucesso".to_string(),
            pontos: Some(points),
        },
        ViewOutcome::AlreadyViewed => ViewedResponse {
            message: "Conteúdo já foi marcado como assistido".to_string(),
            pontos: None,
        },
    };
    Ok(Json(response))
}

// ============================================================================
// Trails
// ============================================================================

/// GET /trails
pub async fn list_trails<S>(
    State(state): State<LearningAppState<S>>,
) -> LearningResult<Json<Vec<TrailResponse>>>
where
    S: LearningStore,
{
    let trails = TrailUseCase::new(state.store.clone()).list().await?;
    Ok(Json(trails.iter().map(TrailResponse::from).collect()))
}

/// GET /trails/{id}
pub async fn get_trail<S>(
    State(state): State<LearningAppState<S>>,
    ApiPath(id): ApiPath<TrailId>,
) -> LearningResult<Json<TrailDetailResponse>>
where
    S: LearningStore,
{
    let detail = TrailUseCase::new(state.store.clone()).get(id).await?;
    Ok(Json(TrailDetailResponse::from(&detail)))
}

/// POST /trails
pub async fn create_trail<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiJson(req): ApiJson<TrailRequest>,
) -> LearningResult<(StatusCode, Json<TrailDetailResponse>)>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let detail = TrailUseCase::new(state.store.clone())
        .create(caller.id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(TrailDetailResponse::from(&detail))))
}

/// PUT /trails/{id}
pub async fn update_trail<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<TrailId>,
    ApiJson(req): ApiJson<TrailRequest>,
) -> LearningResult<Json<TrailDetailResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let detail = TrailUseCase::new(state.store.clone())
        .update(id, req.into())
        .await?;
    Ok(Json(TrailDetailResponse::from(&detail)))
}

/// DELETE /trails/{id}
pub async fn delete_trail<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<TrailId>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    TrailUseCase::new(state.store.clone()).delete(id).await?;
    Ok(Json(MessageResponse::new(
        "Trilha de aprendizagem excluída com sucesso",
    )))
}

/// POST /trails/{id}/start
pub async fn start_trail<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<TrailId>,
) -> LearningResult<(StatusCode, Json<StartTrailResponse>)>
where
    S: LearningStore,
{
    let (progress, started) = TrailUseCase::new(state.store.clone())
        .start(caller.id, id)
        .await?;

    let (status, message) = if started {
        (
            StatusCode::CREATED,
            "Trilha de aprendizagem iniciada com sucesso",
        )
    } else {
        (
            StatusCode::OK,
            "Você já iniciou esta trilha de aprendizagem anteriormente",
        )
    };

    Ok((
        status,
        Json(StartTrailResponse {
            message: message.to_string(),
            progresso: ProgressResponse::from(&progress),
        }),
    ))
}

/// GET /trails/{id}/progress
pub async fn trail_progress<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<TrailId>,
) -> LearningResult<Json<ProgressReportResponse>>
where
    S: LearningStore,
{
    let report = TrailUseCase::new(state.store.clone())
        .progress(caller.id, id)
        .await?;

    Ok(Json(ProgressReportResponse {
        detalhes: ProgressDetails {
            total_conteudos: report.total_contents,
            conteudos_assistidos: report.viewed_contents,
            porcentagem: report.progress.percent,
        },
        progresso: ProgressResponse::from(&report.progress),
    }))
}

/// POST /trails/{id}/certificate
pub async fn issue_certificate<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<TrailId>,
) -> LearningResult<(StatusCode, Json<IssueCertificateResponse>)>
where
    S: LearningStore,
{
    let (certificate, issued) =
        IssueCertificateUseCase::new(state.store.clone(), state.config.clone())
            .execute(caller.id, id)
            .await?;

    let (status, message) = if issued {
        (StatusCode::CREATED, "Certificado emitido com sucesso")
    } else {
        (StatusCode::OK, "Certificado já emitido anteriormente")
    };

    Ok((
        status,
        Json(IssueCertificateResponse {
            message: message.to_string(),
            certificado: CertificateResponse::from(&certificate),
        }),
    ))
}

// ============================================================================
// Assessments
// ============================================================================

/// GET /assessments
pub async fn list_assessments<S>(
    State(state): State<LearningAppState<S>>,
) -> LearningResult<Json<Vec<AssessmentResponse>>>
where
    S: LearningStore,
{
    let assessments = AssessmentUseCase::new(state.store.clone()).list().await?;
    Ok(Json(
        assessments.iter().map(AssessmentResponse::from).collect(),
    ))
}

/// GET /assessments/{id}
pub async fn get_assessment<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AssessmentId>,
) -> LearningResult<Json<AssessmentDetailResponse>>
where
    S: LearningStore,
{
    let detail = AssessmentUseCase::new(state.store.clone()).get(id).await?;
    Ok(Json(AssessmentDetailResponse::new(
        &detail,
        caller.role.is_elevated(),
    )))
}

/// POST /assessments
pub async fn create_assessment<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiJson(req): ApiJson<AssessmentRequest>,
) -> LearningResult<(StatusCode, Json<AssessmentResponse>)>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let assessment = AssessmentUseCase::new(state.store.clone())
        .create(caller.id, req.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AssessmentResponse::from(&assessment)),
    ))
}

/// PUT /assessments/{id}
pub async fn update_assessment<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AssessmentId>,
    ApiJson(req): ApiJson<AssessmentRequest>,
) -> LearningResult<Json<AssessmentResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let assessment = AssessmentUseCase::new(state.store.clone())
        .update(id, req.into())
        .await?;
    Ok(Json(AssessmentResponse::from(&assessment)))
}

/// DELETE /assessments/{id}
pub async fn delete_assessment<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AssessmentId>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    AssessmentUseCase::new(state.store.clone()).delete(id).await?;
    Ok(Json(MessageResponse::new("Avaliação excluída com sucesso")))
}

/// POST /assessments/{id}/submit
pub async fn submit_answers<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AssessmentId>,
    ApiJson(req): ApiJson<SubmitRequest>,
) -> LearningResult<Json<SubmissionResponse>>
where
    S: LearningStore,
{
    let result = SubmitAnswersUseCase::new(state.store.clone())
        .execute(caller.id, id, &req.answers())
        .await?;
    Ok(Json(SubmissionResponse::from(&result)))
}

// ----------------------------------------------------------------------------
// Questions
// ----------------------------------------------------------------------------

/// GET /assessments/{id}/questions
pub async fn list_questions<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AssessmentId>,
) -> LearningResult<Json<Vec<QuestionResponse>>>
where
    S: LearningStore,
{
    let reveal = caller.role.is_elevated();
    let sheets = QuestionUseCase::new(state.store.clone()).list(id).await?;
    Ok(Json(
        sheets
            .iter()
            .map(|s| QuestionResponse::new(s, reveal))
            .collect(),
    ))
}

/// POST /assessments/{id}/questions
pub async fn create_question<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AssessmentId>,
    ApiJson(req): ApiJson<QuestionRequest>,
) -> LearningResult<(StatusCode, Json<QuestionResponse>)>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let sheet = QuestionUseCase::new(state.store.clone())
        .create(id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(QuestionResponse::new(&sheet, true))))
}

/// PUT /assessments/questions/{id}
pub async fn update_question<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<QuestionId>,
    ApiJson(req): ApiJson<QuestionRequest>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    QuestionUseCase::new(state.store.clone())
        .update(id, req.texto)
        .await?;
    Ok(Json(MessageResponse::new("Questão atualizada com sucesso")))
}

/// DELETE /assessments/questions/{id}
pub async fn delete_question<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<QuestionId>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    QuestionUseCase::new(state.store.clone()).delete(id).await?;
    Ok(Json(MessageResponse::new("Questão excluída com sucesso")))
}

// ----------------------------------------------------------------------------
// Alternatives
// ----------------------------------------------------------------------------

/// GET /assessments/questions/{id}/alternatives
pub async fn list_alternatives<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<QuestionId>,
) -> LearningResult<Json<Vec<AlternativeResponse>>>
where
    S: LearningStore,
{
    let reveal = caller.role.is_elevated();
    let alternatives = AlternativeUseCase::new(state.store.clone()).list(id).await?;
    Ok(Json(
        alternatives
            .iter()
            .map(|a| AlternativeResponse::new(a, reveal))
            .collect(),
    ))
}

/// POST /assessments/questions/{id}/alternatives
pub async fn create_alternative<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<QuestionId>,
    ApiJson(req): ApiJson<AlternativeRequest>,
) -> LearningResult<(StatusCode, Json<AlternativeResponse>)>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let alternative = AlternativeUseCase::new(state.store.clone())
        .create(id, req.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AlternativeResponse::new(&alternative, true)),
    ))
}

/// PUT /assessments/alternatives/{id}
pub async fn update_alternative<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AlternativeId>,
    ApiJson(req): ApiJson<AlternativeRequest>,
) -> LearningResult<Json<AlternativeResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let alternative = AlternativeUseCase::new(state.store.clone())
        .update(id, req.into())
        .await?;
    Ok(Json(AlternativeResponse::new(&alternative, true)))
}

/// DELETE /assessments/alternatives/{id}
pub async fn delete_alternative<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AlternativeId>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    AlternativeUseCase::new(state.store.clone())
        .delete(id)
        .await?;
    Ok(Json(MessageResponse::new("Alternativa excluída com sucesso")))
}

// ============================================================================
// Challenges
// ============================================================================

/// GET /challenges
pub async fn list_challenges<S>(
    State(state): State<LearningAppState<S>>,
) -> LearningResult<Json<Vec<ChallengeResponse>>>
where
    S: LearningStore,
{
    let challenges = ChallengeUseCase::new(state.store.clone()).list().await?;
    Ok(Json(challenges.iter().map(ChallengeResponse::from).collect()))
}

/// GET /challenges/{id}
pub async fn get_challenge<S>(
    State(state): State<LearningAppState<S>>,
    ApiPath(id): ApiPath<ChallengeId>,
) -> LearningResult<Json<ChallengeDetailResponse>>
where
    S: LearningStore,
{
    let detail = ChallengeUseCase::new(state.store.clone()).get(id).await?;
    Ok(Json(ChallengeDetailResponse::from(&detail)))
}

/// POST /challenges
pub async fn create_challenge<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiJson(req): ApiJson<ChallengeRequest>,
) -> LearningResult<(StatusCode, Json<ChallengeResponse>)>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let challenge = ChallengeUseCase::new(state.store.clone())
        .create(caller.id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ChallengeResponse::from(&challenge))))
}

/// PUT /challenges/{id}
pub async fn update_challenge<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ChallengeId>,
    ApiJson(req): ApiJson<ChallengeRequest>,
) -> LearningResult<Json<ChallengeResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let challenge = ChallengeUseCase::new(state.store.clone())
        .update(id, req.into())
        .await?;
    Ok(Json(ChallengeResponse::from(&challenge)))
}

/// DELETE /challenges/{id}
pub async fn delete_challenge<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ChallengeId>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    ChallengeUseCase::new(state.store.clone()).delete(id).await?;
    Ok(Json(MessageResponse::new("Desafio excluído com sucesso")))
}

/// GET /challenges/{id}/stages
pub async fn list_stages<S>(
    State(state): State<LearningAppState<S>>,
    ApiPath(id): ApiPath<ChallengeId>,
) -> LearningResult<Json<Vec<StageResponse>>>
where
    S: LearningStore,
{
    let stages = ChallengeUseCase::new(state.store.clone()).stages(id).await?;
    Ok(Json(stages.iter().map(StageResponse::from).collect()))
}

/// POST /challenges/{id}/stages
pub async fn create_stage<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ChallengeId>,
    ApiJson(req): ApiJson<StageRequest>,
) -> LearningResult<(StatusCode, Json<StageResponse>)>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let stage = ChallengeUseCase::new(state.store.clone())
        .add_stage(id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(StageResponse::from(&stage))))
}

/// PUT /challenges/stages/{id}
pub async fn update_stage<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ChallengeStageId>,
    ApiJson(req): ApiJson<StageRequest>,
) -> LearningResult<Json<StageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let stage = ChallengeUseCase::new(state.store.clone())
        .update_stage(id, req.into())
        .await?;
    Ok(Json(StageResponse::from(&stage)))
}

/// DELETE /challenges/stages/{id}
pub async fn delete_stage<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<ChallengeStageId>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    ChallengeUseCase::new(state.store.clone())
        .delete_stage(id)
        .await?;
    Ok(Json(MessageResponse::new("Etapa excluída com sucesso")))
}

// ============================================================================
// Rewards
// ============================================================================

/// GET /rewards
pub async fn list_rewards<S>(
    State(state): State<LearningAppState<S>>,
) -> LearningResult<Json<Vec<RewardResponse>>>
where
    S: LearningStore,
{
    let rewards = RewardUseCase::new(state.store.clone()).list().await?;
    Ok(Json(rewards.iter().map(RewardResponse::from).collect()))
}

/// GET /rewards/{id}
pub async fn get_reward<S>(
    State(state): State<LearningAppState<S>>,
    ApiPath(id): ApiPath<RewardId>,
) -> LearningResult<Json<RewardResponse>>
where
    S: LearningStore,
{
    let reward = RewardUseCase::new(state.store.clone()).get(id).await?;
    Ok(Json(RewardResponse::from(&reward)))
}

/// POST /rewards
pub async fn create_reward<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiJson(req): ApiJson<RewardRequest>,
) -> LearningResult<(StatusCode, Json<RewardResponse>)>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let reward = RewardUseCase::new(state.store.clone())
        .create(caller.id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(RewardResponse::from(&reward))))
}

/// PUT /rewards/{id}
pub async fn update_reward<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<RewardId>,
    ApiJson(req): ApiJson<RewardRequest>,
) -> LearningResult<Json<RewardResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let reward = RewardUseCase::new(state.store.clone())
        .update(id, req.into())
        .await?;
    Ok(Json(RewardResponse::from(&reward)))
}

/// DELETE /rewards/{id}
pub async fn delete_reward<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<RewardId>,
) -> LearningResult<Json<MessageResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    RewardUseCase::new(state.store.clone()).delete(id).await?;
    Ok(Json(MessageResponse::new("Recompensa excluída com sucesso")))
}

/// POST /rewards/{id}/redeem
pub async fn redeem_reward<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<RewardId>,
) -> LearningResult<Json<RedeemResponse>>
where
    S: LearningStore,
{
    let detail = RedeemRewardUseCase::new(state.store.clone())
        .execute(caller.id, id)
        .await?;

    Ok(Json(RedeemResponse {
        message: "Recompensa resgatada com sucesso".to_string(),
        resgate: RedemptionResponse::from(&detail),
    }))
}

/// GET /rewards/mine
pub async fn my_redemptions<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
) -> LearningResult<Json<RedemptionListResponse>>
where
    S: LearningStore,
{
    redemptions_of(&state, caller.id).await
}

/// GET /rewards/user/{id}
pub async fn account_redemptions<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AccountId>,
) -> LearningResult<Json<RedemptionListResponse>>
where
    S: LearningStore,
{
    caller.require_self_or_elevated(id)?;
    redemptions_of(&state, id).await
}

async fn redemptions_of<S>(
    state: &LearningAppState<S>,
    account_id: AccountId,
) -> LearningResult<Json<RedemptionListResponse>>
where
    S: LearningStore,
{
    let redemptions = CoinBalanceUseCase::new(state.store.clone())
        .redemptions(account_id)
        .await?;
    Ok(Json(RedemptionListResponse {
        resgates: redemptions.iter().map(RedemptionResponse::from).collect(),
    }))
}

/// GET /rewards/balance
pub async fn my_balance<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
) -> LearningResult<Json<BalanceResponse>>
where
    S: LearningStore,
{
    balance_of(&state, caller.id).await
}

/// GET /rewards/balance/user/{id}
pub async fn account_balance<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AccountId>,
) -> LearningResult<Json<BalanceResponse>>
where
    S: LearningStore,
{
    caller.require_self_or_elevated(id)?;
    balance_of(&state, id).await
}

async fn balance_of<S>(
    state: &LearningAppState<S>,
    account_id: AccountId,
) -> LearningResult<Json<BalanceResponse>>
where
    S: LearningStore,
{
    let statement = CoinBalanceUseCase::new(state.store.clone())
        .execute(account_id)
        .await?;
    Ok(Json(BalanceResponse::from(&statement)))
}

/// PUT /redemptions/{id}/status
pub async fn change_redemption_status<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<RedemptionId>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> LearningResult<Json<StatusChangeResponse>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let detail = ChangeRedemptionStatusUseCase::new(state.store.clone())
        .execute(id, req.status.as_deref())
        .await?;

    Ok(Json(StatusChangeResponse {
        message: format!(
            "Status do resgate alterado para {}",
            detail.redemption.status
        ),
        resgate: RedemptionResponse::from(&detail),
    }))
}

// ============================================================================
// Certificates
// ============================================================================

/// GET /certificates
pub async fn list_certificates<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
) -> LearningResult<Json<Vec<CertificateResponse>>>
where
    S: LearningStore,
{
    caller.require_elevated()?;

    let certificates = CertificateQueryUseCase::new(state.store.clone())
        .list()
        .await?;
    Ok(Json(
        certificates.iter().map(CertificateResponse::from).collect(),
    ))
}

/// GET /certificates/user/{id}
pub async fn account_certificates<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<AccountId>,
) -> LearningResult<Json<Vec<CertificateResponse>>>
where
    S: LearningStore,
{
    caller.require_self_or_elevated(id)?;

    let certificates = CertificateQueryUseCase::new(state.store.clone())
        .for_account(id)
        .await?;
    Ok(Json(
        certificates.iter().map(CertificateResponse::from).collect(),
    ))
}

/// GET /certificates/{id}
pub async fn get_certificate<S>(
    State(state): State<LearningAppState<S>>,
    ApiPath(id): ApiPath<CertificateId>,
) -> LearningResult<Json<CertificateResponse>>
where
    S: LearningStore,
{
    let certificate = CertificateQueryUseCase::new(state.store.clone())
        .get(id)
        .await?;
    Ok(Json(CertificateResponse::from(&certificate)))
}

/// GET /certificates/{id}/document
pub async fn certificate_document<S>(
    State(state): State<LearningAppState<S>>,
    caller: Caller,
    ApiPath(id): ApiPath<CertificateId>,
) -> LearningResult<Json<CertificateDocumentResponse>>
where
    S: LearningStore,
{
    let document = CertificateQueryUseCase::new(state.store.clone())
        .document(&caller, id)
        .await?;

    Ok(Json(CertificateDocumentResponse {
        message: "Dados do certificado para geração de PDF".to_string(),
        certificado: CertificatePrint::from(&document),
    }))
}
