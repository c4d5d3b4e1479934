//! API DTOs (Data Transfer Objects)
//!
//! Field names follow the public JSON contract (Portuguese, snake case).

use chrono::{DateTime, Utc};
use kernel::id::{
    AccountId, AlternativeId, AssessmentId, CertificateId, ChallengeId, ChallengeStageId,
    ContentId, LedgerEntryId, ModuleId, QuestionId, RedemptionId, RewardId, TrailId,
    TrailProgressId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{
    AlternativeInput, AnswerBreakdown, AssessmentDetail, AssessmentInput, ChallengeDetail,
    ChallengeInput, CoinStatement, ContentInput, ModuleInput, QuestionInput, RewardInput,
    StageInput, SubmissionResult, TrailDetail, TrailInput, TrailModuleInput,
};
use crate::domain::entity::{
    Alternative, Assessment, Certificate, CertificateDocument, Challenge, ChallengeStage, Content,
    LedgerEntry, Module, QuestionSheet, RedemptionDetail, Reward, Trail, TrailProgress,
};
use crate::domain::services::certificate_code;
use crate::domain::value_object::{LedgerEvent, RedemptionStatus};

/// Generic `{ message }` body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Modules
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
}

impl From<ModuleRequest> for ModuleInput {
    fn from(req: ModuleRequest) -> Self {
        Self {
            name: req.nome,
            description: req.descricao,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleResponse {
    pub id: ModuleId,
    pub nome: String,
    pub descricao: String,
    pub gestor_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Module> for ModuleResponse {
    fn from(module: &Module) -> Self {
        Self {
            id: module.id,
            nome: module.name.clone(),
            descricao: module.description.clone(),
            gestor_id: module.manager_id,
            created_at: module.created_at,
            updated_at: module.updated_at,
        }
    }
}

// ============================================================================
// Contents
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentRequest {
    pub modulo_id: Option<ModuleId>,
    pub tipo: Option<String>,
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub url_video: Option<String>,
    pub url_pdf: Option<String>,
    pub ordem: Option<i32>,
}

impl From<ContentRequest> for ContentInput {
    fn from(req: ContentRequest) -> Self {
        Self {
            module_id: req.modulo_id,
            kind: req.tipo,
            title: req.titulo,
            description: req.descricao,
            video_url: req.url_video,
            document_url: req.url_pdf,
            position: req.ordem,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    pub id: ContentId,
    pub modulo_id: ModuleId,
    pub tipo: String,
    pub titulo: String,
    pub descricao: String,
    pub url_video: String,
    pub url_pdf: Option<String>,
    pub ordem: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Content> for ContentResponse {
    fn from(content: &Content) -> Self {
        Self {
            id: content.id,
            modulo_id: content.module_id,
            tipo: content.kind.clone(),
            titulo: content.title.clone(),
            descricao: content.description.clone(),
            url_video: content.video_url.clone(),
            url_pdf: content.document_url.clone(),
            ordem: content.position,
            created_at: content.created_at,
            updated_at: content.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewedResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pontos: Option<i64>,
}

// ============================================================================
// Trails
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TrailModuleRequest {
    pub modulo_id: ModuleId,
    pub ordem: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrailRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub modulos: Option<Vec<TrailModuleRequest>>,
}

impl From<TrailRequest> for TrailInput {
    fn from(req: TrailRequest) -> Self {
        Self {
            name: req.nome,
            description: req.descricao,
            modules: req.modulos.map(|modules| {
                modules
                    .into_iter()
                    .map(|m| TrailModuleInput {
                        module_id: m.modulo_id,
                        position: m.ordem,
                    })
                    .collect()
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrailResponse {
    pub id: TrailId,
    pub nome: String,
    pub descricao: String,
    pub gestor_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Trail> for TrailResponse {
    fn from(trail: &Trail) -> Self {
        Self {
            id: trail.id,
            nome: trail.name.clone(),
            descricao: trail.description.clone(),
            gestor_id: trail.manager_id,
            created_at: trail.created_at,
            updated_at: trail.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrailModuleResponse {
    pub ordem: i32,
    pub modulo: ModuleResponse,
}

/// Trail with its modules in order
#[derive(Debug, Clone, Serialize)]
pub struct TrailDetailResponse {
    #[serde(flatten)]
    pub trilha: TrailResponse,
    pub modulos: Vec<TrailModuleResponse>,
}

impl From<&TrailDetail> for TrailDetailResponse {
    fn from(detail: &TrailDetail) -> Self {
        Self {
            trilha: TrailResponse::from(&detail.trail),
            modulos: detail
                .modules
                .iter()
                .map(|m| TrailModuleResponse {
                    ordem: m.position,
                    modulo: ModuleResponse::from(&m.module),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub id: TrailProgressId,
    pub usuario_id: AccountId,
    pub trilha_id: TrailId,
    pub porcentagem: i32,
    pub data_inicio: DateTime<Utc>,
    pub data_finalizacao: Option<DateTime<Utc>>,
    pub finalizado: bool,
}

impl From<&TrailProgress> for ProgressResponse {
    fn from(progress: &TrailProgress) -> Self {
        Self {
            id: progress.id,
            usuario_id: progress.account_id,
            trilha_id: progress.trail_id,
            porcentagem: progress.percent,
            data_inicio: progress.started_at,
            data_finalizacao: progress.finished_at,
            finalizado: progress.finished,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartTrailResponse {
    pub message: String,
    pub progresso: ProgressResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressDetails {
    pub total_conteudos: i64,
    pub conteudos_assistidos: i64,
    pub porcentagem: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReportResponse {
    pub progresso: ProgressResponse,
    pub detalhes: ProgressDetails,
}

// ============================================================================
// Assessments
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentRequest {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub conteudo_id: Option<ContentId>,
    pub trilha_id: Option<TrailId>,
    pub etapa_id: Option<ChallengeStageId>,
}

impl From<AssessmentRequest> for AssessmentInput {
    fn from(req: AssessmentRequest) -> Self {
        Self {
            title: req.titulo,
            description: req.descricao,
            content_id: req.conteudo_id,
            trail_id: req.trilha_id,
            stage_id: req.etapa_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResponse {
    pub id: AssessmentId,
    pub titulo: String,
    pub descricao: String,
    pub conteudo_id: Option<ContentId>,
    pub trilha_id: Option<TrailId>,
    pub etapa_id: Option<ChallengeStageId>,
    pub gestor_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Assessment> for AssessmentResponse {
    fn from(assessment: &Assessment) -> Self {
        Self {
            id: assessment.id,
            titulo: assessment.title.clone(),
            descricao: assessment.description.clone(),
            conteudo_id: assessment.content_id,
            trilha_id: assessment.trail_id,
            etapa_id: assessment.stage_id,
            gestor_id: assessment.manager_id,
            created_at: assessment.created_at,
            updated_at: assessment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlternativeRequest {
    pub texto: Option<String>,
    pub correta: Option<bool>,
}

impl From<AlternativeRequest> for AlternativeInput {
    fn from(req: AlternativeRequest) -> Self {
        Self {
            text: req.texto,
            correct: req.correta,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionRequest {
    pub texto: Option<String>,
    #[serde(default)]
    pub alternativas: Vec<AlternativeRequest>,
}

impl From<QuestionRequest> for QuestionInput {
    fn from(req: QuestionRequest) -> Self {
        Self {
            text: req.texto,
            alternatives: req.alternativas.into_iter().map(Into::into).collect(),
        }
    }
}

/// `correta` is omitted when the caller may not see the answer key
#[derive(Debug, Clone, Serialize)]
pub struct AlternativeResponse {
    pub id: AlternativeId,
    pub questao_id: QuestionId,
    pub texto: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correta: Option<bool>,
}

impl AlternativeResponse {
    pub fn new(alternative: &Alternative, reveal: bool) -> Self {
        Self {
            id: alternative.id,
            questao_id: alternative.question_id,
            texto: alternative.text.clone(),
            correta: reveal.then_some(alternative.correct),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub id: QuestionId,
    pub avaliacao_id: AssessmentId,
    pub texto: String,
    pub alternativas: Vec<AlternativeResponse>,
}

impl QuestionResponse {
    pub fn new(sheet: &QuestionSheet, reveal: bool) -> Self {
        Self {
            id: sheet.question.id,
            avaliacao_id: sheet.question.assessment_id,
            texto: sheet.question.text.clone(),
            alternativas: sheet
                .alternatives
                .iter()
                .map(|a| AlternativeResponse::new(a, reveal))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentDetailResponse {
    #[serde(flatten)]
    pub avaliacao: AssessmentResponse,
    pub questoes: Vec<QuestionResponse>,
}

impl AssessmentDetailResponse {
    pub fn new(detail: &AssessmentDetail, reveal: bool) -> Self {
        Self {
            avaliacao: AssessmentResponse::from(&detail.assessment),
            questoes: detail
                .questions
                .iter()
                .map(|q| QuestionResponse::new(q, reveal))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub questao_id: QuestionId,
    pub alternativa_id: AlternativeId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub respostas: Vec<AnswerRequest>,
}

impl SubmitRequest {
    pub fn answers(&self) -> Vec<(QuestionId, AlternativeId)> {
        self.respostas
            .iter()
            .map(|r| (r.questao_id, r.alternativa_id))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedAlternative {
    pub id: AlternativeId,
    pub texto: String,
    pub correta: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerDetail {
    pub questao_id: QuestionId,
    pub texto_questao: String,
    pub alternativa_selecionada: SelectedAlternative,
}

impl From<&AnswerBreakdown> for AnswerDetail {
    fn from(answer: &AnswerBreakdown) -> Self {
        Self {
            questao_id: answer.question_id,
            texto_questao: answer.question_text.clone(),
            alternativa_selecionada: SelectedAlternative {
                id: answer.chosen.id,
                texto: answer.chosen.text.clone(),
                correta: answer.chosen.correct,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub avaliacao_id: AssessmentId,
    pub questoes_total: u32,
    pub acertos: u32,
    pub percentual_acerto: i64,
    pub detalhes: Vec<AnswerDetail>,
}

impl From<&SubmissionResult> for SubmissionResponse {
    fn from(result: &SubmissionResult) -> Self {
        Self {
            avaliacao_id: result.assessment_id,
            questoes_total: result.score.total,
            acertos: result.score.correct,
            percentual_acerto: result.score.percent,
            detalhes: result.answers.iter().map(AnswerDetail::from).collect(),
        }
    }
}

// ============================================================================
// Challenges
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChallengeRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
}

impl From<ChallengeRequest> for ChallengeInput {
    fn from(req: ChallengeRequest) -> Self {
        Self {
            name: req.nome,
            description: req.descricao,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeResponse {
    pub id: ChallengeId,
    pub nome: String,
    pub descricao: String,
    pub gestor_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Challenge> for ChallengeResponse {
    fn from(challenge: &Challenge) -> Self {
        Self {
            id: challenge.id,
            nome: challenge.name.clone(),
            descricao: challenge.description.clone(),
            gestor_id: challenge.manager_id,
            created_at: challenge.created_at,
            updated_at: challenge.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageRequest {
    pub avaliacao_id: Option<AssessmentId>,
    pub ordem: Option<i32>,
}

impl From<StageRequest> for StageInput {
    fn from(req: StageRequest) -> Self {
        Self {
            assessment_id: req.avaliacao_id,
            position: req.ordem,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageResponse {
    pub id: ChallengeStageId,
    pub desafio_id: ChallengeId,
    pub avaliacao_id: AssessmentId,
    pub ordem: i32,
}

impl From<&ChallengeStage> for StageResponse {
    fn from(stage: &ChallengeStage) -> Self {
        Self {
            id: stage.id,
            desafio_id: stage.challenge_id,
            avaliacao_id: stage.assessment_id,
            ordem: stage.position,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeDetailResponse {
    #[serde(flatten)]
    pub desafio: ChallengeResponse,
    pub etapas: Vec<StageResponse>,
}

impl From<&ChallengeDetail> for ChallengeDetailResponse {
    fn from(detail: &ChallengeDetail) -> Self {
        Self {
            desafio: ChallengeResponse::from(&detail.challenge),
            etapas: detail.stages.iter().map(StageResponse::from).collect(),
        }
    }
}

// ============================================================================
// Rewards
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewardRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub moedas_requeridas: Option<i64>,
    pub tipo: Option<String>,
    pub quantidade: Option<i64>,
}

impl From<RewardRequest> for RewardInput {
    fn from(req: RewardRequest) -> Self {
        Self {
            name: req.nome,
            description: req.descricao,
            cost: req.moedas_requeridas,
            kind: req.tipo,
            quantity: req.quantidade,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardResponse {
    pub id: RewardId,
    pub nome: String,
    pub descricao: String,
    pub moedas_requeridas: i64,
    pub tipo: String,
    pub quantidade: Option<i64>,
    pub gestor_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Reward> for RewardResponse {
    fn from(reward: &Reward) -> Self {
        Self {
            id: reward.id,
            nome: reward.name.clone(),
            descricao: reward.description.clone(),
            moedas_requeridas: reward.cost,
            tipo: reward.kind.clone(),
            quantidade: reward.quantity,
            gestor_id: reward.manager_id,
            created_at: reward.created_at,
            updated_at: reward.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RedemptionResponse {
    pub id: RedemptionId,
    pub usuario_id: AccountId,
    pub recompensa_id: RewardId,
    pub data_resgate: DateTime<Utc>,
    pub status: RedemptionStatus,
    pub recompensa: RewardResponse,
}

impl From<&RedemptionDetail> for RedemptionResponse {
    fn from(detail: &RedemptionDetail) -> Self {
        Self {
            id: detail.redemption.id,
            usuario_id: detail.redemption.account_id,
            recompensa_id: detail.redemption.reward_id,
            data_resgate: detail.redemption.redeemed_at,
            status: detail.redemption.status,
            recompensa: RewardResponse::from(&detail.reward),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RedeemResponse {
    pub message: String,
    pub resgate: RedemptionResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedemptionListResponse {
    pub resgates: Vec<RedemptionResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChangeResponse {
    pub message: String,
    pub resgate: RedemptionResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntryResponse {
    pub id: LedgerEntryId,
    pub usuario_id: AccountId,
    pub tipo_evento: LedgerEvent,
    pub referencia_id: Option<Uuid>,
    pub quantidade: i64,
    pub descricao: String,
    pub data_evento: DateTime<Utc>,
}

impl From<&LedgerEntry> for LedgerEntryResponse {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id,
            usuario_id: entry.account_id,
            tipo_evento: entry.event,
            referencia_id: entry.reference_id,
            quantidade: entry.amount,
            descricao: entry.description.clone(),
            data_evento: entry.occurred_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub usuario_id: AccountId,
    pub saldo_moedas: i64,
    pub historico: Vec<LedgerEntryResponse>,
}

impl From<&CoinStatement> for BalanceResponse {
    fn from(statement: &CoinStatement) -> Self {
        Self {
            usuario_id: statement.account_id,
            saldo_moedas: statement.balance,
            historico: statement
                .history
                .iter()
                .map(LedgerEntryResponse::from)
                .collect(),
        }
    }
}

// ============================================================================
// Certificates
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CertificateResponse {
    pub id: CertificateId,
    pub usuario_id: AccountId,
    pub trilha_id: TrailId,
    pub data_emissao: DateTime<Utc>,
}

impl From<&Certificate> for CertificateResponse {
    fn from(certificate: &Certificate) -> Self {
        Self {
            id: certificate.id,
            usuario_id: certificate.account_id,
            trilha_id: certificate.trail_id,
            data_emissao: certificate.issued_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueCertificateResponse {
    pub message: String,
    pub certificado: CertificateResponse,
}

/// Data a renderer prints on the certificate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePrint {
    pub id: CertificateId,
    pub nome_curso: String,
    pub descricao_curso: String,
    pub nome_completo: String,
    pub matricula: String,
    pub setor: String,
    pub data_emissao: String,
    pub codigo: String,
}

impl From<&CertificateDocument> for CertificatePrint {
    fn from(document: &CertificateDocument) -> Self {
        let id = document.certificate.id;
        Self {
            id,
            nome_curso: document.trail_name.clone(),
            descricao_curso: document.trail_description.clone(),
            nome_completo: document.holder_name.clone(),
            matricula: document.holder_enrollment_id.clone(),
            setor: document.holder_sector.clone(),
            data_emissao: document
                .certificate
                .issued_at
                .format("%d/%m/%Y")
                .to_string(),
            codigo: certificate_code(id.as_uuid()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificateDocumentResponse {
    pub message: String,
    pub certificado: CertificatePrint,
}
