//! Application Layer
//!
//! Use cases and application services.

pub mod assessments;
pub mod certificates;
pub mod challenges;
pub mod config;
pub mod curriculum;
pub mod rewards;

// Re-exports
pub use assessments::{
    AlternativeInput, AlternativeUseCase, AnswerBreakdown, AssessmentDetail, AssessmentInput,
    AssessmentUseCase, QuestionInput, QuestionUseCase, SubmissionResult, SubmitAnswersUseCase,
};
pub use certificates::{CertificateQueryUseCase, IssueCertificateUseCase};
pub use challenges::{ChallengeDetail, ChallengeInput, ChallengeUseCase, StageInput};
pub use config::LearningConfig;
pub use curriculum::{
    ContentInput, ContentUseCase, ModuleInput, ModuleUseCase, ProgressReport, TrailDetail,
    TrailInput, TrailModule, TrailModuleInput, TrailUseCase, ViewOutcome,
};
pub use rewards::{
    ChangeRedemptionStatusUseCase, CoinBalanceUseCase, CoinStatement, RedeemRewardUseCase,
    RewardInput, RewardUseCase,
};

/// Trimmed value, `None` when absent or blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
