//! Entities

pub mod assessment;
pub mod certificate;
pub mod curriculum;
pub mod reward;

pub use assessment::{
    Alternative, AnswerRecord, Assessment, Challenge, ChallengeStage, MIN_ALTERNATIVES, Question,
    QuestionSheet,
};
pub use certificate::{Certificate, CertificateDocument};
pub use curriculum::{Content, ContentView, Module, Trail, TrailItem, TrailProgress};
pub use reward::{LedgerEntry, Redemption, RedemptionDetail, Reward};
