//! Certificate Use Cases

use std::sync::Arc;

use auth::Caller;
use kernel::id::{AccountId, CertificateId, TrailId};

use super::LearningConfig;
use crate::domain::entity::{Certificate, CertificateDocument, LedgerEntry};
use crate::domain::repository::{LearningStore, LearningTx};
use crate::domain::value_object::LedgerEvent;
use crate::error::{LearningError, LearningResult};

const CERTIFICATE_NOT_FOUND: &str = "Certificado não encontrado";

pub struct IssueCertificateUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
    config: Arc<LearningConfig>,
}

impl<S> IssueCertificateUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>, config: Arc<LearningConfig>) -> Self {
        Self { store, config }
    }

    /// Issue the certificate of a finished trail
    ///
    /// Returns the existing certificate when one was already issued (flag
    /// false). A new certificate and its point and coin awards are committed
    /// together.
    pub async fn execute(
        &self,
        account_id: AccountId,
        trail_id: TrailId,
    ) -> LearningResult<(Certificate, bool)> {
        let trail = self
            .store
            .find_trail(trail_id)
            .await?
            .ok_or(LearningError::NotFound("Trilha não encontrada"))?;

        let mut tx = self.store.begin().await?;
        if !tx.lock_account(account_id).await? {
            return Err(LearningError::NotFound("Usuário não encontrado"));
        }

        if let Some(existing) = tx.find_certificate(account_id, trail_id).await? {
            return Ok((existing, false));
        }

        let finished = tx
            .find_progress(account_id, trail_id)
            .await?
            .is_some_and(|p| p.finished);
        if !finished {
            return Err(LearningError::TrailNotCompleted);
        }

        let certificate = Certificate::issue(account_id, trail_id);
        tx.insert_certificate(&certificate).await?;

        let points = LedgerEntry::new(
            account_id,
            LedgerEvent::Certificate,
            certificate.id,
            self.config.certificate_points,
            format!("Certificado obtido na trilha: {}", trail.name),
        );
        tx.append_points(&points).await?;

        let coins = LedgerEntry::new(
            account_id,
            LedgerEvent::Certificate,
            certificate.id,
            self.config.certificate_coins,
            format!("Moedas por certificado na trilha: {}", trail.name),
        );
        tx.append_coins(&coins).await?;

        tx.commit().await?;

        tracing::info!(
            account_id = %account_id,
            trail_id = %trail_id,
            certificate_id = %certificate.id,
            "Certificate issued"
        );
        Ok((certificate, true))
    }
}

pub struct CertificateQueryUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> CertificateQueryUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> LearningResult<Vec<Certificate>> {
        self.store.list_certificates().await
    }

    pub async fn for_account(&self, account_id: AccountId) -> LearningResult<Vec<Certificate>> {
        self.store.account_certificates(account_id).await
    }

    pub async fn get(&self, id: CertificateId) -> LearningResult<Certificate> {
        self.store
            .find_certificate(id)
            .await?
            .ok_or(LearningError::NotFound(CERTIFICATE_NOT_FOUND))
    }

    /// Printable data; only the holder or a manager/admin may read it
    pub async fn document(
        &self,
        caller: &Caller,
        id: CertificateId,
    ) -> LearningResult<CertificateDocument> {
        let document = self
            .store
            .certificate_document(id)
            .await?
            .ok_or(LearningError::NotFound(CERTIFICATE_NOT_FOUND))?;

        if document.certificate.account_id != caller.id && !caller.role.is_elevated() {
            return Err(LearningError::CertificateForbidden);
        }
        Ok(document)
    }
}
