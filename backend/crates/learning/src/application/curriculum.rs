//! Curriculum Use Cases
//!
//! Modules, content items, trails and per-account trail progress.
//! Role checks happen in the handlers; input rules are checked here.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{AccountId, ContentId, ModuleId, TrailId};

use super::{LearningConfig, non_blank};
use crate::domain::entity::{
    Content, ContentView, LedgerEntry, Module, Trail, TrailItem, TrailProgress,
};
use crate::domain::repository::{LearningStore, LearningTx};
use crate::domain::services;
use crate::domain::value_object::LedgerEvent;
use crate::error::{LearningError, LearningResult};

const MODULE_NOT_FOUND: &str = "Módulo não encontrado";
const CONTENT_NOT_FOUND: &str = "Conteúdo não encontrado";
const TRAIL_NOT_FOUND: &str = "Trilha de aprendizagem não encontrada";

// ============================================================================
// Modules
// ============================================================================

#[derive(Debug, Default)]
pub struct ModuleInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct ModuleUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> ModuleUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> LearningResult<Vec<Module>> {
        self.store.list_modules().await
    }

    pub async fn get(&self, id: ModuleId) -> LearningResult<Module> {
        self.store
            .find_module(id)
            .await?
            .ok_or(LearningError::NotFound(MODULE_NOT_FOUND))
    }

    pub async fn create(&self, manager_id: AccountId, input: ModuleInput) -> LearningResult<Module> {
        let (Some(name), Some(description)) = (non_blank(input.name), non_blank(input.description))
        else {
            return Err(LearningError::Validation(
                "Nome e descrição são obrigatórios".to_string(),
            ));
        };

        let module = Module::new(name, description, manager_id);
        self.store.create_module(&module).await?;

        tracing::info!(module_id = %module.id, manager_id = %manager_id, "Module created");
        Ok(module)
    }

    pub async fn update(&self, id: ModuleId, input: ModuleInput) -> LearningResult<Module> {
        let mut module = self.get(id).await?;
        if let Some(name) = non_blank(input.name) {
            module.name = name;
        }
        if let Some(description) = non_blank(input.description) {
            module.description = description;
        }
        module.updated_at = Utc::now();
        self.store.update_module(&module).await?;
        Ok(module)
    }

    pub async fn delete(&self, id: ModuleId) -> LearningResult<()> {
        self.get(id).await?;
        if self.store.module_in_use(id).await? {
            return Err(LearningError::Conflict(
                "Não é possível excluir este módulo, pois há registros associados a ele",
            ));
        }
        if !self.store.delete_module(id).await? {
            return Err(LearningError::NotFound(MODULE_NOT_FOUND));
        }
        tracing::info!(module_id = %id, "Module deleted");
        Ok(())
    }
}

// ============================================================================
// Contents
// ============================================================================

#[derive(Debug, Default)]
pub struct ContentInput {
    pub module_id: Option<ModuleId>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub document_url: Option<String>,
    pub position: Option<i32>,
}

/// Outcome of marking a content item viewed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    Marked { points: i64 },
    AlreadyViewed,
}

pub struct ContentUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
    config: Arc<LearningConfig>,
}

impl<S> ContentUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>, config: Arc<LearningConfig>) -> Self {
        Self { store, config }
    }

    pub async fn list(&self) -> LearningResult<Vec<Content>> {
        self.store.list_contents().await
    }

    pub async fn list_by_module(&self, module_id: ModuleId) -> LearningResult<Vec<Content>> {
        self.store.list_contents_by_module(module_id).await
    }

    pub async fn get(&self, id: ContentId) -> LearningResult<Content> {
        self.store
            .find_content(id)
            .await?
            .ok_or(LearningError::NotFound(CONTENT_NOT_FOUND))
    }

    pub async fn create(&self, input: ContentInput) -> LearningResult<Content> {
        let (
            Some(module_id),
            Some(kind),
            Some(title),
            Some(description),
            Some(video_url),
            Some(position),
        ) = (
            input.module_id,
            non_blank(input.kind),
            non_blank(input.title),
            non_blank(input.description),
            non_blank(input.video_url),
            input.position,
        )
        else {
            return Err(LearningError::Validation(
                "Dados incompletos. Forneça módulo, tipo, título, descrição, URL do vídeo e ordem"
                    .to_string(),
            ));
        };

        self.ensure_module(module_id).await?;

        let now = Utc::now();
        let content = Content {
            id: ContentId::new(),
            module_id,
            kind,
            title,
            description,
            video_url,
            document_url: non_blank(input.document_url),
            position,
            created_at: now,
            updated_at: now,
        };
        self.store.create_content(&content).await?;

        tracing::info!(content_id = %content.id, module_id = %module_id, "Content created");
        Ok(content)
    }

    pub async fn update(&self, id: ContentId, input: ContentInput) -> LearningResult<Content> {
        let mut content = self.get(id).await?;

        if let Some(module_id) = input.module_id {
            if module_id != content.module_id {
                self.ensure_module(module_id).await?;
            }
            content.module_id = module_id;
        }
        if let Some(kind) = non_blank(input.kind) {
            content.kind = kind;
        }
        if let Some(title) = non_blank(input.title) {
            content.title = title;
        }
        if let Some(description) = non_blank(input.description) {
            content.description = description;
        }
        if let Some(video_url) = non_blank(input.video_url) {
            content.video_url = video_url;
        }
        if let Some(document_url) = input.document_url {
            content.document_url = non_blank(Some(document_url));
        }
        if let Some(position) = input.position {
            content.position = position;
        }

        content.updated_at = Utc::now();
        self.store.update_content(&content).await?;
        Ok(content)
    }

    pub async fn delete(&self, id: ContentId) -> LearningResult<()> {
        self.get(id).await?;
        if self.store.content_in_use(id).await? {
            return Err(LearningError::HasDependents(
                "O conteúdo não pode ser excluído porque possui registros associados",
            ));
        }
        if !self.store.delete_content(id).await? {
            return Err(LearningError::NotFound(CONTENT_NOT_FOUND));
        }
        tracing::info!(content_id = %id, "Content deleted");
        Ok(())
    }

    /// Record a view and award the content points, at most once per account
    pub async fn mark_viewed(
        &self,
        account_id: AccountId,
        content_id: ContentId,
    ) -> LearningResult<ViewOutcome> {
        let content = self.get(content_id).await?;

        let mut tx = self.store.begin().await?;
        if !tx.insert_view(&ContentView::now(account_id, content_id)).await? {
            return Ok(ViewOutcome::AlreadyViewed);
        }

        let points = self.config.content_viewed_points;
        let entry = LedgerEntry::new(
            account_id,
            LedgerEvent::ContentViewed,
            content_id,
            points,
            format!("Conteúdo \"{}\" assistido", content.title),
        );
        tx.append_points(&entry).await?;
        tx.commit().await?;

        tracing::info!(
            account_id = %account_id,
            content_id = %content_id,
            points = points,
            "Content marked as viewed"
        );
        Ok(ViewOutcome::Marked { points })
    }

    async fn ensure_module(&self, id: ModuleId) -> LearningResult<()> {
        self.store
            .find_module(id)
            .await?
            .map(|_| ())
            .ok_or(LearningError::NotFound(MODULE_NOT_FOUND))
    }
}

// ============================================================================
// Trails
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct TrailModuleInput {
    pub module_id: ModuleId,
    pub position: i32,
}

#[derive(Debug, Default)]
pub struct TrailInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub modules: Option<Vec<TrailModuleInput>>,
}

/// One trail position resolved to its module
#[derive(Debug, Clone)]
pub struct TrailModule {
    pub position: i32,
    pub module: Module,
}

#[derive(Debug, Clone)]
pub struct TrailDetail {
    pub trail: Trail,
    pub modules: Vec<TrailModule>,
}

/// Freshly computed progress of one account on one trail
#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub progress: TrailProgress,
    pub total_contents: i64,
    pub viewed_contents: i64,
}

pub struct TrailUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> TrailUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> LearningResult<Vec<Trail>> {
        self.store.list_trails().await
    }

    pub async fn get(&self, id: TrailId) -> LearningResult<TrailDetail> {
        let trail = self.find(id).await?;
        let items = self.store.trail_items(id).await?;

        let mut modules = Vec::with_capacity(items.len());
        for item in items {
            // items reference modules through a foreign key
            if let Some(module) = self.store.find_module(item.module_id).await? {
                modules.push(TrailModule {
                    position: item.position,
                    module,
                });
            }
        }

        Ok(TrailDetail { trail, modules })
    }

    pub async fn create(&self, manager_id: AccountId, input: TrailInput) -> LearningResult<TrailDetail> {
        let (Some(name), Some(description), Some(modules)) = (
            non_blank(input.name),
            non_blank(input.description),
            input.modules.filter(|m| !m.is_empty()),
        ) else {
            return Err(LearningError::Validation(
                "Dados incompletos. Forneça nome, descrição e pelo menos um módulo".to_string(),
            ));
        };

        let trail = Trail::new(name, description, manager_id);
        let items = self.resolve_items(trail.id, &modules).await?;

        let mut tx = self.store.begin().await?;
        tx.insert_trail(&trail, &items).await?;
        tx.commit().await?;

        tracing::info!(trail_id = %trail.id, modules = items.len(), "Trail created");
        self.get(trail.id).await
    }

    pub async fn update(&self, id: TrailId, input: TrailInput) -> LearningResult<TrailDetail> {
        let mut trail = self.find(id).await?;

        if let Some(name) = non_blank(input.name) {
            trail.name = name;
        }
        if let Some(description) = non_blank(input.description) {
            trail.description = description;
        }
        let items = match input.modules {
            Some(modules) if modules.is_empty() => {
                return Err(LearningError::Validation(
                    "Dados incompletos. Forneça nome, descrição e pelo menos um módulo".to_string(),
                ));
            }
            Some(modules) => Some(self.resolve_items(id, &modules).await?),
            None => None,
        };
        trail.updated_at = Utc::now();

        let mut tx = self.store.begin().await?;
        tx.update_trail(&trail, items.as_deref()).await?;
        tx.commit().await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: TrailId) -> LearningResult<()> {
        self.find(id).await?;
        if self.store.trail_has_progress(id).await? {
            return Err(LearningError::HasDependents(
                "A trilha não pode ser excluída porque possui registros de progresso associados",
            ));
        }

        let mut tx = self.store.begin().await?;
        if !tx.delete_trail(id).await? {
            return Err(LearningError::NotFound(TRAIL_NOT_FOUND));
        }
        tx.commit().await?;

        tracing::info!(trail_id = %id, "Trail deleted");
        Ok(())
    }

    /// Start the trail; the flag is true when a new progress row was created
    pub async fn start(
        &self,
        account_id: AccountId,
        trail_id: TrailId,
    ) -> LearningResult<(TrailProgress, bool)> {
        self.find(trail_id).await?;

        let progress = TrailProgress::start(account_id, trail_id);
        if self.store.insert_progress(&progress).await? {
            tracing::info!(account_id = %account_id, trail_id = %trail_id, "Trail started");
            return Ok((progress, true));
        }

        let existing = self
            .store
            .find_progress(account_id, trail_id)
            .await?
            .ok_or_else(|| LearningError::Internal("Progress row vanished".to_string()))?;
        Ok((existing, false))
    }

    /// Recompute and persist the viewed-content percentage
    pub async fn progress(
        &self,
        account_id: AccountId,
        trail_id: TrailId,
    ) -> LearningResult<ProgressReport> {
        self.find(trail_id).await?;

        let mut progress = self
            .store
            .find_progress(account_id, trail_id)
            .await?
            .ok_or(LearningError::NotFound(
                "Você ainda não iniciou esta trilha de aprendizagem",
            ))?;

        let content_ids = self.store.trail_content_ids(trail_id).await?;
        let total_contents = content_ids.len() as i64;
        let viewed_contents = self.store.count_viewed(account_id, &content_ids).await?;
        let percent = services::progress_percent(viewed_contents, total_contents);
        let has_assessment = self.store.trail_has_assessment(trail_id).await?;

        let was_finished = progress.finished;
        progress.apply(percent, has_assessment, Utc::now());
        self.store.update_progress(&progress).await?;

        if progress.finished && !was_finished {
            tracing::info!(account_id = %account_id, trail_id = %trail_id, "Trail finished");
        }

        Ok(ProgressReport {
            progress,
            total_contents,
            viewed_contents,
        })
    }

    async fn find(&self, id: TrailId) -> LearningResult<Trail> {
        self.store
            .find_trail(id)
            .await?
            .ok_or(LearningError::NotFound(TRAIL_NOT_FOUND))
    }

    async fn resolve_items(
        &self,
        trail_id: TrailId,
        modules: &[TrailModuleInput],
    ) -> LearningResult<Vec<TrailItem>> {
        let mut items = Vec::with_capacity(modules.len());
        for m in modules {
            if self.store.find_module(m.module_id).await?.is_none() {
                return Err(LearningError::NotFound(
                    "Um ou mais módulos não foram encontrados",
                ));
            }
            items.push(TrailItem {
                trail_id,
                module_id: m.module_id,
                position: m.position,
            });
        }
        Ok(items)
    }
}
