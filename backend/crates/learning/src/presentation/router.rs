//! Learning Router

use auth::{AccessGate, require_access_token};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::application::LearningConfig;
use crate::domain::repository::LearningStore;
use crate::infra::postgres::PgLearningStore;
use crate::presentation::handlers::{self, LearningAppState};

/// Create the learning router with PostgreSQL store
///
/// Merged at the root; every route requires an access token.
pub fn learning_router(store: PgLearningStore, config: LearningConfig, gate: AccessGate) -> Router {
    learning_router_generic(store, config, gate)
}

/// Create a generic learning router for any store implementation
pub fn learning_router_generic<S>(store: S, config: LearningConfig, gate: AccessGate) -> Router
where
    S: LearningStore,
{
    let state = LearningAppState::new(store, config);

    Router::new()
        // Modules
        .route(
            "/modules",
            get(handlers::list_modules::<S>).post(handlers::create_module::<S>),
        )
        .route(
            "/modules/{id}",
            get(handlers::get_module::<S>)
                .put(handlers::update_module::<S>)
                .delete(handlers::delete_module::<S>),
        )
        // Contents
        .route(
            "/contents",
            get(handlers::list_contents::<S>).post(handlers::create_content::<S>),
        )
        .route(
            "/contents/module/{id}",
            get(handlers::list_module_contents::<S>),
        )
        .route(
            "/contents/{id}",
            get(handlers::get_content::<S>)
                .put(handlers::update_content::<S>)
                .delete(handlers::delete_content::<S>),
        )
        .route(
            "/contents/{id}/mark-viewed",
            post(handlers::mark_viewed::<S>),
        )
        // Trails
        .route(
            "/trails",
            get(handlers::list_trails::<S>).post(handlers::create_trail::<S>),
        )
        .route(
            "/trails/{id}",
            get(handlers::get_trail::<S>)
                .put(handlers::update_trail::<S>)
                .delete(handlers::delete_trail::<S>),
        )
        .route("/trails/{id}/start", post(handlers::start_trail::<S>))
        .route("/trails/{id}/progress", get(handlers::trail_progress::<S>))
        .route(
            "/trails/{id}/certificate",
            post(handlers::issue_certificate::<S>),
        )
        // Assessments
        .route(
            "/assessments",
            get(handlers::list_assessments::<S>).post(handlers::create_assessment::<S>),
        )
        .route(
            "/assessments/{id}",
            get(handlers::get_assessment::<S>)
                .put(handlers::update_assessment::<S>)
                .delete(handlers::delete_assessment::<S>),
        )
        .route(
            "/assessments/{id}/submit",
            post(handlers::submit_answers::<S>),
        )
        .route(
            "/assessments/{id}/questions",
            get(handlers::list_questions::<S>).post(handlers::create_question::<S>),
        )
        .route(
            "/assessments/questions/{id}",
            put(handlers::update_question::<S>).delete(handlers::delete_question::<S>),
        )
        .route(
            "/assessments/questions/{id}/alternatives",
            get(handlers::list_alternatives::<S>).post(handlers::create_alternative::<S>),
        )
        .route(
            "/assessments/alternatives/{id}",
            put(handlers::update_alternative::<S>).delete(handlers::delete_alternative::<S>),
        )
        // Challenges
        .route(
            "/challenges",
            get(handlers::list_challenges::<S>).post(handlers::create_challenge::<S>),
        )
        .route(
            "/challenges/{id}",
            get(handlers::get_challenge::<S>)
                .put(handlers::update_challenge::<S>)
                .delete(handlers::delete_challenge::<S>),
        )
        .route(
            "/challenges/{id}/stages",
            get(handlers::list_stages::<S>).post(handlers::create_stage::<S>),
        )
        .route(
            "/challenges/stages/{id}",
            put(handlers::update_stage::<S>).delete(handlers::delete_stage::<S>),
        )
        // Rewards
        .route(
            "/rewards",
            get(handlers::list_rewards::<S>).post(handlers::create_reward::<S>),
        )
        .route("/rewards/mine", get(handlers::my_redemptions::<S>))
        .route("/rewards/balance", get(handlers::my_balance::<S>))
        .route(
            "/rewards/balance/user/{id}",
            get(handlers::account_balance::<S>),
        )
        .route(
            "/rewards/user/{id}",
            get(handlers::account_redemptions::<S>),
        )
        .route(
            "/rewards/{id}",
            get(handlers::get_reward::<S>)
                .put(handlers::update_reward::<S>)
                .delete(handlers::delete_reward::<S>),
        )
        .route("/rewards/{id}/redeem", post(handlers::redeem_reward::<S>))
        .route(
            "/redemptions/{id}/status",
            put(handlers::change_redemption_status::<S>),
        )
        // Certificates
        .route("/certificates", get(handlers::list_certificates::<S>))
        .route(
            "/certificates/user/{id}",
            get(handlers::account_certificates::<S>),
        )
        .route("/certificates/{id}", get(handlers::get_certificate::<S>))
        .route(
            "/certificates/{id}/document",
            get(handlers::certificate_document::<S>),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_access_token))
        .with_state(state)
}
