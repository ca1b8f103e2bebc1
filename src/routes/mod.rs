use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer, Config};
use crate::handlers::{activities, health_check, implements, instruments, members};
use crate::middleware::require_auth;
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let protected = Router::new()
        .route(
            "/activities",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route(
            "/activities/:id",
            get(activities::get_activity)
                .put(activities::update_activity)
                .delete(activities::delete_activity),
        )
        .route(
            "/activities/:id/confirm/:member_id",
            patch(activities::confirm_participation),
        )
        .route(
            "/activities/:id/confirmAdmin/:member_id",
            patch(activities::confirm_participation_admin),
        )
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/members/:id",
            get(members::get_member)
                .patch(members::update_member)
                .delete(members::delete_member),
        )
        .route("/members/email/:email", get(members::get_member_by_email))
        .route(
            "/instruments",
            get(instruments::list_instruments).post(instruments::create_instrument),
        )
        .route(
            "/instruments/:id",
            get(instruments::get_instrument)
                .put(instruments::update_instrument)
                .delete(instruments::delete_instrument),
        )
        .route("/instruments/:id/assign", patch(instruments::assign_instrument))
        .route(
            "/instruments/:id/unassign",
            patch(instruments::unassign_instrument),
        )
        .route(
            "/implements",
            get(implements::list_implements).post(implements::create_implement),
        )
        .route(
            "/implements/:id",
            get(implements::get_implement)
                .put(implements::update_implement)
                .delete(implements::delete_implement),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let router = Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    apply_security_headers(router, config.production)
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()))
}
