use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod clients;
mod giftcards;
mod health;
mod pieces;
mod sessions;
mod students;
mod team;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/api/health", get(health::health_check))
        // Students
        .route(
            "/api/students",
            get(students::list).post(students::create),
        )
        .route(
            "/api/students/:id",
            get(students::get_by_id)
                .put(students::update)
                .delete(students::remove),
        )
        .route("/api/students/:id/renew", post(students::renew))
        // Class sessions; the attendance route is the only non-CRUD surface
        .route(
            "/api/sessions",
            get(sessions::list).post(sessions::create),
        )
        .route("/api/sessions/attendance", post(sessions::update_attendance))
        .route(
            "/api/sessions/:id",
            put(sessions::update).delete(sessions::remove),
        )
        // Ceramic pieces
        .route("/api/pieces", get(pieces::list).post(pieces::create))
        .route(
            "/api/pieces/:id",
            get(pieces::get_by_id)
                .put(pieces::update)
                .delete(pieces::remove),
        )
        // Clients
        .route("/api/clients", get(clients::list).post(clients::create))
        .route(
            "/api/clients/:id",
            get(clients::get_by_id)
                .put(clients::update)
                .delete(clients::remove),
        )
        // Gift cards
        .route(
            "/api/giftcards",
            get(giftcards::list).post(giftcards::create),
        )
        .route(
            "/api/giftcards/:id",
            get(giftcards::get_by_id)
                .put(giftcards::update)
                .delete(giftcards::remove),
        )
        // Team board
        .route(
            "/api/team/members",
            get(team::list_members).post(team::create_member),
        )
        .route(
            "/api/team/members/:id",
            put(team::update_member).delete(team::remove_member),
        )
        .route(
            "/api/team/tasks",
            get(team::list_tasks).post(team::create_task),
        )
        .route(
            "/api/team/tasks/:id",
            put(team::update_task).delete(team::remove_task),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
