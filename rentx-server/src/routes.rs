use axum::extract::DefaultBodyLimit;
use axum::{middleware, routing::{get, post}, Extension, Router};
use std::sync::Arc;

use crate::{controllers, cors, static_files, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    // signup/signin/create accettano solo POST: il MethodRouter risponde 405 prima di leggere il body
    let api = Router::new()
        .route("/api/signup", post(controllers::signup))
        .route("/api/signin", post(controllers::signin))
        .route(
            "/api/create",
            post(controllers::create_listing).layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .route("/api/listings", get(controllers::listings))
        .route("/api/dashboard/", get(controllers::dashboard))
        .route("/api/dashboard/*owner", get(controllers::dashboard))
        .layer(middleware::from_fn(cors::cors));

    Router::new()
        .route("/health", get(controllers::health))
        .route("/uploads/*file", get(static_files::upload))
        .merge(api)
        .fallback(static_files::spa)
        .layer(Extension(state))
}
