use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    add_message_handler, conversation_audio_handler, create_conversation_handler,
    get_conversation_handler, health_handler, list_conversations_handler, query_bucket_handler,
    save_credentials_handler, search_handler, update_transcript_handler, upload_audio_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/conversations",
            get(list_conversations_handler).post(create_conversation_handler),
        )
        .route("/conversations/{id}", get(get_conversation_handler))
        .route("/conversations/{id}/messages", post(add_message_handler))
        .route(
            "/conversations/{id}/transcript",
            put(update_transcript_handler),
        )
        .route("/conversations/{id}/audio", get(conversation_audio_handler))
        .route("/storage-credentials", post(save_credentials_handler))
        .route("/search", get(search_handler))
        .route("/query-bucket", get(query_bucket_handler))
        .route(
            "/upload-audio",
            post(upload_audio_handler).layer(upload_limit),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
