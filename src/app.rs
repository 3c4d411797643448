use axum::{error_handling::HandleErrorLayer, extract::DefaultBodyLimit, routing::get, BoxError, Router};
use std::sync::Arc;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::database::models::{post, user};
use crate::database::{DocumentStore, Repository};
use crate::error::ApiError;
use crate::filter::IdPolicy;
use crate::handlers;

/// Shared, cloneable state handed to every handler
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn users(&self) -> Repository {
        self.repository(user::COLLECTION)
    }

    pub fn posts(&self) -> Repository {
        self.repository(post::COLLECTION)
    }

    pub fn id_policy(&self) -> IdPolicy {
        IdPolicy::from_strict(self.config.api.strict_object_ids)
    }

    fn repository(&self, collection: &'static str) -> Repository {
        Repository::new(collection, self.store.clone(), self.config.database.operation_timeout())
    }
}

pub fn app(state: AppState) -> Router {
    let request_timeout = state.config().server.request_timeout();
    let body_limit = state.config().api.max_request_size_bytes;

    Router::new()
        // Public
        .route("/", get(handlers::root::index))
        .route("/health", get(handlers::root::health))
        .merge(user_routes())
        .merge(post_routes())
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Errors raised by the middleware stack itself, rendered like handler errors
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request exceeded its deadline");
        ApiError::request_timeout("Request took too long")
    } else {
        tracing::error!("Middleware error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/", get(users::list_users))
        .route("/users/:uid", get(users::get_user))
}

fn post_routes() -> Router<AppState> {
    use handlers::posts;

    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/", get(posts::list_posts))
        .route("/posts/:pid", get(posts::get_post))
        // Cross-reference: posts owned by a user
        .route("/post/users/:uid", get(posts::posts_by_user))
}
