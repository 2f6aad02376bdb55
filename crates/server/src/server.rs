use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{catalog, reports, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Username of the authenticated caller, set by the auth middleware.
#[derive(Clone, Debug)]
pub struct AuthUser(pub String);

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(credentials)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let valid = state
        .engine
        .verify_user(credentials.username(), credentials.password())
        .await
        .map_err(|err| {
            tracing::error!("failed to check credentials: {err}");
            StatusCode::SERVICE_UNAVAILABLE
        })?;
    if !valid {
        tracing::debug!(user = credentials.username(), "rejected credentials");
        return Err(StatusCode::UNAUTHORIZED);
    }

    request
        .extensions_mut()
        .insert(AuthUser(credentials.username().to_string()));
    Ok(next.run(request).await)
}

/// Builds the HTTP API around `engine`. Every route requires Basic auth.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/dashboard", get(reports::dashboard))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            patch(transactions::update).delete(transactions::delete),
        )
        .route("/transactions/{id}/toggle", post(transactions::toggle))
        .route("/fixed/import", post(transactions::import_fixed))
        .route("/sections/{kind}", get(reports::sections))
        .route(
            "/categories",
            get(catalog::categories).post(catalog::category_new),
        )
        .route("/categories/recent", get(catalog::recent_categories))
        .route("/accounts", get(catalog::accounts))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
