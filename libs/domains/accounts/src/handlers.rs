use axum::{
    Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::Redirect,
    routing::get,
};
use axum_helpers::{AuditEvent, AuditOutcome, ClientInfo, ErrorResponse, SessionSettings};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_sessions::Session;
use utoipa::{OpenApi, ToSchema};

use crate::error::{AccountError, AccountResult};
use crate::language::PreferredLanguage;
use crate::oauth::{AuthorizeQuery, OAuthConfig, ProviderRegistry};
use crate::repository::AccountRepository;
use crate::service::AccountLinkingService;
use crate::session::establish_session;

pub const TAG: &str = "oauth";

/// Body of the 400/403 responses of the login flow
#[derive(Serialize, ToSchema)]
pub struct OAuthErrorBody {
    #[schema(example = "Invalid provider")]
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(oauth_login, oauth_authorize),
    components(schemas(OAuthErrorBody, ErrorResponse)),
    tags((name = TAG, description = "Single sign-on through external identity providers"))
)]
pub struct ApiDoc;

/// Shared state of the OAuth routes
pub struct AuthState<R: AccountRepository> {
    pub service: AccountLinkingService<R>,
    pub registry: Arc<ProviderRegistry>,
    pub config: Arc<OAuthConfig>,
    pub sessions: Arc<SessionSettings>,
}

impl<R: AccountRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<R: AccountRepository> AuthState<R> {
    pub fn new(
        service: AccountLinkingService<R>,
        registry: ProviderRegistry,
        config: OAuthConfig,
        sessions: SessionSettings,
    ) -> Self {
        Self {
            service,
            registry: Arc::new(registry),
            config: Arc::new(config),
            sessions: Arc::new(sessions),
        }
    }
}

/// OAuth routes, relative to the console API prefix. Needs the session layer.
pub fn router<R: AccountRepository + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/oauth/login/{provider}", get(oauth_login::<R>))
        .route("/oauth/authorize/{provider}", get(oauth_authorize::<R>))
        .with_state(state)
}

/// Send the browser to the provider's login page
#[utoipa::path(
    get,
    path = "/oauth/login/{provider}",
    tag = TAG,
    params(("provider" = String, Path, description = "Provider key, e.g. `cmbc`")),
    responses(
        (status = 303, description = "Redirect to the provider's authorization URL"),
        (status = 400, description = "Unknown provider", body = OAuthErrorBody)
    )
)]
async fn oauth_login<R: AccountRepository>(
    State(state): State<AuthState<R>>,
    Path(provider): Path<String>,
) -> AccountResult<Redirect> {
    let provider = state.registry.resolve(&provider)?;
    Ok(Redirect::to(&provider.authorization_url()))
}

/// Provider callback: resolve or register the account, log it in
#[utoipa::path(
    get,
    path = "/oauth/authorize/{provider}",
    tag = TAG,
    params(
        ("provider" = String, Path, description = "Provider key, e.g. `cmbc`"),
        AuthorizeQuery
    ),
    responses(
        (status = 303, description = "Logged in; redirect to the console with `oauth_login=success`"),
        (status = 400, description = "Unknown provider, or missing or blank `userId`", body = OAuthErrorBody),
        (status = 403, description = "Account is banned or closed", body = OAuthErrorBody),
        (status = 500, description = "Storage, linking or session failure", body = ErrorResponse)
    )
)]
async fn oauth_authorize<R: AccountRepository>(
    State(state): State<AuthState<R>>,
    Path(provider_key): Path<String>,
    query: Result<Query<AuthorizeQuery>, QueryRejection>,
    PreferredLanguage(language): PreferredLanguage,
    client: ClientInfo,
    session: Session,
) -> AccountResult<Redirect> {
    let provider = state.registry.resolve(&provider_key)?;

    // Unknown providers are rejected before the query is looked at
    let Ok(Query(query)) = query else {
        return Err(AccountError::MissingUserId);
    };
    let user_id = query.user_id().ok_or(AccountError::MissingUserId)?;
    let user_info = provider.user_info(user_id);
    let resource = Some(format!("provider:{}", provider.name()));

    let resolved = match state
        .service
        .authenticate(provider.name(), &user_info, language)
        .await
    {
        Ok(resolved) => resolved,
        Err(err @ AccountError::AccountBannedOrClosed) => {
            AuditEvent::new(
                None,
                "account.oauth_login",
                resource,
                AuditOutcome::Denied,
            )
            .with_client(&client)
            .with_details(json!({ "open_id": user_info.id, "reason": "banned_or_closed" }))
            .log();
            return Err(err);
        }
        Err(err) => return Err(err),
    };
    let account = resolved.account;

    establish_session(
        &session,
        &account,
        provider.name(),
        state.sessions.remember_expiry(),
    )
    .await?;

    state
        .service
        .record_login(account.id, client.ip.clone())
        .await?;

    AuditEvent::new(
        Some(account.id.to_string()),
        "account.oauth_login",
        resource,
        AuditOutcome::Success,
    )
    .with_client(&client)
    .with_details(json!({ "resolution": resolved.source.to_string() }))
    .log();

    Ok(Redirect::to(&state.config.login_success_url()))
}
