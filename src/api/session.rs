use std::ops::Deref;

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    dev::Payload,
    http::{header, StatusCode},
    web, FromRequest, HttpRequest, HttpResponse, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use thiserror::Error;
use tracing::{debug, error};

use crate::api::job_post::ServiceError;
use crate::api::state::AppState;
use crate::backend::models::{AuthUser, Session};
use crate::backend::BackendError;

pub const ACCESS_COOKIE: &str = "sb-access-token";

/// Used when the auth API does not say how long the token lives
const DEFAULT_SESSION_SECS: i64 = 3600;

/// A resolved user together with the token that proved it
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: AuthUser,
    pub access_token: String,
}

/// Access token from the session cookie, or a bearer header for API clients
pub fn access_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_COOKIE).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Resolve the caller. A missing or rejected token is `Ok(None)`; only
/// transport-level failures are errors.
pub async fn current_user(
    state: &AppState,
    req: &HttpRequest,
) -> Result<Option<SessionUser>, BackendError> {
    let Some(access_token) = access_token(req) else {
        return Ok(None);
    };

    match state.backend().get_user(&access_token).await {
        Ok(user) => Ok(Some(SessionUser { user, access_token })),
        Err(e) if e.is_auth_rejection() => {
            debug!("Session token rejected: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

async fn resolve(req: &HttpRequest) -> Option<SessionUser> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        error!("AppState is not registered; treating request as anonymous");
        return None;
    };

    match current_user(state, req).await {
        Ok(user) => user,
        Err(e) => {
            error!("Failed to resolve session: {}", e);
            None
        }
    }
}

/// Rejection for pages that need a signed-in user
#[derive(Debug, Error)]
#[error("Authentication required")]
pub struct LoginRedirect;

impl ResponseError for LoginRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        see_other("/login")
    }
}

/// Extractor for HTML pages; anonymous callers are sent to `/login`
#[derive(Debug)]
pub struct AuthenticatedUser(pub SessionUser);

impl Deref for AuthenticatedUser {
    type Target = SessionUser;

    fn deref(&self) -> &SessionUser {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = LoginRedirect;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match resolve(&req).await {
                Some(user) => Ok(AuthenticatedUser(user)),
                None => {
                    debug!("Redirecting anonymous request for {} to /login", req.path());
                    Err(LoginRedirect)
                }
            }
        })
    }
}

/// Extractor for the JSON API; anonymous callers get a 401 body
#[derive(Debug)]
pub struct ApiUser(pub SessionUser);

impl Deref for ApiUser {
    type Target = SessionUser;

    fn deref(&self) -> &SessionUser {
        &self.0
    }
}

impl FromRequest for ApiUser {
    type Error = ServiceError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            resolve(&req)
                .await
                .map(ApiUser)
                .ok_or(ServiceError::Unauthenticated)
        })
    }
}

pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect and store the session cookie
pub fn start_session(location: &str, session: &Session, secure: bool) -> HttpResponse {
    let max_age = session.expires_in.unwrap_or(DEFAULT_SESSION_SECS);
    let cookie = Cookie::build(ACCESS_COOKIE, session.access_token.clone())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age))
        .finish();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}

/// Redirect and drop the session cookie
pub fn end_session(location: &str) -> HttpResponse {
    let mut cookie = Cookie::build(ACCESS_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}
