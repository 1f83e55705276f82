use actix_web::{
    get,
    http::StatusCode,
    post,
    web::{Data, Form, Query, ServiceConfig},
    HttpRequest, HttpResponse,
};
use serde::Deserialize;
use tracing::{error, info, warn};
use validator::Validate;

use crate::api::session::{access_token, current_user, end_session, see_other, start_session};
use crate::api::state::AppState;
use crate::api::validation::summary;
use crate::templates::{render, render_with_status, AuthCodeError, Login};

const CONFIRM_NOTICE: &str = "Check your email to confirm your account";
const AUTH_ERROR_PATH: &str = "/auth/auth-code-error";

#[derive(Debug, Default, Deserialize, Validate)]
pub struct Credentials {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(
        function = "crate::api::validation::not_blank",
        message = "Password is required"
    ))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    pub token_hash: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after confirming.
///
/// Browsers read `/\host` like `//host`, so a backslash in second place is
/// refused too, as is any whitespace or control character.
fn safe_next(next: Option<&str>) -> &str {
    let Some(path) = next else {
        return "/";
    };
    let mut chars = path.chars();
    let local = chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !path.chars().any(|c| c.is_whitespace() || c.is_control());
    if local {
        path
    } else {
        "/"
    }
}

fn login_error(email: &str, err: &dyn std::fmt::Display, status: StatusCode) -> HttpResponse {
    render_with_status(
        status,
        &Login {
            email: email.to_string(),
            error: Some(err.to_string()),
            notice: None,
        },
    )
}

#[get("/login")]
async fn login_page(req: HttpRequest, state: Data<AppState>) -> HttpResponse {
    if let Ok(Some(_)) = current_user(&state, &req).await {
        return see_other("/dashboard");
    }
    render(&Login {
        email: String::new(),
        error: None,
        notice: None,
    })
}

#[post("/login")]
async fn login(state: Data<AppState>, form: Form<Credentials>) -> HttpResponse {
    if let Err(errors) = form.validate() {
        return login_error(&form.email, &summary(&errors), StatusCode::BAD_REQUEST);
    }

    match state.backend().sign_in_with_password(&form.email, &form.password).await {
        Ok(session) => {
            info!("User signed in: {}", session.user.id);
            start_session("/dashboard", &session, state.cookie_secure)
        }
        Err(e) => {
            warn!("Sign in failed for {}: {}", form.email, e);
            login_error(&form.email, &e, StatusCode::UNAUTHORIZED)
        }
    }
}

#[post("/signup")]
async fn signup(state: Data<AppState>, form: Form<Credentials>) -> HttpResponse {
    if let Err(errors) = form.validate() {
        return login_error(&form.email, &summary(&errors), StatusCode::BAD_REQUEST);
    }

    match state.backend().sign_up(&form.email, &form.password).await {
        Ok(Some(session)) => {
            info!("User signed up: {}", session.user.id);
            start_session("/dashboard", &session, state.cookie_secure)
        }
        Ok(None) => {
            info!("Sign up pending confirmation for {}", form.email);
            render(&Login {
                email: form.email.clone(),
                error: None,
                notice: Some(CONFIRM_NOTICE.to_string()),
            })
        }
        Err(e) => {
            warn!("Sign up failed for {}: {}", form.email, e);
            login_error(&form.email, &e, StatusCode::BAD_REQUEST)
        }
    }
}

/// Always clears the cookie, even if the backend refuses the sign out
#[post("/logout")]
async fn logout(req: HttpRequest, state: Data<AppState>) -> HttpResponse {
    if let Some(token) = access_token(&req) {
        if let Err(e) = state.backend().sign_out(&token).await {
            error!("Sign out failed: {}", e);
        }
    }
    end_session("/")
}

/// Landing point of the e-mail confirmation link
#[get("/auth/confirm")]
async fn confirm(state: Data<AppState>, params: Query<ConfirmParams>) -> HttpResponse {
    let (Some(token_hash), Some(kind)) = (params.token_hash.as_deref(), params.kind.as_deref())
    else {
        warn!("Confirmation link without token_hash or type");
        return see_other(AUTH_ERROR_PATH);
    };

    match state.backend().verify_otp(token_hash, kind).await {
        Ok(session) => {
            info!("Confirmed e-mail for user {}", session.user.id);
            start_session(safe_next(params.next.as_deref()), &session, state.cookie_secure)
        }
        Err(e) => {
            error!("Confirmation failed: {}", e);
            see_other(AUTH_ERROR_PATH)
        }
    }
}

#[get("/auth/auth-code-error")]
async fn auth_code_error() -> HttpResponse {
    render(&AuthCodeError)
}

pub fn auth_config(config: &mut ServiceConfig) {
    config
        .service(login_page)
        .service(login)
        .service(signup)
        .service(logout)
        .service(confirm)
        .service(auth_code_error);
}
