use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header::Header,
    middleware::Next,
    web, Error, ResponseError,
};
use actix_web_httpauth::headers::authorization::{Authorization, Basic};
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand_core::OsRng;

use crate::{config::AdminCredentials, error::ApiError, state::AppState};

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = PasswordHash::new(password_hash);
    match parsed_hash {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// Encodes a credential pair into the token handed out by the login endpoint.
/// The admin console sends it back as `Authorization: Basic <token>`.
pub fn issue_token(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{username}:{password}"))
}

/// The single shared admin credential. A gate built without credentials
/// rejects everything.
#[derive(Clone, Debug)]
pub struct AdminGate {
    account: Option<AdminAccount>,
}

#[derive(Clone, Debug)]
struct AdminAccount {
    username: String,
    password_hash: String,
}

impl AdminGate {
    pub fn from_credentials(credentials: Option<AdminCredentials>) -> Result<Self, password_hash::Error> {
        let Some(credentials) = credentials else {
            log::warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set. The admin console is locked.");
            return Ok(Self::closed());
        };
        let password_hash = hash_password(&credentials.password)?;
        Ok(Self {
            account: Some(AdminAccount {
                username: credentials.username,
                password_hash,
            }),
        })
    }

    pub fn closed() -> Self {
        Self { account: None }
    }

    pub fn is_open(&self) -> bool {
        self.account.is_some()
    }

    /// Exact match on username, Argon2 verification on password.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let account = self.account.as_ref().ok_or(ApiError::InvalidCredentials)?;
        if account.username == username && verify_password(password, &account.password_hash) {
            Ok(())
        } else {
            Err(ApiError::InvalidCredentials)
        }
    }

    /// Runs the login exchange: on a match, returns the token for the pair.
    pub fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        self.verify(username, password)?;
        Ok(issue_token(username, password))
    }
}

fn authenticate(req: &ServiceRequest) -> Result<(), ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(ApiError::Unauthorized)?;
    let auth = Authorization::<Basic>::parse(req.request()).map_err(|_| ApiError::Unauthorized)?;
    let credentials = auth.into_scheme();
    let username = credentials.user_id();
    let password = credentials.password().map(|password| password.as_ref()).unwrap_or("");
    state.admin.verify(username, password)
}

/// Middleware guarding every `/api/admin` route except login.
pub async fn admin_guard<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: MessageBody + 'static,
{
    if let Err(err) = authenticate(&req) {
        log::debug!("Rejected admin request to {}: {err}", req.path());
        let response = err.error_response();
        return Ok(req.into_response(response));
    }

    let res = next.call(req).await?;
    Ok(res.map_into_boxed_body())
}
