// src/api/auth.rs
use axum::{
    body::to_bytes,
    extract::{OriginalUri, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use hmac::digest::{CtOutput, Output};
use sha2::{Digest, Sha256};

use super::error::ApiError;

/// 請求時間戳允許的誤差（秒）
pub const MAX_CLOCK_SKEW_SECS: i64 = 300;

const MAX_USER_ID_LEN: usize = 128;

pub const HEADER_API_KEY: &str = "X-API-Key";
pub const HEADER_TIMESTAMP: &str = "X-Timestamp";
pub const HEADER_USER_ID: &str = "X-User-Id";
pub const HEADER_SIGNATURE: &str = "X-Signature";

#[derive(Debug, Clone)]
pub struct ApiAuth {
    pub api_key: String,
    pub secret_key: String,
    pub max_body_size: usize,
}

/// 通過驗證的呼叫者，由中介層放入請求擴充
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing {0} header")]
    MissingHeader(&'static str),

    #[error("Invalid {0}")]
    Invalid(&'static str),

    #[error("Request expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Unreadable request body")]
    Body,
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, AuthError> {
    headers
        .get(name)
        .ok_or(AuthError::MissingHeader(name))?
        .to_str()
        .map_err(|_| AuthError::Invalid(name))
}

impl ApiAuth {
    pub fn new(api_key: String, secret_key: String, max_body_size: usize) -> Self {
        Self {
            api_key,
            secret_key,
            max_body_size,
        }
    }

    /// 驗證簽名並回傳呼叫者的 user id
    pub fn verify_request(
        &self,
        method: &str,
        path: &str,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<AuthenticatedUser, AuthError> {
        // 1. 檢查 API Key
        if header(headers, HEADER_API_KEY)? != self.api_key {
            return Err(AuthError::Invalid(HEADER_API_KEY));
        }

        // 2. 檢查時間戳
        let timestamp = header(headers, HEADER_TIMESTAMP)?
            .parse::<i64>()
            .map_err(|_| AuthError::Invalid(HEADER_TIMESTAMP))?;

        if (Utc::now().timestamp() - timestamp).abs() > MAX_CLOCK_SKEW_SECS {
            return Err(AuthError::Expired);
        }

        // 3. 呼叫者
        let user_id = header(headers, HEADER_USER_ID)?.trim();
        if user_id.is_empty() || user_id.len() > MAX_USER_ID_LEN {
            return Err(AuthError::Invalid(HEADER_USER_ID));
        }

        // 4. 驗證簽名（常數時間比較）
        let provided = hex::decode(header(headers, HEADER_SIGNATURE)?)
            .map_err(|_| AuthError::InvalidSignature)?;
        let expected = self.digest(method, path, timestamp, user_id, body);
        if provided.len() != expected.len()
            || CtOutput::<Sha256>::new(expected) != CtOutput::new(Output::<Sha256>::clone_from_slice(&provided))
        {
            return Err(AuthError::InvalidSignature);
        }

        Ok(AuthenticatedUser(user_id.to_string()))
    }

    /// hex(sha256(method + path + timestamp + user_id + secret + body))
    pub fn sign(&self, method: &str, path: &str, timestamp: i64, user_id: &str, body: &[u8]) -> String {
        hex::encode(self.digest(method, path, timestamp, user_id, body))
    }

    fn digest(&self, method: &str, path: &str, timestamp: i64, user_id: &str, body: &[u8]) -> Output<Sha256> {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}{}{}{}{}", method, path, timestamp, user_id, self.secret_key));
        hasher.update(body);
        hasher.finalize()
    }
}

pub async fn auth_middleware(
    State(auth): State<ApiAuth>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    // 巢狀路由會去掉前綴，簽名以完整路徑計算
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let (parts, body) = request.into_parts();
    let body_bytes = to_bytes(body, auth.max_body_size)
        .await
        .map_err(|_| AuthError::Body)?;

    let user = auth
        .verify_request(method.as_str(), &path, &parts.headers, &body_bytes)
        .inspect_err(|e| tracing::warn!(path = %path, "Auth failed: {}", e))?;

    // 重建請求並繼續處理
    let mut request = Request::from_parts(parts, axum::body::Body::from(body_bytes));
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
