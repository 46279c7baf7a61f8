//! Cross-cutting request/response rules applied by [`super::ApiClient`].

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};

/// Error code the backend puts in a 401 body when the access token is rejected.
pub const TOKEN_NOT_VALID: &str = "token_not_valid";

const PUBLIC_ROUTE_MARKERS: [&str; 2] = ["login", "register"];

/// Coarse classification: any path containing `login` or `register` is public,
/// wherever the substring appears (`/users/login_history/` included).
pub fn is_public_route(path: &str) -> bool {
    PUBLIC_ROUTE_MARKERS
        .iter()
        .any(|marker| path.contains(marker))
}

/// Attach `Authorization: Bearer <token>` unless the route is public or there
/// is no token.
pub fn authorize(
    headers: &mut HeaderMap,
    path: &str,
    access_token: Option<&str>,
) -> Result<(), InvalidHeaderValue> {
    let Some(token) = access_token else {
        return Ok(());
    };
    if is_public_route(path) {
        return Ok(());
    }

    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);
    Ok(())
}

/// Both conditions must hold: status 401 and body `code == "token_not_valid"`.
pub fn is_session_invalid(status: StatusCode, body: Option<&serde_json::Value>) -> bool {
    status == StatusCode::UNAUTHORIZED
        && body
            .and_then(|body| body.get("code"))
            .and_then(|code| code.as_str())
            == Some(TOKEN_NOT_VALID)
}

/// Join a base URL and a request path with exactly one slash between them.
pub fn combine_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return base_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
