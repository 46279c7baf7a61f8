use futures::future::BoxFuture;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::common::{
    ChatMessage, Device, DeviceForm, LoginForm, Profile, RegisterForm, ThreadId, TokenPair,
};
use crate::storage::Session;

use super::error::ApiError;
use super::interceptors;
use super::poller::ChatBackend;

pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Form),
}

/// Everything needed to issue one call through [`ApiClient::send`].
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// The multipart encoder sets its own `Content-Type` with the boundary,
    /// overriding the client default.
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

/// HTTP client bound to one API base URL and one session.
///
/// Every call goes through the same two steps: the access token is attached
/// unless the path is a public route, and a `401 token_not_valid` answer
/// clears the session and surfaces as [`ApiError::SessionInvalidated`].
/// Nothing is retried.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Client with the default `Content-Type: application/json` header.
    pub fn new(base_url: impl Into<String>, session: Session) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self::configure(base_url, headers, session)
    }

    pub fn configure(
        base_url: impl Into<String>,
        default_headers: HeaderMap,
        session: Session,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn send(&self, request: RequestDescriptor) -> Result<Response, ApiError> {
        let RequestDescriptor {
            method,
            path,
            mut headers,
            body,
        } = request;

        let access = self.session.access_token()?;
        interceptors::authorize(&mut headers, &path, access.as_deref())?;

        let url = interceptors::combine_url(&self.base_url, &path);
        log::debug!("{method} {url}");

        let builder = self.http.request(method, url).headers(headers);
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await?;
        self.check_response(response).await
    }

    async fn check_response(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let bytes = response.bytes().await?;
        let body = serde_json::from_slice::<serde_json::Value>(&bytes).ok();

        if interceptors::is_session_invalid(status, body.as_ref()) {
            log::warn!("Access token rejected by server; clearing session");
            if let Err(err) = self.session.clear() {
                log::error!("Failed to clear session after invalidation: {err}");
            }
            return Err(ApiError::SessionInvalidated);
        }

        Err(ApiError::Status { status, body })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<T, ApiError> {
        Ok(self.send(request).await?.json::<T>().await?)
    }

    // ========== Auth ==========

    pub async fn login(&self, form: &LoginForm) -> Result<(), ApiError> {
        let tokens: TokenPair = self
            .send_json(RequestDescriptor::post("login/").json(form)?)
            .await?;
        self.session.store(&tokens)?;
        log::info!("Logged in as {}", form.email);
        Ok(())
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<(), ApiError> {
        self.send(RequestDescriptor::post("register/").json(form)?)
            .await?;
        log::info!("Registered {}", form.email);
        Ok(())
    }

    /// Local tokens are cleared even when the server call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let outcome = match self.session.refresh_token()? {
            Some(refresh) => {
                let request =
                    RequestDescriptor::post("logout/").json(&json!({ "refresh": refresh }))?;
                self.send(request).await.map(|_| ())
            }
            None => Ok(()),
        };
        self.session.clear()?;
        log::info!("Logged out");
        outcome
    }

    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.send_json(RequestDescriptor::get("profile/")).await
    }

    // ========== Devices ==========

    pub async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.send_json(RequestDescriptor::get("devices/")).await
    }

    pub async fn device(&self, id: i64) -> Result<Device, ApiError> {
        self.send_json(RequestDescriptor::get(format!("devices/{id}/")))
            .await
    }

    pub async fn create_device(&self, form: DeviceForm) -> Result<Device, ApiError> {
        let multipart = device_multipart(&form).await?;
        self.send_json(RequestDescriptor::post("devices/").multipart(multipart))
            .await
    }

    // ========== Chat ==========

    pub async fn fetch_messages(&self, thread: &ThreadId) -> Result<Vec<ChatMessage>, ApiError> {
        self.send_json(RequestDescriptor::get(thread.chat_path()))
            .await
    }

    pub async fn post_message(&self, thread: &ThreadId, text: &str) -> Result<(), ApiError> {
        let request = RequestDescriptor::post(thread.chat_path()).json(&json!({ "message": text }))?;
        self.send(request).await?;
        Ok(())
    }
}

impl ChatBackend for ApiClient {
    fn fetch_thread(
        &self,
        thread: ThreadId,
    ) -> BoxFuture<'static, Result<Vec<ChatMessage>, ApiError>> {
        let client = self.clone();
        Box::pin(async move { client.fetch_messages(&thread).await })
    }
}

async fn device_multipart(form: &DeviceForm) -> Result<Form, ApiError> {
    let mut multipart = Form::new();
    for (name, value) in form.text_fields() {
        multipart = multipart.text(name, value.to_string());
    }

    if let Some(path) = &form.image {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::Upload {
                path: path.clone(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        multipart = multipart.part("image", Part::bytes(bytes).file_name(file_name));
    }

    Ok(multipart)
}
