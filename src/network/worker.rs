use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::common::{ApiCommand, ApiEvent, ThreadId};

use super::client::ApiClient;
use super::error::ApiError;
use super::poller::ChatPoller;

/// Background task that executes UI commands against the API.
///
/// Each request runs in its own task so a slow call never holds up polling
/// or later commands. At most one chat poller is alive at a time.
pub struct ApiWorker {
    client: Arc<ApiClient>,
    event_sender: mpsc::Sender<ApiEvent>,
    command_receiver: mpsc::Receiver<ApiCommand>,
    chat: Option<ChatPoller>,
}

impl ApiWorker {
    pub fn new(
        client: ApiClient,
        event_sender: mpsc::Sender<ApiEvent>,
        command_receiver: mpsc::Receiver<ApiCommand>,
    ) -> Self {
        Self {
            client: Arc::new(client),
            event_sender,
            command_receiver,
            chat: None,
        }
    }

    pub async fn run(mut self) {
        log::info!("API worker started");

        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command);
        }

        self.close_chat();
        log::info!("API worker stopped: command channel closed");
    }

    fn handle_command(&mut self, command: ApiCommand) {
        match command {
            ApiCommand::Login(form) => {
                self.spawn_request(
                    "Login",
                    move |client| async move { client.login(&form).await },
                    |()| ApiEvent::LoggedIn,
                    ApiEvent::LoginFailed,
                );
            }
            ApiCommand::Register(form) => {
                self.spawn_request(
                    "Registration",
                    move |client| async move { client.register(&form).await },
                    |()| ApiEvent::Registered,
                    ApiEvent::RegisterFailed,
                );
            }
            ApiCommand::Logout => {
                self.close_chat();
                self.spawn_request(
                    "Logout",
                    |client| async move {
                        if let Err(err) = client.logout().await {
                            log::warn!("Server logout failed, session cleared locally: {err}");
                        }
                        Ok(())
                    },
                    |()| ApiEvent::LoggedOut,
                    ApiEvent::LoggedOut,
                );
            }
            ApiCommand::ClearSession => {
                if let Err(err) = self.client.session().clear() {
                    log::error!("Failed to clear session: {err}");
                }
            }
            ApiCommand::FetchProfile => {
                self.spawn_request(
                    "Profile",
                    |client| async move { client.profile().await },
                    ApiEvent::ProfileLoaded,
                    ApiEvent::ProfileFailed,
                );
            }
            ApiCommand::ListDevices => {
                self.spawn_request(
                    "Device list",
                    |client| async move { client.list_devices().await },
                    ApiEvent::DevicesLoaded,
                    ApiEvent::DevicesFailed,
                );
            }
            ApiCommand::FetchDevice(id) => {
                self.spawn_request(
                    "Device detail",
                    move |client| async move { client.device(id).await },
                    ApiEvent::DeviceLoaded,
                    ApiEvent::DeviceFailed { id },
                );
            }
            ApiCommand::CreateDevice(form) => {
                self.spawn_request(
                    "Device creation",
                    move |client| async move { client.create_device(form).await },
                    ApiEvent::DeviceCreated,
                    ApiEvent::DeviceCreateFailed,
                );
            }
            ApiCommand::OpenChat {
                subscription,
                thread,
            } => self.open_chat(subscription, thread),
            ApiCommand::CloseChat { subscription } => {
                if self.active_subscription() == Some(subscription) {
                    self.close_chat();
                }
            }
            ApiCommand::RefreshChat { subscription } => match &self.chat {
                Some(poller) if poller.subscription() == subscription => poller.refresh_now(),
                _ => log::debug!("Ignoring refresh for inactive chat {subscription}"),
            },
            ApiCommand::SendMessage {
                subscription,
                thread,
                text,
            } => {
                self.spawn_request(
                    "Send",
                    move |client| async move { client.post_message(&thread, &text).await },
                    move |()| ApiEvent::MessageSent { subscription },
                    ApiEvent::MessageSendFailed { subscription },
                );
            }
        }
    }

    fn active_subscription(&self) -> Option<Uuid> {
        self.chat.as_ref().map(ChatPoller::subscription)
    }

    fn open_chat(&mut self, subscription: Uuid, thread: ThreadId) {
        self.close_chat();
        log::info!("Opening chat {thread}");
        self.chat = Some(ChatPoller::spawn(
            self.client.clone(),
            subscription,
            thread,
            self.event_sender.clone(),
        ));
    }

    fn close_chat(&mut self) {
        if let Some(poller) = self.chat.take() {
            poller.cancel();
        }
    }

    /// Run one request in its own task and report the outcome.
    ///
    /// An invalidated session is always reported as
    /// [`ApiEvent::SessionInvalidated`] in place of `on_err`.
    fn spawn_request<T, F, Fut, E>(
        &self,
        label: &'static str,
        request: F,
        on_ok: E,
        on_err: ApiEvent,
    ) where
        F: FnOnce(Arc<ApiClient>) -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
        E: FnOnce(T) -> ApiEvent + Send + 'static,
    {
        let client = self.client.clone();
        let events = self.event_sender.clone();
        let pending = request(client);
        tokio::spawn(async move {
            let event = match pending.await {
                Ok(value) => on_ok(value),
                Err(err) if err.is_session_invalidated() => ApiEvent::SessionInvalidated,
                Err(ApiError::Status {
                    status,
                    body: Some(body),
                }) => {
                    log::warn!("{label} rejected with {status}: {body}");
                    on_err
                }
                Err(err) => {
                    log::warn!("{label} failed: {err}");
                    on_err
                }
            };
            if let Err(err) = events.send(event).await {
                log::debug!("{label} result dropped, UI gone: {err}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LoginForm;
    use crate::network::test_support::{RequestLog, logged_in_session, serve};
    use crate::storage::Session;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::time::Duration;

    async fn chat_list(
        State(log): State<RequestLog>,
        uri: Uri,
        headers: HeaderMap,
    ) -> Json<serde_json::Value> {
        log.record(&uri, &headers);
        Json(json!([{ "id": 1, "message": "hi", "is_sender": false }]))
    }

    async fn chat_post(State(log): State<RequestLog>, uri: Uri, headers: HeaderMap) -> StatusCode {
        log.record(&uri, &headers);
        StatusCode::CREATED
    }

    struct Harness {
        commands: mpsc::Sender<ApiCommand>,
        events: mpsc::Receiver<ApiEvent>,
        session: Session,
    }

    impl Harness {
        async fn start(router: Router, session: Session) -> Self {
            let base_url = serve(router).await;
            let client = ApiClient::new(base_url, session.clone()).unwrap();
            let (cmd_tx, cmd_rx) = mpsc::channel(16);
            let (event_tx, event_rx) = mpsc::channel(16);
            tokio::spawn(ApiWorker::new(client, event_tx, cmd_rx).run());
            Self {
                commands: cmd_tx,
                events: event_rx,
                session,
            }
        }

        async fn send(&self, command: ApiCommand) {
            self.commands.send(command).await.unwrap();
        }

        async fn next(&mut self) -> ApiEvent {
            tokio::time::timeout(Duration::from_secs(5), self.events.recv())
                .await
                .expect("timed out waiting for event")
                .expect("worker stopped")
        }
    }

    fn chat_router(log: &RequestLog) -> Router {
        Router::new()
            .route("/chat/{id}/", get(chat_list).post(chat_post))
            .with_state(log.clone())
    }

    #[tokio::test]
    async fn open_chat_fetches_immediately() {
        let log = RequestLog::default();
        let mut harness = Harness::start(chat_router(&log), logged_in_session()).await;
        let subscription = Uuid::new_v4();

        harness
            .send(ApiCommand::OpenChat {
                subscription,
                thread: ThreadId::from(42),
            })
            .await;

        match harness.next().await {
            ApiEvent::MessagesLoaded {
                subscription: got,
                messages,
            } => {
                assert_eq!(got, subscription);
                assert_eq!(messages[0].display_line(), "Them: hi");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(log.last().path, "/chat/42/");
    }

    #[tokio::test]
    async fn send_then_refresh_fetches_out_of_band() {
        let log = RequestLog::default();
        let mut harness = Harness::start(chat_router(&log), logged_in_session()).await;
        let subscription = Uuid::new_v4();
        let thread = ThreadId::from(8);

        harness
            .send(ApiCommand::OpenChat {
                subscription,
                thread: thread.clone(),
            })
            .await;
        assert!(matches!(harness.next().await, ApiEvent::MessagesLoaded { .. }));

        harness
            .send(ApiCommand::SendMessage {
                subscription,
                thread,
                text: "hello".to_string(),
            })
            .await;
        assert!(matches!(harness.next().await, ApiEvent::MessageSent { .. }));

        harness.send(ApiCommand::RefreshChat { subscription }).await;
        assert!(matches!(harness.next().await, ApiEvent::MessagesLoaded { .. }));
        assert_eq!(log.requests().len(), 3);
    }

    #[tokio::test]
    async fn closed_chat_emits_nothing_more() {
        let log = RequestLog::default();
        let mut harness = Harness::start(chat_router(&log), logged_in_session()).await;
        let subscription = Uuid::new_v4();

        harness
            .send(ApiCommand::OpenChat {
                subscription,
                thread: ThreadId::from(1),
            })
            .await;
        harness.next().await;
        harness.send(ApiCommand::CloseChat { subscription }).await;
        harness.send(ApiCommand::RefreshChat { subscription }).await;

        let late = tokio::time::timeout(Duration::from_millis(300), harness.events.recv()).await;
        assert!(late.is_err(), "unexpected event after close: {late:?}");
    }

    #[tokio::test]
    async fn invalid_token_on_send_is_a_session_event() {
        async fn rejected() -> (StatusCode, Json<serde_json::Value>) {
            (StatusCode::UNAUTHORIZED, Json(json!({ "code": "token_not_valid" })))
        }
        let router = Router::new().route("/chat/{id}/", post(rejected));
        let mut harness = Harness::start(router, logged_in_session()).await;

        harness
            .send(ApiCommand::SendMessage {
                subscription: Uuid::new_v4(),
                thread: ThreadId::from(2),
                text: "hello".to_string(),
            })
            .await;

        assert!(matches!(harness.next().await, ApiEvent::SessionInvalidated));
        assert!(!harness.session.is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn failed_login_reports_login_failed() {
        async fn bad_credentials() -> (StatusCode, Json<serde_json::Value>) {
            (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid credentials" })))
        }
        let router = Router::new().route("/login/", post(bad_credentials));
        let mut harness = Harness::start(router, Session::in_memory().unwrap()).await;

        harness
            .send(ApiCommand::Login(LoginForm {
                email: "a@b.c".to_string(),
                password: "wrong".to_string(),
            }))
            .await;

        assert!(matches!(harness.next().await, ApiEvent::LoginFailed));
    }

    #[tokio::test]
    async fn missing_device_reports_its_id() {
        async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
            (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." })))
        }
        let router = Router::new().route("/devices/{id}/", get(not_found));
        let mut harness = Harness::start(router, logged_in_session()).await;

        harness.send(ApiCommand::FetchDevice(404)).await;

        assert!(matches!(
            harness.next().await,
            ApiEvent::DeviceFailed { id: 404 }
        ));
        assert!(harness.session.is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn clear_session_and_logout_drop_tokens() {
        async fn logout() -> StatusCode {
            StatusCode::RESET_CONTENT
        }
        let router = Router::new().route("/logout/", post(logout));
        let mut harness = Harness::start(router, logged_in_session()).await;

        harness.send(ApiCommand::Logout).await;
        assert!(matches!(harness.next().await, ApiEvent::LoggedOut));
        assert!(!harness.session.is_authenticated().unwrap());

        harness
            .session
            .store(&crate::common::TokenPair {
                access: "a".to_string(),
                refresh: "r".to_string(),
            })
            .unwrap();
        harness.send(ApiCommand::ClearSession).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!harness.session.is_authenticated().unwrap());
    }
}
