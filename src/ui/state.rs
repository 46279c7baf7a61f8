use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::common::{
    ApiCommand, ApiEvent, Device, DeviceForm, LoginForm, Profile, RegisterForm, ThreadId,
};

use super::chat::ChatState;

/// Delay between a successful registration and the jump to the login view.
pub const REGISTER_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub const LOGIN_FAILED: &str = "Login failed. Check your email and password.";
pub const REGISTER_OK: &str = "Registered successfully! Redirecting to login...";
pub const REGISTER_FAILED: &str = "Registration failed. Try again.";
pub const DEVICE_CREATE_FAILED: &str = "Failed to create device";
pub const DEVICES_FAILED: &str = "Failed to load devices";
pub const PROFILE_FAILED: &str = "Failed to load profile";
pub const DEVICE_FAILED: &str = "Failed to load device";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Devices,
    CreateDevice,
    DeviceDetail,
    Profile,
    Chat,
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub form: LoginForm,
    pub error: Option<&'static str>,
}

impl LoginState {
    pub fn submit(&mut self) -> Option<ApiCommand> {
        if self.form.email.trim().is_empty() || self.form.password.is_empty() {
            return None;
        }
        self.error = None;
        Some(ApiCommand::Login(self.form.clone()))
    }
}

#[derive(Debug, Default)]
pub struct RegisterState {
    pub form: RegisterForm,
    pub message: Option<&'static str>,
    redirect_at: Option<Instant>,
}

impl RegisterState {
    pub fn submit(&mut self) -> Option<ApiCommand> {
        let form = &self.form;
        if form.email.trim().is_empty() || form.password.is_empty() || form.full_name.trim().is_empty()
        {
            return None;
        }
        self.message = None;
        Some(ApiCommand::Register(self.form.clone()))
    }

    fn registered(&mut self, now: Instant) {
        self.message = Some(REGISTER_OK);
        self.redirect_at = Some(now + REGISTER_REDIRECT_DELAY);
    }

    fn failed(&mut self) {
        self.message = Some(REGISTER_FAILED);
    }

    fn redirect_due(&self, now: Instant) -> bool {
        self.redirect_at.is_some_and(|at| now >= at)
    }
}

/// Form inputs; `image_path` is a local file path, blank for no image.
#[derive(Debug, Default)]
pub struct DeviceFormState {
    pub form: DeviceForm,
    pub image_path: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl DeviceFormState {
    pub fn submit(&mut self) -> Option<ApiCommand> {
        if let Some(field) = self.form.missing_required() {
            self.error = Some(format!("Please fill in {}", field.replace('_', " ")));
            return None;
        }

        let image_path = self.image_path.trim();
        let mut form = self.form.clone();
        form.image = (!image_path.is_empty()).then(|| PathBuf::from(image_path));

        self.error = None;
        self.submitting = true;
        Some(ApiCommand::CreateDevice(form))
    }
}

#[derive(Debug, Default)]
pub struct DevicesState {
    pub devices: Vec<Device>,
    pub loading: bool,
    pub error: Option<&'static str>,
    pub chat_request_input: String,
    pub chat_request_error: Option<String>,
}

impl DevicesState {
    /// Parse the "Open chat" box. Only numeric request ids are accepted; the
    /// input is cleared once it yields a thread.
    pub fn take_chat_request(&mut self) -> Option<ThreadId> {
        match self.chat_request_input.parse::<ThreadId>() {
            Ok(thread) => {
                self.chat_request_input.clear();
                self.chat_request_error = None;
                Some(thread)
            }
            Err(err) => {
                self.chat_request_error = Some(err.to_string());
                None
            }
        }
    }
}

/// One device fetched by id. Results for any other id are stale.
#[derive(Debug, Default)]
pub struct DeviceDetailState {
    pub requested: Option<i64>,
    pub device: Option<Device>,
    pub error: Option<&'static str>,
}

#[derive(Debug, Default)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub error: Option<&'static str>,
}

/// Trạng thái cục bộ của UI.
///
/// Mọi thay đổi đi qua `navigate`, `open_chat`, `apply_event` hoặc `tick`;
/// các hàm này trả về lệnh cần gửi xuống tầng API.
pub struct AppState {
    pub view: View,
    pub login: LoginState,
    pub register: RegisterState,
    pub device_form: DeviceFormState,
    pub devices: DevicesState,
    pub device_detail: DeviceDetailState,
    pub profile: ProfileState,
    pub chat: Option<ChatState>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Login,
            login: LoginState::default(),
            register: RegisterState::default(),
            device_form: DeviceFormState::default(),
            devices: DevicesState::default(),
            device_detail: DeviceDetailState::default(),
            profile: ProfileState::default(),
            chat: None,
        }
    }

    pub fn navigate(&mut self, view: View) -> Vec<ApiCommand> {
        let mut commands = self.leave_chat();
        self.view = view;

        match view {
            View::Login => self.login.error = None,
            View::Register => {
                self.register = RegisterState::default();
                commands.push(ApiCommand::ClearSession);
            }
            View::Devices => {
                self.devices.loading = true;
                self.devices.error = None;
                commands.push(ApiCommand::ListDevices);
            }
            View::CreateDevice => self.device_form = DeviceFormState::default(),
            View::Profile => {
                self.profile.error = None;
                commands.push(ApiCommand::FetchProfile);
            }
            View::DeviceDetail | View::Chat => {}
        }

        commands
    }

    pub fn show_device(&mut self, id: i64) -> Vec<ApiCommand> {
        let mut commands = self.navigate(View::DeviceDetail);
        self.device_detail = DeviceDetailState {
            requested: Some(id),
            ..DeviceDetailState::default()
        };
        commands.push(ApiCommand::FetchDevice(id));
        commands
    }

    pub fn open_chat(&mut self, thread: ThreadId) -> Vec<ApiCommand> {
        let mut commands = self.leave_chat();
        let (chat, open) = ChatState::open(thread);
        commands.push(open);
        self.chat = Some(chat);
        self.view = View::Chat;
        commands
    }

    fn leave_chat(&mut self) -> Vec<ApiCommand> {
        self.chat
            .take()
            .map(|chat| chat.close_command())
            .into_iter()
            .collect()
    }

    /// Drop every piece of in-memory state and show the login view.
    fn reset(&mut self) -> Vec<ApiCommand> {
        let commands = self.leave_chat();
        *self = AppState::new();
        commands
    }

    fn current_chat(&mut self, subscription: uuid::Uuid) -> Option<&mut ChatState> {
        self.chat
            .as_mut()
            .filter(|chat| chat.is_current(subscription))
    }

    pub fn apply_event(&mut self, event: ApiEvent) -> Vec<ApiCommand> {
        match event {
            ApiEvent::LoggedIn => {
                self.login = LoginState::default();
                return self.navigate(View::Devices);
            }
            ApiEvent::LoginFailed => self.login.error = Some(LOGIN_FAILED),
            ApiEvent::Registered => self.register.registered(Instant::now()),
            ApiEvent::RegisterFailed => self.register.failed(),
            ApiEvent::LoggedOut => return self.reset(),
            ApiEvent::ProfileLoaded(profile) => self.profile.profile = Some(profile),
            ApiEvent::ProfileFailed => self.profile.error = Some(PROFILE_FAILED),
            ApiEvent::DevicesLoaded(devices) => {
                self.devices.devices = devices;
                self.devices.loading = false;
            }
            ApiEvent::DevicesFailed => {
                self.devices.loading = false;
                self.devices.error = Some(DEVICES_FAILED);
            }
            ApiEvent::DeviceLoaded(device) => {
                if self.device_detail.requested == Some(device.id) {
                    self.device_detail.device = Some(device);
                }
            }
            ApiEvent::DeviceFailed { id } => {
                if self.device_detail.requested == Some(id) {
                    self.device_detail.error = Some(DEVICE_FAILED);
                }
            }
            ApiEvent::DeviceCreated(device) => {
                log::info!("Created device {} ({})", device.id, device.title);
                return self.navigate(View::Devices);
            }
            ApiEvent::DeviceCreateFailed => {
                self.device_form.submitting = false;
                self.device_form.error = Some(DEVICE_CREATE_FAILED.to_string());
            }
            ApiEvent::MessagesLoaded {
                subscription,
                messages,
            } => {
                if let Some(chat) = self.current_chat(subscription) {
                    chat.on_messages(messages);
                }
            }
            ApiEvent::MessagesFailed { subscription } => {
                if let Some(chat) = self.current_chat(subscription) {
                    chat.on_fetch_failed();
                }
            }
            ApiEvent::MessageSent { subscription } => {
                if let Some(chat) = self.current_chat(subscription) {
                    return vec![chat.on_sent()];
                }
            }
            ApiEvent::MessageSendFailed { subscription } => {
                if let Some(chat) = self.current_chat(subscription) {
                    chat.on_send_failed();
                }
            }
            ApiEvent::SessionInvalidated => {
                log::warn!("Session invalidated; returning to login");
                return self.reset();
            }
        }

        Vec::new()
    }

    /// Time-driven transitions (deferred redirect after registration).
    pub fn tick(&mut self, now: Instant) -> Vec<ApiCommand> {
        if self.view == View::Register && self.register.redirect_due(now) {
            return self.navigate(View::Login);
        }
        Vec::new()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
