use uuid::Uuid;

use super::types::{ChatMessage, Device, Profile};

/// Sự kiện từ tầng API gửi lên UI.
#[derive(Debug, Clone)]
pub enum ApiEvent {
    LoggedIn,
    LoginFailed,
    Registered,
    RegisterFailed,
    LoggedOut,
    ProfileLoaded(Profile),
    ProfileFailed,
    DevicesLoaded(Vec<Device>),
    DevicesFailed,
    DeviceLoaded(Device),
    DeviceFailed {
        id: i64,
    },
    DeviceCreated(Device),
    DeviceCreateFailed,
    /// Kết quả một lần poll; thay thế toàn bộ danh sách tin nhắn.
    MessagesLoaded {
        subscription: Uuid,
        messages: Vec<ChatMessage>,
    },
    MessagesFailed {
        subscription: Uuid,
    },
    MessageSent {
        subscription: Uuid,
    },
    MessageSendFailed {
        subscription: Uuid,
    },
    /// Server báo token không còn hợp lệ; token đã bị xoá.
    SessionInvalidated,
}
