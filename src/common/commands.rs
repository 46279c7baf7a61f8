use uuid::Uuid;

use super::types::{DeviceForm, LoginForm, RegisterForm, ThreadId};

/// Lệnh UI gửi xuống tầng API.
#[derive(Debug, Clone)]
pub enum ApiCommand {
    Login(LoginForm),
    Register(RegisterForm),
    /// Gọi `logout/` rồi xoá token cục bộ.
    Logout,
    /// Chỉ xoá token cục bộ, không gọi server (khi vào trang đăng ký).
    ClearSession,
    FetchProfile,
    ListDevices,
    /// Chi tiết một thiết bị theo id
    FetchDevice(i64),
    CreateDevice(DeviceForm),
    /// Bắt đầu polling một cuộc trò chuyện
    /// - subscription: định danh của lần mở view chat này
    /// - thread: ID của yêu cầu thuê
    OpenChat {
        subscription: Uuid,
        thread: ThreadId,
    },
    CloseChat {
        subscription: Uuid,
    },
    /// Fetch ngoài lịch, ngay sau khi gửi tin thành công.
    RefreshChat {
        subscription: Uuid,
    },
    SendMessage {
        subscription: Uuid,
        thread: ThreadId,
        text: String,
    },
}
