use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Một tin nhắn trong cuộc trò chuyện của một yêu cầu thuê.
///
/// Thứ tự do server quyết định; client không sắp xếp lại.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub message: String,
    pub is_sender: bool,
}

impl ChatMessage {
    pub fn author_label(&self) -> &'static str {
        if self.is_sender { "You" } else { "Them" }
    }

    /// `You: hi` / `Them: hi`
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.author_label(), self.message)
    }
}

/// Rental request id that scopes one chat thread.
///
/// Always numeric, so it can be placed in a path segment as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(u64);

#[derive(Debug, thiserror::Error)]
#[error("Rental request id must be a number, got `{0}`")]
pub struct InvalidThreadId(String);

impl ThreadId {
    pub fn chat_path(&self) -> String {
        format!("/chat/{}/", self.0)
    }
}

impl FromStr for ThreadId {
    type Err = InvalidThreadId;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidThreadId(input.to_string()));
        }
        trimmed
            .parse()
            .map(Self)
            .map_err(|_| InvalidThreadId(input.to_string()))
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ThreadId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Cặp token phiên đăng nhập. Luôn được lưu và xoá cùng nhau.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

/// Thiết bị cho thuê như server trả về.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    pub id: i64,
    #[serde(default)]
    pub owner: Option<i64>,
    pub title: String,
    pub description: String,
    pub city: String,
    /// Decimal serialized as a string, e.g. `"12.50"`.
    pub price_per_day: String,
    pub available_from: NaiveDate,
    pub available_to: NaiveDate,
    #[serde(default)]
    pub rules: String,
}

/// Flat field set submitted as `multipart/form-data` to `devices/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceForm {
    pub title: String,
    pub description: String,
    pub city: String,
    pub price_per_day: String,
    pub available_from: String,
    pub available_to: String,
    pub rules: String,
    pub image: Option<PathBuf>,
}

impl DeviceForm {
    /// Text fields in submission order.
    pub fn text_fields(&self) -> [(&'static str, &str); 7] {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("city", &self.city),
            ("price_per_day", &self.price_per_day),
            ("available_from", &self.available_from),
            ("available_to", &self.available_to),
            ("rules", &self.rules),
        ]
    }

    /// First required field left blank, if any. `rules` and `image` are optional.
    pub fn missing_required(&self) -> Option<&'static str> {
        self.text_fields()
            .into_iter()
            .filter(|(name, _)| *name != "rules")
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_labels_follow_sender_flag() {
        let theirs = ChatMessage {
            id: 1,
            message: "hi".to_string(),
            is_sender: false,
        };
        let mine = ChatMessage {
            id: 2,
            message: "hello".to_string(),
            is_sender: true,
        };

        assert_eq!(theirs.display_line(), "Them: hi");
        assert_eq!(mine.display_line(), "You: hello");
    }

    #[test]
    fn chat_list_decodes_from_server_shape() {
        let body = r#"[{"id":1,"message":"hi","is_sender":false},{"id":2,"message":"yo","is_sender":true}]"#;
        let messages: Vec<ChatMessage> = serde_json::from_str(body).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message, "hi");
        assert!(messages[1].is_sender);
    }

    #[test]
    fn thread_path_keeps_surrounding_slashes() {
        assert_eq!(ThreadId::from(42).chat_path(), "/chat/42/");
    }

    #[test]
    fn thread_id_accepts_only_numeric_ids() {
        assert_eq!(" 42 ".parse::<ThreadId>().unwrap(), ThreadId::from(42));

        for bad in ["", "  ", "login", "1/../profile", "7?x=1", "-3", "4 2"] {
            assert!(bad.parse::<ThreadId>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn token_pair_debug_hides_secrets() {
        let tokens = TokenPair {
            access: "abc".to_string(),
            refresh: "def".to_string(),
        };
        let rendered = format!("{tokens:?}");
        assert!(!rendered.contains("abc"));
        assert!(!rendered.contains("def"));
    }

    #[test]
    fn device_form_reports_first_blank_required_field() {
        let mut form = DeviceForm {
            title: "PS5".to_string(),
            description: "Console".to_string(),
            city: "Oslo".to_string(),
            price_per_day: "10".to_string(),
            available_from: "2026-01-01".to_string(),
            available_to: String::new(),
            rules: String::new(),
            image: None,
        };
        assert_eq!(form.missing_required(), Some("available_to"));

        form.available_to = "2026-02-01".to_string();
        assert_eq!(form.missing_required(), None);
    }

    #[test]
    fn device_decodes_decimal_price_and_dates() {
        let body = r#"{
            "id": 7, "owner": 3, "title": "Switch", "description": "Handheld",
            "city": "Bergen", "price_per_day": "12.50",
            "available_from": "2026-03-01", "available_to": "2026-03-31", "rules": ""
        }"#;
        let device: Device = serde_json::from_str(body).unwrap();
        assert_eq!(device.price_per_day, "12.50");
        assert_eq!(
            device.available_to,
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
        );
    }
}
