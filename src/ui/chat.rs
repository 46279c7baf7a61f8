use uuid::Uuid;

use crate::common::{ApiCommand, ChatMessage, ThreadId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Mounted, nothing requested yet or first fetch failed.
    Idle,
    Fetching,
    Rendered,
}

/// Trạng thái của một view chat đang mở.
///
/// Mỗi lần mở view có một `subscription` riêng; kết quả poll mang
/// subscription khác (của view cũ) bị bỏ qua.
pub struct ChatState {
    pub thread: ThreadId,
    pub subscription: Uuid,
    pub messages: Vec<ChatMessage>,
    pub input_text: String,
    pub phase: PollPhase,
    has_rendered: bool,
}

impl ChatState {
    /// Mount a chat view; the returned command starts polling right away.
    pub fn open(thread: ThreadId) -> (Self, ApiCommand) {
        let state = Self {
            thread,
            subscription: Uuid::new_v4(),
            messages: Vec::new(),
            input_text: String::new(),
            phase: PollPhase::Fetching,
            has_rendered: false,
        };
        let command = ApiCommand::OpenChat {
            subscription: state.subscription,
            thread: state.thread.clone(),
        };
        (state, command)
    }

    pub fn close_command(&self) -> ApiCommand {
        ApiCommand::CloseChat {
            subscription: self.subscription,
        }
    }

    pub fn is_current(&self, subscription: Uuid) -> bool {
        self.subscription == subscription
    }

    /// Blank input issues nothing. The text is sent as typed, untrimmed, and
    /// stays in the input until the server accepts it.
    pub fn submit(&self) -> Option<ApiCommand> {
        if self.input_text.trim().is_empty() {
            return None;
        }
        Some(ApiCommand::SendMessage {
            subscription: self.subscription,
            thread: self.thread.clone(),
            text: self.input_text.clone(),
        })
    }

    /// Full replace, in arrival order.
    pub fn on_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
        self.phase = PollPhase::Rendered;
        self.has_rendered = true;
    }

    pub fn on_fetch_failed(&mut self) {
        self.phase = if self.has_rendered {
            PollPhase::Rendered
        } else {
            PollPhase::Idle
        };
    }

    pub fn on_sent(&mut self) -> ApiCommand {
        self.input_text.clear();
        self.phase = PollPhase::Fetching;
        ApiCommand::RefreshChat {
            subscription: self.subscription,
        }
    }

    pub fn on_send_failed(&mut self) {
        log::warn!("Send failed for chat {}; keeping input for retry", self.thread);
    }
}
