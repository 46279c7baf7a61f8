pub mod commands;
pub mod events;
pub mod types;

pub use commands::ApiCommand;
pub use events::ApiEvent;
pub use types::{
    ChatMessage, Device, DeviceForm, LoginForm, Profile, RegisterForm, ThreadId, TokenPair,
};
