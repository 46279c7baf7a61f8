pub mod app;
pub mod chat;
pub mod components;
pub mod state;

pub use app::MarketApp;
pub use state::View;
