//! User interface for ChainSmith

pub mod app;
pub mod handlers;
pub mod message;

pub use app::ChainSmithApp;
pub use message::Message;
