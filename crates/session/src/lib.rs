pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod session;
pub mod store;
pub mod views;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use session::ChatSession;
pub use store::ChatStore;
