mod call;
mod message;
mod room;
mod typing;
mod user;

pub use call::*;
pub use message::*;
pub use room::*;
pub use typing::*;
pub use user::*;
