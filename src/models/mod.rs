pub mod event;
pub mod game;
pub mod permissions;
pub mod user;

pub use event::{Event, EventBody, EventChanges, NewEvent};
pub use game::Game;
pub use user::User;
