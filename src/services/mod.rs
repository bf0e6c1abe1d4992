pub mod account;
pub mod events;
