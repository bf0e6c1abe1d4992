pub mod links;
pub mod view;
pub mod week;
