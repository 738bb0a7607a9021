pub mod app;
pub mod config;
pub mod deck;
pub mod events;
pub mod macros;
pub mod store;
pub mod sys;
