pub mod commands;
pub mod config;
pub mod gateway;
pub mod messages;
pub mod platform;
pub mod shared;
pub mod tickets;
