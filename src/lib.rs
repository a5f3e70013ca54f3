pub mod app;
pub mod auth;
pub mod config;
pub mod diet;
pub mod error;
pub mod ownership;
pub mod session;
pub mod state;
pub mod transformation;
pub mod workouts;
