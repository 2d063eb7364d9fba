pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod messaging;
pub mod models;
pub mod repository;
pub mod service;
pub mod state;
