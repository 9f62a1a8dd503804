//! Biblius Library Management System
//!
//! A Rust implementation of the Biblius library management server,
//! providing a REST JSON API for user accounts, the book catalog,
//! borrowing, fines, payments, and analytics, plus a WebSocket
//! notification fan-out and a scheduled return-reminder sweep.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduler;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub notifications: services::notifications::NotificationHub,
}
