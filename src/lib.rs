//! Movie recommendation service.
//!
//! Collects genre/language preferences and three favorite movies, asks a chat
//! completion API for five recommendations, and keeps every request/response
//! pair in an append-only JSON history file.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
