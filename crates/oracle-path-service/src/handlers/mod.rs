//! HTTP request handlers.

pub mod admin;
pub mod blog;
pub mod feedback;
pub mod health;
pub mod predict;
pub mod predictions;
pub mod subscription;
pub mod usage;
pub mod webhooks;
