//! HTTP handlers

pub mod health;
pub mod auth;
pub mod conditions;
pub mod predictions;
pub mod admin;
