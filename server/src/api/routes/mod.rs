//! API route handlers

pub mod health;
pub mod restaurants;
pub mod search;
