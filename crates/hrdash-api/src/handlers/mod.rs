//! API handlers

pub mod candidates;
pub mod feedback;
pub mod health;
pub mod jobs;
