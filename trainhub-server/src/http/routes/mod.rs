//! Route handlers organized by resource

pub mod health;
pub mod exercises;
pub mod tags;
