//! Application services: generation pipeline, history, and its persistence.

pub mod generate;
pub mod history;
pub mod persistence;
