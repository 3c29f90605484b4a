//! Auto-learning sentiment classifier core.
//!
//! A multinomial Naive Bayes classifier that keeps learning from labeled
//! feedback, tracks its own accuracy and refreshes itself on drift. The
//! synchronous core lives in [`sentiment`]; [`actors`] hosts it behind an
//! async handle together with the analyzer and persistence collaborators.

pub mod actors;
pub mod config;
pub mod database;
pub mod error;
pub mod fs_manager;
pub mod models;
pub mod protocol;
pub mod sentiment;

#[cfg(test)]
mod tests;
