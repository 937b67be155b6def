//! Data model shared by the evaluator and the session.

pub mod types;
