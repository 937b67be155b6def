//! Text front-end over the search session.

pub mod render;
pub mod shell;
pub mod shortcuts;
