//! Domain model module declarations.

pub mod discussion;
pub mod evaluation;
pub mod event;
pub mod task;
