//! Application services.

pub mod handler;
