//! Application layer: the chain handle and its ordering task.

pub mod chain;
