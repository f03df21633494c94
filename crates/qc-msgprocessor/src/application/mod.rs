//! Application services.

pub mod standard_channel;
