//! # QC-MsgProcessor: Channel Message Processing
//!
//! Decides what a submission is and whether a channel will accept it.
//!
//! ## Architecture
//!
//! - **Domain**: classification, validation rules, the channel configuration bundle
//!   and its error type
//! - **Application**: `StandardChannel`, the processor backing one application channel
//!
//! ## Processing Paths
//!
//! ```text
//! normal message ──rules──→ ConfigSeq
//!
//! config update  ──rules──→ propose (sequence + 1) ──wrap as Config──→ structural rules
//!                                                                     └→ (Config envelope, ConfigSeq)
//! ```
//!
//! The sequence returned is always the one read *before* validation started, so
//! the ordering backend can tell whether the channel changed in between.

pub mod application;
pub mod domain;

pub use application::standard_channel::StandardChannel;
pub use domain::channel_config::ChannelConfig;
pub use domain::classification::{classify, Classification};
pub use domain::errors::MsgProcessorError;
pub use domain::rules::{
    ChannelMatchRule, EmptyRejectRule, Rule, RuleSet, SizeFilter, WritersPolicy,
};
