//! Module registration substrate for the brisk runtime
//!
//! A runtime module describes itself with an [`Initializer`]: a register
//! callback that adds native routines to a startup context and a query
//! callback that validates the populated context afterwards. The startup
//! coordinator links initializers into an [`InitializerChain`] and walks it
//! once before any compiled code runs.
//!
//! ```rust,ignore
//! use brisk_plugin::{Initializer, InitializerChain};
//!
//! let mut chain = InitializerChain::new();
//! chain.link(Initializer::new("convert", register_conversions, query_conversions));
//! chain.link(Initializer::register_only("text", register_text));
//!
//! // "text" registers first: the walk starts at the most recently linked record.
//! let report = chain.run(&mut registry);
//! assert!(report.is_ok());
//! ```
//!
//! Routines are keyed by name and [`Signature`] descriptor.

pub mod chain;
pub mod signature;

pub use chain::{run_queries, Initializer, InitializerChain, QueryFn, QueryReport, RegisterFn};
pub use signature::Signature;
