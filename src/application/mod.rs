//! Board state, its controllers, and the runtime that drives them.

pub mod board;
pub mod cache;
pub mod debounce;
pub mod error;
pub mod intent;
pub mod modal;
pub mod pagination;
pub mod recency;
pub mod remote;
pub mod runtime;
pub mod search;
