//! Integration test modules for seqbridge
//!
//! - bridge: worker thread start, stop, failure reporting
//! - lifecycle: shadow ports moving between the worker and the realtime side

pub mod bridge;
pub mod lifecycle;
