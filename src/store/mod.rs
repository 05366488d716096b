//! File-backed input and output adapters around the core pipeline.

pub mod history;
pub mod score_store;
