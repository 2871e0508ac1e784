//! Persistence layer: snapshot entities and the pluggable snapshot store.

pub mod models;
pub mod score_store;
pub mod storage;
