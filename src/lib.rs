//! Library crate for stride-back, exposing modules for binaries and integration tests.

pub mod clock;
pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub mod testing;
