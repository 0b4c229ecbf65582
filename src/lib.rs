//! Domain core for a round-robin league manager: fixture generation, score
//! recording and standings computation, behind interchangeable season stores.

pub mod auth;
pub mod csv_store;
pub mod fixtures;
pub mod schedule;
pub mod service;
pub mod sqlite_store;
pub mod standings;
pub mod store;
