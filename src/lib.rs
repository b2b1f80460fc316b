pub mod config;
pub mod error;
pub mod models;
pub mod narvar;
pub mod routes;
pub mod signing;
pub mod tracker;
