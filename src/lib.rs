pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod filter;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;
