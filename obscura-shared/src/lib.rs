//! # Obscura Shared Library
//!
//! Common building blocks for the Obscura studio-management service:
//!
//! - `auth`: password hashing, access tokens, the request verifier
//!   middleware, and role gating
//! - `db`: PostgreSQL connection pool and migration runner
//! - `models`: entity structs and their database operations

pub mod auth;
pub mod db;
pub mod models;
