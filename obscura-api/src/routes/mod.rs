/// API route handlers, one module per resource
///
/// - `health`: health check
/// - `auth`: registration and login
/// - `users`: admin user management, `/me`, profile, avatar upload
/// - `clients`: studio clients
/// - `sessions`: photo sessions and their photos
/// - `quotes`: quotes with line items
/// - `equipments`: inventory
/// - `transactions`: financial ledger
/// - `system`: key/value configuration

pub mod auth;
pub mod clients;
pub mod equipments;
pub mod health;
pub mod quotes;
pub mod sessions;
pub mod system;
pub mod transactions;
pub mod users;
