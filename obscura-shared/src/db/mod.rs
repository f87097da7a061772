/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded migration runner (SQL lives in `migrations/`
///   at the workspace root)

pub mod migrations;
pub mod pool;
