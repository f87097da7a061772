/// Entity models and their database operations
///
/// One module per resource. Each model is a `sqlx::FromRow` struct with
/// associated-function CRUD, plus `Create*`/`Update*` input structs used
/// by the route handlers.
///
/// - `user`: accounts, roles, and the password-free [`user::UserView`]
/// - `client`: studio clients
/// - `session`: photo sessions and their status lifecycle
/// - `photo`: photos attached to a session
/// - `quote`: quotes with child line items
/// - `equipment`: inventory
/// - `transaction`: financial ledger entries
/// - `system_config`: key/value configuration rows

pub mod client;
pub mod equipment;
pub mod photo;
pub mod quote;
pub mod session;
pub mod system_config;
pub mod transaction;
pub mod user;
