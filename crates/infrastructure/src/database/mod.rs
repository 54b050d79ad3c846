pub mod manager;
pub mod mysql;
pub mod store;

pub use manager::DatabaseManager;
pub use mysql::MySqlMaintenanceRepository;
pub use store::{SqlParam, SqlStore};
