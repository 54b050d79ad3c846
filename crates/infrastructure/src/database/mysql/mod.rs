mod maintenance_repository;
pub mod schema;

pub use maintenance_repository::MySqlMaintenanceRepository;
