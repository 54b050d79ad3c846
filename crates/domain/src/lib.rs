pub mod entities;
pub mod naming;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use preventive_errors::{SyncError, SyncResult};
pub use repositories::*;
pub use value_objects::*;
