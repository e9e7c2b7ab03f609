pub mod connection;
pub mod schema;
pub mod snapshots;

pub use connection::Database;
pub use snapshots::DASHBOARD_SNAPSHOT_KEY;
