pub mod types;
pub mod classification;

pub use types::ShiplensError;
pub use classification::ErrorClassification;
