pub mod items;
pub mod lenient;
pub mod report;
pub mod vocab;

pub use items::*;
pub use report::Report;
pub use vocab::*;
