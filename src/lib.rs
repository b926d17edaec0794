pub mod diff;
pub mod error;
pub mod filter;
pub mod model;
pub mod profile;
pub mod report;
