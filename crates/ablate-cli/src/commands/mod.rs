pub mod analyze;
pub mod configure;
pub mod version;
