//! Module holding the typed in-memory representation of a problem instance
pub mod endpoint;
pub mod model;
pub mod request;
pub mod video;
