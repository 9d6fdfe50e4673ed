pub mod document;
pub mod improvement;
pub mod job;
pub mod resume;
