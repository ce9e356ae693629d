pub mod patient;
pub mod validation;
