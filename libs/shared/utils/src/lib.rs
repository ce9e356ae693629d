pub mod confirmation;
pub mod extractor;
pub mod image;
pub mod jwt;
pub mod test_utils;
pub mod time;
pub mod validation;
