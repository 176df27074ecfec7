pub mod file_detection;
pub mod language;
pub mod test_helpers;
