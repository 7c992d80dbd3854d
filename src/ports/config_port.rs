//! Configuration access port trait.
//!
//! Typed getters return `Ok(None)` for an absent key and `ConfigInvalid` for a value
//! that is present but malformed.

use crate::domain::error::MacrossError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    fn get_flag(&self, section: &str, key: &str) -> Result<Option<bool>, MacrossError>;

    /// A positive integer moving-average window.
    fn get_window(&self, section: &str, key: &str) -> Result<Option<usize>, MacrossError>;

    /// A comma-separated list of positive integer windows.
    fn get_windows(
        &self,
        section: &str,
        key: &str,
    ) -> Result<Option<Vec<usize>>, MacrossError>;
}
