//! INI file configuration adapter.
//!
//! Scalars go through configparser's typed getters (`getuint`, `getfloat`,
//! `getboolcoerce`); window lists are split on commas and parsed item by item.

use crate::domain::error::MacrossError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> MacrossError {
    MacrossError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn positive_window(section: &str, key: &str, raw: &str) -> Result<usize, MacrossError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(invalid(section, key, "window must be positive")),
        Ok(w) => Ok(w),
        Err(_) => Err(invalid(
            section,
            key,
            format!("window must be a positive integer, got {:?}", raw.trim()),
        )),
    }
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MacrossError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| MacrossError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, MacrossError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| MacrossError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_flag(&self, section: &str, key: &str) -> Result<Option<bool>, MacrossError> {
        self.config.getboolcoerce(section, key).map_err(|_| {
            let raw = self.get_string(section, key).unwrap_or_default();
            invalid(
                section,
                key,
                format!("expected true/false, yes/no, on/off or 1/0, got {:?}", raw),
            )
        })
    }

    fn get_window(&self, section: &str, key: &str) -> Result<Option<usize>, MacrossError> {
        match self.config.getuint(section, key) {
            Ok(None) => Ok(None),
            Ok(Some(0)) => Err(invalid(section, key, "window must be positive")),
            Ok(Some(w)) => usize::try_from(w)
                .map(Some)
                .map_err(|_| invalid(section, key, format!("window {} is too large", w))),
            Err(_) => {
                let raw = self.get_string(section, key).unwrap_or_default();
                positive_window(section, key, &raw).map(Some)
            }
        }
    }

    fn get_windows(
        &self,
        section: &str,
        key: &str,
    ) -> Result<Option<Vec<usize>>, MacrossError> {
        let Some(raw) = self.get_string(section, key) else {
            return Ok(None);
        };
        raw.split(',')
            .map(|item| positive_window(section, key, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}
