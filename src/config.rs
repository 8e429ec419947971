use crate::formatting::Format;

use log::LevelFilter;
use std::env::var;
use std::path::PathBuf;

const LOG_FILE_NAME: &str = "vcdedit.log";

#[derive(Debug)]
pub struct Config {
    config_dir: Option<PathBuf>,
    log_level: LevelFilter,
    format: Option<Format>,
}

impl Config {
    pub fn load() -> Self {
        let config_dir = Self::find_config_dir();
        let log_level = var("VCDEDIT_LOG")
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Warn);
        let format = var("VCDEDIT_FORMAT")
            .ok()
            .and_then(|format| format.parse().ok());

        Self {
            config_dir,
            log_level,
            format,
        }
    }

    pub fn test_config() -> Self {
        Self {
            config_dir: None,
            log_level: LevelFilter::Off,
            format: None,
        }
    }

    fn find_config_dir() -> Option<PathBuf> {
        let mut path = PathBuf::new();

        if let Ok(config_home) = var("VCDEDIT_CONFIG_HOME") {
            path.push(&config_home);
        } else if let Ok(xdg_config_home) = var("XDG_CONFIG_HOME") {
            if !xdg_config_home.is_empty() {
                path.push(xdg_config_home);
                path.push("vcdedit");
            }
        } else if let Ok(home) = var("HOME") {
            if !home.is_empty() {
                path.push(home);
                path.push(".config");
                path.push("vcdedit");
            }
        }

        if !path.as_os_str().is_empty() && path.exists() {
            Some(path)
        } else {
            None
        }
    }

    pub fn get_config_dir(&self) -> Option<&PathBuf> {
        self.config_dir.as_ref()
    }

    /// Log file inside the config directory, if there is one.
    pub fn get_log_file(&self) -> Option<PathBuf> {
        self.config_dir.as_ref()
            .map(|dir| dir.join(LOG_FILE_NAME))
    }

    pub fn get_log_level(&self) -> LevelFilter {
        self.log_level
    }

    /// Display format forced for every variable, overriding the decoded defaults.
    pub fn get_format(&self) -> Option<Format> {
        self.format
    }
}
