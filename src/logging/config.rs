use std::{env, fmt, fs, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Уровни, которые принимает `level`.
const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Формат вывода событий.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Настройки консольного sink-а.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_line_numbers: bool,
}

/// Настройки файлового sink-а (ротация раз в сутки).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub filename: String,
    pub format: LogFormat,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень для событий avldb (trace, debug, info, warn, error, off)
    pub level: String,
    /// Формат консольного вывода
    pub format: LogFormat,
    pub console: ConsoleConfig,
    pub file: FileConfig,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(StoreError::Logging(format!("unknown log format '{other}'"))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            with_ansi: true,
            with_target: true,
            with_line_numbers: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("logs"),
            filename: "avldb.log".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

impl LoggingConfig {
    /// Переопределения из окружения: `AVLDB_LOG_LEVEL`, `AVLDB_LOG_FORMAT`.
    /// Некорректный формат игнорируется.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("AVLDB_LOG_LEVEL") {
            self.level = level.to_ascii_lowercase();
        }

        if let Ok(format) = env::var("AVLDB_LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                self.format = format;
            }
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        if !LEVELS.contains(&self.level.as_str()) {
            return Err(StoreError::Logging(format!(
                "unknown log level '{}', expected one of {:?}",
                self.level, LEVELS
            )));
        }

        if self.file.enabled && self.file.filename.trim().is_empty() {
            return Err(StoreError::Logging("log filename is empty".to_string()));
        }

        Ok(())
    }

    /// Директива для `EnvFilter`: чужие крейты на warn, avldb на `level`.
    pub fn build_filter_directive(&self) -> String {
        format!("warn,avldb={}", self.level)
    }

    pub fn ensure_log_dir(&self) -> StoreResult<()> {
        if self.file.enabled {
            fs::create_dir_all(&self.file.dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = LoggingConfig::default();

        assert_eq!(cfg.level, "info");
        assert_eq!(cfg.format, LogFormat::Compact);
        assert!(cfg.console.enabled);
        assert!(!cfg.file.enabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let cfg = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };

        assert!(matches!(cfg.validate(), Err(StoreError::Logging(_))));
    }

    #[test]
    fn test_validate_rejects_empty_filename() {
        let mut cfg = LoggingConfig::default();
        cfg.file.enabled = true;
        cfg.file.filename = "  ".to_string();

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_filter_directive() {
        let cfg = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };

        assert_eq!(cfg.build_filter_directive(), "warn,avldb=debug");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let cfg: LoggingConfig =
            serde_json::from_str(r#"{"level":"trace","file":{"enabled":true}}"#).unwrap();

        assert_eq!(cfg.level, "trace");
        assert!(cfg.file.enabled);
        assert_eq!(cfg.file.filename, "avldb.log");
        assert_eq!(cfg.format, LogFormat::Compact);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        env::set_var("AVLDB_LOG_LEVEL", "WARN");
        env::set_var("AVLDB_LOG_FORMAT", "json");

        let mut cfg = LoggingConfig::default();
        cfg.apply_env_overrides();

        env::remove_var("AVLDB_LOG_LEVEL");
        env::remove_var("AVLDB_LOG_FORMAT");

        assert_eq!(cfg.level, "warn");
        assert_eq!(cfg.format, LogFormat::Json);
    }

    #[test]
    fn test_ensure_log_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = LoggingConfig::default();
        cfg.file.enabled = true;
        cfg.file.dir = tmp.path().join("nested").join("logs");

        cfg.ensure_log_dir().unwrap();

        assert!(cfg.file.dir.is_dir());
    }
}
