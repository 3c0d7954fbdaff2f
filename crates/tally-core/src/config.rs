use crate::orchestrator::LoadOptions;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 4820;
pub const DEFAULT_VIEWS_SQL: &str = "sql/entity_events_nested.sql";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub db_path: PathBuf,
    pub views_sql: PathBuf,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let data_dir = get("TALLY_DATA_DIR").map_or_else(|| PathBuf::from("data"), PathBuf::from);
        let raw_dir = get("TALLY_RAW_DIR").map_or_else(|| data_dir.join("raw"), PathBuf::from);
        let db_path =
            get("TALLY_DB_PATH").map_or_else(|| data_dir.join("tally.db"), PathBuf::from);
        let views_sql = get("TALLY_VIEWS_SQL")
            .map_or_else(|| PathBuf::from(DEFAULT_VIEWS_SQL), PathBuf::from);
        let port = get("TALLY_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let log_format = match get("TALLY_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Self {
            data_dir,
            raw_dir,
            db_path,
            views_sql,
            port,
            log_format,
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            raw_dir: self.raw_dir.clone(),
            views_script: Some(self.views_sql.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_hang_off_data_dir() {
        let config = config(&[]);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(config.db_path, PathBuf::from("data/tally.db"));
        assert_eq!(config.views_sql, PathBuf::from(DEFAULT_VIEWS_SQL));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn data_dir_moves_derived_paths() {
        let config = config(&[("TALLY_DATA_DIR", "/srv/tally")]);
        assert_eq!(config.raw_dir, PathBuf::from("/srv/tally/raw"));
        assert_eq!(config.db_path, PathBuf::from("/srv/tally/tally.db"));
    }

    #[test]
    fn explicit_values_win() {
        let config = config(&[
            ("TALLY_DATA_DIR", "/srv/tally"),
            ("TALLY_RAW_DIR", "/mnt/batches"),
            ("TALLY_DB_PATH", "/var/lib/tally.db"),
            ("TALLY_PORT", "9000"),
            ("TALLY_LOG_FORMAT", "json"),
        ]);
        assert_eq!(config.raw_dir, PathBuf::from("/mnt/batches"));
        assert_eq!(config.db_path, PathBuf::from("/var/lib/tally.db"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(config(&[("TALLY_PORT", "not-a-port")]).port, DEFAULT_PORT);
    }
}
