use serde::Deserialize;
use thiserror::Error;

/// Session layout and rendering knobs for a [`Terminal`](crate::Terminal).
///
/// Every field has a default, so a JSON document only needs the keys it
/// wants to change:
///
/// ```
/// use cmd_trainer::ShellConfig;
///
/// let config = ShellConfig::from_json(r#"{ "page_size": 10 }"#).unwrap();
/// assert_eq!(config.page_size, 10);
/// assert_eq!(config.home, r"C:\Users\Player");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Starting working directory, created on construction.
    pub home: String,
    /// Directories created inside `home` on construction, in listing order.
    pub home_dirs: Vec<String>,
    /// Lines per page for `dir /p`.
    pub page_size: usize,
    /// Names per line for `dir /w`.
    pub wide_columns: usize,
    /// File names that are created with the read-only flag set.
    pub read_only_files: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            home: r"C:\Users\Player".to_string(),
            home_dirs: vec!["Documents".to_string(), "Desktop".to_string()],
            page_size: 20,
            wide_columns: 5,
            read_only_files: vec!["readonly.txt".to_string()],
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't parse shell config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid shell config: {0}")]
    Invalid(&'static str),
}

impl ShellConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1"));
        }
        if self.wide_columns == 0 {
            return Err(ConfigError::Invalid("wide_columns must be at least 1"));
        }
        let Some(rest) = self.home.strip_prefix(r"C:\") else {
            return Err(ConfigError::Invalid(r"home must be an absolute path on C:\"));
        };
        if !rest.is_empty() && !rest.split('\\').all(is_plain_name) {
            return Err(ConfigError::Invalid("home must not contain empty, . or .. components"));
        }
        if !self.home_dirs.iter().all(|dir| is_plain_name(dir)) {
            return Err(ConfigError::Invalid("home_dirs must be single names other than . and .."));
        }
        Ok(())
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = ShellConfig::default();
        assert_eq!(config.home, r"C:\Users\Player");
        assert_eq!(config.home_dirs, vec!["Documents", "Desktop"]);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.wide_columns, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ShellConfig::from_json(r#"{ "wide_columns": 3 }"#).unwrap();
        assert_eq!(config.wide_columns, 3);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.read_only_files, vec!["readonly.txt"]);
    }

    #[test]
    fn test_rejects_bad_values() {
        let result = ShellConfig::from_json(r#"{ "page_size": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = ShellConfig::from_json(r#"{ "home": "/home/player" }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = ShellConfig::from_json("not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_navigation_in_layout() {
        for home in ["", r"C:\a\..\b", r"C:\Users\.", r"C:\Users\\Player", r"C:\Users\"] {
            let config = ShellConfig {
                home: home.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "accepted home {home:?}"
            );
        }

        for dir in ["", ".", "..", r"a\b"] {
            let config = ShellConfig {
                home_dirs: vec![dir.to_string()],
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "accepted home_dir {dir:?}"
            );
        }

        let config = ShellConfig {
            home: r"C:\".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
