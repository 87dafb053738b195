//! Configuration-level error types

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing setting {setting} (set {env} or {setting} in the config file)")]
    MissingSetting {
        setting: &'static str,
        env: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let config_err = Error::Config("timeout_secs must be greater than 0".into());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: timeout_secs must be greater than 0"
        );

        let io_err = Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(
            io_err.to_string().starts_with("I/O error:"),
            "got: {}",
            io_err
        );
    }

    #[test]
    fn missing_setting_names_env_var_and_key() {
        let err = Error::MissingSetting {
            setting: "oauth.allowed_domain",
            env: "ALLOWED_DOMAIN",
        };
        let msg = err.to_string();
        assert!(msg.contains("ALLOWED_DOMAIN"), "got: {msg}");
        assert!(msg.contains("oauth.allowed_domain"), "got: {msg}");
    }
}
