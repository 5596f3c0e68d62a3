// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, fs, path::PathBuf, str::FromStr};

use exchange_ews::ServiceConfig;

const APP_NAME: &str = "ews";
const EWS_CONFIG_ENV: &str = "EWS_CONFIG";

/// Load the service configuration.
///
/// The file is taken from `path`, then `$EWS_CONFIG`, then the user config
/// directory. A missing file at the default location yields the defaults.
///
/// # Errors
///
/// Returns an error if an explicitly named file cannot be read, or any file
/// fails to parse.
#[tracing::instrument]
pub fn parse_config(path: Option<PathBuf>) -> Result<ServiceConfig, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(EWS_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let config = get_config_dir()?.join(format!("{APP_NAME}/config.toml"));
        if !config.exists() {
            tracing::debug!(path = %config.display(), "no config found, using defaults");
            return Ok(ServiceConfig::default());
        }
        config
    };

    fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<ConfigRaw>()
        .map(|a| a.service)
}

#[derive(Debug, Default, serde::Deserialize)]
struct ConfigRaw {
    #[serde(default)]
    service: ServiceConfig,
}

impl FromStr for ConfigRaw {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".into())
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use exchange_ews::{ExchangeVersion, RequestFormat, ServiceErrorHandling};
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn write_config(dir: &TempDir, name: &str, version: &str) -> PathBuf {
        let path = dir.path().join(name);
        let toml_content = format!(
            r#"
[service]
requested_server_version = "{version}"
"#
        );
        fs::write(&path, toml_content).unwrap();
        path
    }

    #[test]
    fn parses_every_service_field() {
        let raw: ConfigRaw = r#"
[service]
requested_server_version = "Exchange2010_SP2"
time_zone = "Europe/Berlin"
error_handling = "return_errors"
format = "json"
"#
        .parse()
        .unwrap();

        let config = raw.service;
        assert_eq!(
            config.requested_server_version,
            ExchangeVersion::Exchange2010Sp2
        );
        assert_eq!(config.time_zone.as_deref(), Some("Europe/Berlin"));
        assert_eq!(config.error_handling, ServiceErrorHandling::ReturnErrors);
        assert_eq!(config.format, RequestFormat::Json);
    }

    #[test]
    fn missing_table_uses_defaults() {
        let raw: ConfigRaw = "".parse().unwrap();
        assert_eq!(
            raw.service.requested_server_version,
            ExchangeVersion::Exchange2013Sp1
        );
        assert_eq!(raw.service.format, RequestFormat::Xml);
    }

    #[test]
    fn rejects_unknown_versions() {
        let result = r#"
[service]
requested_server_version = "Exchange2003"
"#
        .parse::<ConfigRaw>();
        assert!(result.is_err());
    }

    #[test]
    fn cli_flag_overrides_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let cli_path = write_config(&temp_dir, "config.toml", "Exchange2013");
        let env_path = write_config(&temp_dir, "env_config.toml", "Exchange2010");

        let _guard = env_lock().lock().unwrap();
        unsafe {
            std::env::set_var(EWS_CONFIG_ENV, env_path.to_str().unwrap());
        }

        let config = parse_config(Some(cli_path)).unwrap();
        assert_eq!(
            config.requested_server_version,
            ExchangeVersion::Exchange2013
        );

        unsafe {
            std::env::remove_var(EWS_CONFIG_ENV);
        }
    }

    #[test]
    fn env_var_overrides_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let env_path = write_config(&temp_dir, "env_config.toml", "Exchange2010_SP1");

        let _guard = env_lock().lock().unwrap();
        unsafe {
            std::env::set_var(EWS_CONFIG_ENV, env_path.to_str().unwrap());
        }

        let config = parse_config(None).unwrap();
        assert_eq!(
            config.requested_server_version,
            ExchangeVersion::Exchange2010Sp1
        );

        unsafe {
            std::env::remove_var(EWS_CONFIG_ENV);
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = parse_config(Some(temp_dir.path().join("missing.toml")));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn uses_default_location_then_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let xdg_config_home = temp_dir.path().to_str().unwrap().to_string();

        let _guard = env_lock().lock().unwrap();
        unsafe {
            std::env::remove_var(EWS_CONFIG_ENV);
            std::env::set_var("XDG_CONFIG_HOME", &xdg_config_home);
        }

        let config = parse_config(None).unwrap();
        assert_eq!(
            config.requested_server_version,
            ExchangeVersion::Exchange2013Sp1
        );

        fs::create_dir_all(temp_dir.path().join(APP_NAME)).unwrap();
        write_config(&temp_dir, "ews/config.toml", "Exchange2007_SP1");
        let config = parse_config(None).unwrap();
        assert_eq!(
            config.requested_server_version,
            ExchangeVersion::Exchange2007Sp1
        );

        unsafe {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }
}
