use std::{env, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const CONFIG_PATH: &str = "app.json";

/// 帳號未設定時的預設值，寄信前會被擋下來
pub const SMTP_USER_PLACEHOLDER: &str = "your-email@gmail.com";
/// 密碼未設定時的預設值，寄信前會被擋下來
pub const SMTP_PASSWORD_PLACEHOLDER: &str = "your-app-password";

const DEFAULT_INEGI_URL: &str = "https://gaia.inegi.org.mx/sakbe_v3.1/combustible";
const DEFAULT_INEGI_KEY: &str = "6Gwy3bY5-mG1W-2Jmk-ViXt-jCS7lbiAbeBI";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub inegi: Inegi,
    #[serde(default)]
    pub smtp: Smtp,
}

const INEGI_API_URL: &str = "INEGI_API_URL";
const INEGI_API_KEY: &str = "INEGI_API_KEY";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Inegi {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub key: String,
}

impl Default for Inegi {
    fn default() -> Self {
        Inegi {
            url: DEFAULT_INEGI_URL.to_string(),
            key: DEFAULT_INEGI_KEY.to_string(),
        }
    }
}

const SMTP_USER: &str = "SMTP_USER";
const SMTP_PASS: &str = "SMTP_PASS";
const SMTP_HOST: &str = "SMTP_HOST";
const SMTP_PORT: &str = "SMTP_PORT";
const SMTP_SECURE: &str = "SMTP_SECURE";
const GMAIL_USER: &str = "GMAIL_USER";
const GMAIL_APP_PASSWORD: &str = "GMAIL_APP_PASSWORD";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Smtp {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub secure: bool,
}

impl Default for Smtp {
    fn default() -> Self {
        Smtp {
            user: SMTP_USER_PLACEHOLDER.to_string(),
            password: SMTP_PASSWORD_PLACEHOLDER.to_string(),
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            secure: true,
        }
    }
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| App::get().expect("Config error"));

impl App {
    pub fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::from_env())
    }

    /// 從 env 中讀取設定值，沒設定的欄位使用預設值
    fn from_env() -> Self {
        App::default().override_with_env()
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(url) = env::var(INEGI_API_URL) {
            self.inegi.url = url;
        }

        if let Ok(key) = env::var(INEGI_API_KEY) {
            self.inegi.key = key;
        }

        // SMTP_USER 優先，其次沿用舊的 GMAIL_USER
        if let Ok(user) = env::var(SMTP_USER) {
            self.smtp.user = user;
        } else if let Ok(user) = env::var(GMAIL_USER) {
            self.smtp.user = user;
        }

        if let Ok(password) = env::var(SMTP_PASS) {
            self.smtp.password = password;
        } else if let Ok(password) = env::var(GMAIL_APP_PASSWORD) {
            self.smtp.password = password;
        }

        if let Ok(host) = env::var(SMTP_HOST) {
            self.smtp.host = host;
        }

        if let Ok(port) = env::var(SMTP_PORT) {
            self.smtp.port = u16::from_str(&port).unwrap_or(DEFAULT_SMTP_PORT);
        }

        if let Ok(secure) = env::var(SMTP_SECURE) {
            self.smtp.secure = secure == "true";
        }

        self
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let app = App::default();

        assert_eq!(app.inegi.url, DEFAULT_INEGI_URL);
        assert_eq!(app.smtp.user, SMTP_USER_PLACEHOLDER);
        assert_eq!(app.smtp.password, SMTP_PASSWORD_PLACEHOLDER);
        assert_eq!(app.smtp.host, DEFAULT_SMTP_HOST);
        assert_eq!(app.smtp.port, 465);
        assert!(app.smtp.secure);
    }

    #[test]
    fn test_override_with_env() {
        env::set_var(SMTP_HOST, "smtp.example.com");
        env::set_var(SMTP_PORT, "587");
        env::set_var(SMTP_SECURE, "false");

        let app = App::default().override_with_env();

        assert_eq!(app.smtp.host, "smtp.example.com");
        assert_eq!(app.smtp.port, 587);
        assert!(!app.smtp.secure);

        env::remove_var(SMTP_HOST);
        env::remove_var(SMTP_PORT);
        env::remove_var(SMTP_SECURE);
    }
}
