use std::{env, fmt, str::FromStr};

pub const DEFAULT_SALON_PHONE: &str = "9167676133";
pub const DEFAULT_SALON_ADDRESS: &str = "Shop No. 7, White Rose Bldg., Near RTO & LIC Office, Louiswadi, Eastern Express Highway, Thane (W) 400604";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppMode {
    Development,
    Production,
}

impl AppMode {
    pub fn is_production(self) -> bool {
        self == AppMode::Production
    }

    /// `APP_ENV` wins; `NODE_ENV` is honoured for deployments that only set that.
    pub fn from_vars(app_env: Option<String>, node_env: Option<String>) -> Self {
        app_env
            .filter(|value| !value.trim().is_empty())
            .or(node_env)
            .and_then(|value| value.parse().ok())
            .unwrap_or(AppMode::Development)
    }

    pub fn default_log_filter(self) -> &'static str {
        match self {
            AppMode::Development => "debug",
            AppMode::Production => "info",
        }
    }
}

impl FromStr for AppMode {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(AppMode::Production),
            _ => Ok(AppMode::Development),
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppMode::Development => f.write_str("development"),
            AppMode::Production => f.write_str("production"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoreSettings {
    pub url: String,
    pub service_key: String,
    pub upload_bucket: String,
}

impl StoreSettings {
    pub fn configured(&self) -> bool {
        !(self.url.trim().is_empty() || self.service_key.trim().is_empty())
    }
}

#[derive(Clone, Debug)]
pub struct SalonProfile {
    pub phone: String,
    pub address: String,
}

/// Admin credential as read from the environment. The password is hashed by
/// [`crate::auth::AdminGate::from_credentials`] and never stored in [`Settings`].
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Process-wide configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
    pub mode: AppMode,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub store: StoreSettings,
    pub salon: SalonProfile,
}

impl Settings {
    pub fn from_env() -> Self {
        let mode = AppMode::from_vars(env::var("APP_ENV").ok(), env::var("NODE_ENV").ok());

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3000);

        Self {
            mode,
            host: var_or("HOST", "0.0.0.0"),
            port,
            static_dir: var_or("STATIC_DIR", "./static"),
            store: StoreSettings {
                url: var_or("SUPABASE_URL", ""),
                service_key: var_or("SUPABASE_SERVICE_ROLE_KEY", ""),
                upload_bucket: var_or("UPLOAD_BUCKET", "gallery-images"),
            },
            salon: SalonProfile {
                phone: var_or("SALON_PHONE", DEFAULT_SALON_PHONE),
                address: var_or("SALON_ADDRESS", DEFAULT_SALON_ADDRESS),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AdminCredentials {
    /// Returns `None` unless both `ADMIN_USERNAME` and `ADMIN_PASSWORD` are set.
    pub fn from_env() -> Option<Self> {
        let username = env::var("ADMIN_USERNAME").ok()?;
        let password = env::var("ADMIN_PASSWORD").ok()?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Settings {
    pub fn for_tests() -> Self {
        Self {
            mode: AppMode::Development,
            host: "127.0.0.1".to_string(),
            port: 0,
            static_dir: "./static".to_string(),
            store: StoreSettings {
                url: "https://example.supabase.co".to_string(),
                service_key: "service-key".to_string(),
                upload_bucket: "gallery-images".to_string(),
            },
            salon: SalonProfile {
                phone: DEFAULT_SALON_PHONE.to_string(),
                address: DEFAULT_SALON_ADDRESS.to_string(),
            },
        }
    }
}
