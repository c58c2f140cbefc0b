use std::{
    collections::HashMap,
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use config::{Config as ConfigLoader, Environment};
use is_terminal::IsTerminal;
use once_cell::sync::Lazy;
use serde::Deserialize;

const PREFIX: &str = "AUTHGATE";

pub static CONFIG: Lazy<Config> = Lazy::new(|| init_config());

#[derive(Debug)]
pub enum LogStyle {
    Auto,
    Always,
    Never,
}

impl Default for LogStyle {
    fn default() -> Self {
        Self::Auto
    }
}

impl LogStyle {
    pub fn is_color(&self) -> bool {
        match self {
            LogStyle::Auto => std::io::stdout().is_terminal(),
            LogStyle::Always => true,
            LogStyle::Never => false,
        }
    }
}

impl<'de> Deserialize<'de> for LogStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?.to_lowercase();
        match s.as_str() {
            "auto" => Ok(LogStyle::Auto),
            "always" => Ok(LogStyle::Always),
            "never" => Ok(LogStyle::Never),
            _ => Err(serde::de::Error::unknown_field(
                &s,
                &["auto", "always", "never"],
            )),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Log {
    pub level: String,
    pub style: LogStyle,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: Self::level(),
            style: LogStyle::default(),
        }
    }
}

impl Log {
    fn level() -> String {
        String::from("authgate=info")
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Auth {
    pub ttl_seconds: u64,
    pub token_key_prefix: String,
    pub credentials: HashMap<String, String>,
    pub hashed_credentials: bool,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            // 8 hours
            ttl_seconds: 28_800,
            token_key_prefix: String::from("authToken:"),
            credentials: HashMap::new(),
            hashed_credentials: false,
        }
    }
}

impl Auth {
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("session ttl must be greater than zero".into());
        }
        if self.token_key_prefix.trim().is_empty() {
            return Err("token key prefix must not be empty".into());
        }
        if self.credentials.is_empty() {
            return Err("at least one credential must be configured".into());
        }
        for (username, secret) in &self.credentials {
            if username.trim().is_empty() {
                return Err("credential usernames must not be empty".into());
            }
            if secret.is_empty() {
                return Err(format!("credential secret for {username} must not be empty"));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut usernames: Vec<&str> = self.credentials.keys().map(String::as_str).collect();
        usernames.sort_unstable();
        f.debug_struct("Auth")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("token_key_prefix", &self.token_key_prefix)
            .field("users", &usernames)
            .field("hashed_credentials", &self.hashed_credentials)
            .finish()
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    pub log: Log,
    pub addr: SocketAddr,
    pub debug: bool,
    pub auth: Auth,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log: Log::default(),
            addr: Self::addr(),
            debug: true,
            auth: Auth::default(),
        }
    }
}

impl Config {
    fn addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 3030)
    }
}

pub fn init_config() -> Config {
    let config = ConfigLoader::builder()
        .add_source(
            Environment::with_prefix(PREFIX)
                .separator("_")
                .try_parsing(true),
        )
        .add_source(
            Environment::with_prefix(PREFIX)
                .separator("__")
                .prefix_separator("_")
                .try_parsing(true),
        )
        .build()
        .and_then(|cfg| cfg.try_deserialize::<Config>());

    match config {
        Ok(config) => {
            if let Err(err) = config.auth.validate() {
                panic!("{}", err);
            }
            println!("{:#?}", config);
            config
        }
        Err(err) => {
            panic!("{:?}", err);
        }
    }
}
