use crate::default_struct;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("environment variable {0} is empty")]
    Empty(&'static str),
}

default_struct! {
/// Addresses and metadata of the Minecraft server the bot advertises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinecraftConfig {
    pub java_ip: String = "landsofminearchy.com".to_string(),
    pub bedrock_ip: String = "landsofminearchy.com".to_string(),
    pub version: String = "1.21".to_string(),
    pub status_api: String = "https://api.mcsrvstat.us/3".to_string(),
}
}

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub prefix: String,
    pub minecraft: MinecraftConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("prefix", &self.prefix)
            .field("minecraft", &self.minecraft)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |name: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(name)),
                Some(value) => Ok(Some(value.trim().to_string())),
                None => Ok(None),
            }
        };

        let token = optional("DISCORD_TOKEN")?.ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let defaults = MinecraftConfig::default();
        let minecraft = MinecraftConfig {
            java_ip: optional("MINECRAFT_JAVA_IP")?.unwrap_or(defaults.java_ip),
            bedrock_ip: optional("MINECRAFT_BEDROCK_IP")?.unwrap_or(defaults.bedrock_ip),
            version: optional("MINECRAFT_VERSION")?.unwrap_or(defaults.version),
            status_api: optional("MINECRAFT_STATUS_API")?
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.status_api),
        };

        Ok(Self {
            token,
            prefix: optional("BOT_PREFIX")?.unwrap_or_else(|| "!".to_string()),
            minecraft,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "abc")])).unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.prefix, "!");
        assert_eq!(config.minecraft, MinecraftConfig::default());
        assert_eq!(config.minecraft.version, "1.21");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", " abc "),
            ("BOT_PREFIX", "?"),
            ("MINECRAFT_JAVA_IP", "java.example.com"),
            ("MINECRAFT_BEDROCK_IP", "bedrock.example.com"),
            ("MINECRAFT_STATUS_API", "http://localhost:8080/"),
        ]))
        .unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.prefix, "?");
        assert_eq!(config.minecraft.java_ip, "java.example.com");
        assert_eq!(config.minecraft.bedrock_ip, "bedrock.example.com");
        assert_eq!(config.minecraft.status_api, "http://localhost:8080");
    }

    #[test]
    fn test_debug_hides_token() {
        let config = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "super-secret")])).unwrap();
        let printed = format!("{config:?}");

        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("landsofminearchy.com"));
    }

    #[test]
    fn test_missing_token() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DISCORD_TOKEN"));
    }

    #[test]
    fn test_empty_value() {
        let err = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "abc"), ("BOT_PREFIX", "  ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Empty("BOT_PREFIX"));
    }
}
