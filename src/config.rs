use std::env;
use std::fmt;

use uuid::Uuid;

/// Which credential store implementation the services run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Users and tasks live in Postgres; the URLs may point at the same
    /// database or at two separate ones.
    Postgres {
        users_database_url: String,
        tasks_database_url: String,
    },
    /// Process-local storage, lost on restart.
    Memory,
}

/// Whether update/delete are restricted to the task owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnershipPolicy {
    /// Look tasks up by id alone; any authenticated caller may change them.
    #[default]
    Unscoped,
    /// Tasks owned by another user are reported as not found.
    Owner,
}

impl OwnershipPolicy {
    /// The owner filter to hand to the store for a request made by `caller`.
    pub fn scope(self, caller: Uuid) -> Option<Uuid> {
        match self {
            OwnershipPolicy::Unscoped => None,
            OwnershipPolicy::Owner => Some(caller),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret used to sign new tokens.
    pub secret: String,
    /// Retired secrets still accepted when verifying.
    pub previous_secrets: Vec<String>,
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub user_service_port: u16,
    pub task_service_port: u16,
    pub storage: StorageBackend,
    pub jwt: JwtConfig,
    pub bcrypt_cost: u32,
    pub task_ownership: OwnershipPolicy,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

const DEFAULT_TTL_SECONDS: i64 = 60 * 60;
/// Thirty days.
const MAX_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_BCRYPT_COST: u32 = 10;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("postgres") {
            "postgres" => {
                let fallback = get("DATABASE_URL");
                let users_database_url = get("USERS_DATABASE_URL")
                    .or_else(|| fallback.clone())
                    .ok_or(ConfigError::Missing("USERS_DATABASE_URL or DATABASE_URL"))?;
                let tasks_database_url = get("TASKS_DATABASE_URL")
                    .or(fallback)
                    .ok_or(ConfigError::Missing("TASKS_DATABASE_URL or DATABASE_URL"))?;
                StorageBackend::Postgres {
                    users_database_url,
                    tasks_database_url,
                }
            }
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let jwt = JwtConfig {
            secret: get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            previous_secrets: get("JWT_PREVIOUS_SECRETS")
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            ttl_seconds: parse_or(&get, "JWT_TTL_SECONDS", DEFAULT_TTL_SECONDS)?,
        };
        if !(1..=MAX_TTL_SECONDS).contains(&jwt.ttl_seconds) {
            return Err(ConfigError::Invalid {
                key: "JWT_TTL_SECONDS",
                value: jwt.ttl_seconds.to_string(),
            });
        }

        let bcrypt_cost = parse_or(&get, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let task_ownership = match get("TASK_OWNERSHIP").as_deref().unwrap_or("unscoped") {
            "unscoped" => OwnershipPolicy::Unscoped,
            "owner" => OwnershipPolicy::Owner,
            other => {
                return Err(ConfigError::Invalid {
                    key: "TASK_OWNERSHIP",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            user_service_port: parse_or(&get, "USER_SERVICE_PORT", 5001)?,
            task_service_port: parse_or(&get, "TASK_SERVICE_PORT", 5002)?,
            storage,
            jwt,
            bcrypt_cost,
            task_ownership,
        })
    }

    pub fn server_url(&self, port: u16) -> String {
        format!("http://{}:{}", self.server_host, port)
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.user_service_port, 5001);
        assert_eq!(config.task_service_port, 5002);
        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                users_database_url: "postgres://test".into(),
                tasks_database_url: "postgres://test".into(),
            }
        );
        assert_eq!(config.jwt.ttl_seconds, 3600);
        assert!(config.jwt.previous_secrets.is_empty());
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.task_ownership, OwnershipPolicy::Unscoped);
        assert_eq!(config.server_url(5001), "http://127.0.0.1:5001");
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("USER_SERVICE_PORT", "7001"),
            ("TASK_SERVICE_PORT", "7002"),
            ("DATABASE_URL", "postgres://shared"),
            ("TASKS_DATABASE_URL", "postgres://tasks"),
            ("JWT_SECRET", "current"),
            ("JWT_PREVIOUS_SECRETS", "old-1, old-2,"),
            ("JWT_TTL_SECONDS", "120"),
            ("BCRYPT_COST", "12"),
            ("TASK_OWNERSHIP", "owner"),
        ]))
        .unwrap();

        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.user_service_port, 7001);
        assert_eq!(config.task_service_port, 7002);
        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                users_database_url: "postgres://shared".into(),
                tasks_database_url: "postgres://tasks".into(),
            }
        );
        assert_eq!(config.jwt.previous_secrets, vec!["old-1", "old-2"]);
        assert_eq!(config.jwt.ttl_seconds, 120);
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.task_ownership, OwnershipPolicy::Owner);
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        let config = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn test_config_errors() {
        assert_eq!(
            Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://test")])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "s")])).unwrap_err(),
            ConfigError::Missing("USERS_DATABASE_URL or DATABASE_URL")
        );
        assert!(matches!(
            Config::from_lookup(lookup(&[
                ("STORAGE_BACKEND", "memory"),
                ("JWT_SECRET", "s"),
                ("USER_SERVICE_PORT", "not-a-port"),
            ])),
            Err(ConfigError::Invalid { key: "USER_SERVICE_PORT", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[
                ("STORAGE_BACKEND", "memory"),
                ("JWT_SECRET", "s"),
                ("BCRYPT_COST", "2"),
            ])),
            Err(ConfigError::Invalid { key: "BCRYPT_COST", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("STORAGE_BACKEND", "mongo"), ("JWT_SECRET", "s")])),
            Err(ConfigError::Invalid { key: "STORAGE_BACKEND", .. })
        ));
    }

    #[test]
    fn test_token_ttl_bounds() {
        let with_ttl = |ttl: &str| {
            Config::from_lookup(lookup(&[
                ("STORAGE_BACKEND", "memory"),
                ("JWT_SECRET", "s"),
                ("JWT_TTL_SECONDS", ttl),
            ]))
        };

        for ttl in ["0", "-5", "2592001", "10000000000000"] {
            assert_eq!(
                with_ttl(ttl).unwrap_err(),
                ConfigError::Invalid {
                    key: "JWT_TTL_SECONDS",
                    value: ttl.to_string(),
                },
                "ttl: {}",
                ttl
            );
        }
        assert_eq!(with_ttl("2592000").unwrap().jwt.ttl_seconds, 2_592_000);
    }

    #[test]
    fn test_ownership_scope() {
        let caller = Uuid::new_v4();
        assert_eq!(OwnershipPolicy::Unscoped.scope(caller), None);
        assert_eq!(OwnershipPolicy::Owner.scope(caller), Some(caller));
    }
}
