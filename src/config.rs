use std::collections::HashSet;

use thiserror::Error;

use crate::{
    account::{AccountId, AccountProvision, DEFAULT_ACCOUNTS},
    processor::optimistic_processor::DEFAULT_RETRY_LIMIT,
};

pub const DEFAULT_PORT: u16 = 9999;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value `{value}`: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub retry_limit: u32,
    pub accounts: Vec<AccountProvision>,
    pub ledger_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            retry_limit: DEFAULT_RETRY_LIMIT,
            accounts: DEFAULT_ACCOUNTS.to_vec(),
            ledger_capacity: None,
        }
    }
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(value) = lookup("PORT") {
            config.port = parse_number("PORT", &value)?;
        }
        if let Some(value) = lookup("LEDGER_RETRY_LIMIT") {
            config.retry_limit = parse_number("LEDGER_RETRY_LIMIT", &value)?;
            if config.retry_limit == 0 {
                return Err(invalid("LEDGER_RETRY_LIMIT", &value, "must be at least 1"));
            }
        }
        if let Some(value) = lookup("LEDGER_ACCOUNTS") {
            config.accounts = parse_accounts(&value)?;
        }
        if let Some(value) = lookup("LEDGER_CAPACITY") {
            config.ledger_capacity = Some(parse_number("LEDGER_CAPACITY", &value)?);
        }
        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_owned(),
        reason: reason.to_string(),
    }
}

fn parse_number<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|err| invalid(var, value, err))
}

/// Parses `id:limit` pairs separated by commas, e.g. `1:100000,2:80000`.
fn parse_accounts(value: &str) -> Result<Vec<AccountProvision>, ConfigError> {
    const VAR: &str = "LEDGER_ACCOUNTS";
    let mut seen = HashSet::new();
    let mut accounts = Vec::new();
    for pair in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((id, limit)) = pair.split_once(':') else {
            return Err(invalid(VAR, value, format!("expected `id:limit`, got `{pair}`")));
        };
        let id: AccountId = parse_number(VAR, id)?;
        let limit: i64 = parse_number(VAR, limit)?;
        if limit < 0 {
            return Err(invalid(VAR, value, format!("limit of account {id} is negative")));
        }
        if !seen.insert(id) {
            return Err(invalid(VAR, value, format!("account {id} listed twice")));
        }
        accounts.push(AccountProvision::new(id, limit));
    }
    if accounts.is_empty() {
        return Err(invalid(VAR, value, "no accounts"));
    }
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 9999);
        assert_eq!(config.accounts.len(), 5);
        assert_eq!(config.ledger_capacity, None);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("LEDGER_RETRY_LIMIT", "4"),
            ("LEDGER_ACCOUNTS", "7:1000, 8:0"),
            ("LEDGER_CAPACITY", "100"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.retry_limit, 4);
        assert_eq!(
            config.accounts,
            vec![AccountProvision::new(7, 1000), AccountProvision::new(8, 0)]
        );
        assert_eq!(config.ledger_capacity, Some(100));
    }

    #[test]
    fn invalid_values() {
        assert!(load(&[("PORT", "porta")]).is_err());
        assert!(load(&[("LEDGER_RETRY_LIMIT", "0")]).is_err());
        assert!(load(&[("LEDGER_ACCOUNTS", "")]).is_err());
        assert!(load(&[("LEDGER_ACCOUNTS", "1")]).is_err());
        assert!(load(&[("LEDGER_ACCOUNTS", "1:-5")]).is_err());
        let err = load(&[("LEDGER_ACCOUNTS", "1:10,1:20")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "LEDGER_ACCOUNTS has an invalid value `1:10,1:20`: account 1 listed twice"
        );
    }
}
