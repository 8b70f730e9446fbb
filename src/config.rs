use alloy::primitives::Address;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

const DEFAULT_HYPERLIQUID_CONTRACT: &str = "0xC67E9Efdb8a66A4B91b1f3731C75F500130373A4";
const DEFAULT_DYDX_CONTRACT: &str = "0xAC6a07aFa77aBB31C68E094AF4b496d81737Ff53";

/// How the dYdX source is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DydxMode {
    /// Account records from the REST API.
    Api,
    /// Transfer logs of the dYdX contract, same scan as Hyperliquid.
    OnChain,
}

impl FromStr for DydxMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Ok(DydxMode::Api),
            "onchain" | "on-chain" => Ok(DydxMode::OnChain),
            other => Err(AppError::ConfigError(format!(
                "DYDX_MODE must be 'api' or 'onchain', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: String,
    pub rpc_url: String,
    pub wallet_rpc_url: String,
    pub dydx_api_url: String,
    pub dydx_mode: DydxMode,
    pub hyperliquid_contract: Address,
    pub dydx_contract: Address,
    pub token_decimals: u32,
    pub source_timeout: Duration,
    pub log_from_block: u64,
    pub log_block_chunk: Option<u64>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let dydx_mode: DydxMode = var("DYDX_MODE", "api").parse()?;
        let hyperliquid_contract = parse_address(
            "HYPERLIQUID_CONTRACT",
            &var("HYPERLIQUID_CONTRACT", DEFAULT_HYPERLIQUID_CONTRACT),
        )?;
        let dydx_contract =
            parse_address("DYDX_CONTRACT", &var("DYDX_CONTRACT", DEFAULT_DYDX_CONTRACT))?;

        let token_decimals: u32 = parse_number("TOKEN_DECIMALS", &var("TOKEN_DECIMALS", "18"))?;
        if token_decimals > 77 {
            return Err(AppError::ConfigError(format!(
                "TOKEN_DECIMALS out of range: {}",
                token_decimals
            )));
        }

        let timeout_secs: u64 =
            parse_number("SOURCE_TIMEOUT_SECS", &var("SOURCE_TIMEOUT_SECS", "30"))?;
        let log_from_block: u64 = parse_number("LOG_FROM_BLOCK", &var("LOG_FROM_BLOCK", "0"))?;

        let log_block_chunk = match lookup("LOG_BLOCK_CHUNK") {
            Some(raw) => {
                let chunk: u64 = parse_number("LOG_BLOCK_CHUNK", &raw)?;
                if chunk == 0 {
                    return Err(AppError::ConfigError(
                        "LOG_BLOCK_CHUNK must be greater than zero".to_string(),
                    ));
                }
                Some(chunk)
            }
            None => None,
        };

        Ok(Self {
            server_host: var("SERVER_HOST", "0.0.0.0"),
            server_port: var("SERVER_PORT", "8081"),
            rpc_url: var("RPC_URL", "https://arb1.arbitrum.io/rpc"),
            wallet_rpc_url: var("WALLET_RPC_URL", "http://127.0.0.1:1248"),
            dydx_api_url: var("DYDX_API_URL", "https://api.dydx.exchange"),
            dydx_mode,
            hyperliquid_contract,
            dydx_contract,
            token_decimals,
            source_timeout: Duration::from_secs(timeout_secs),
            log_from_block,
            log_block_chunk,
        })
    }
}

fn parse_address(key: &str, raw: &str) -> AppResult<Address> {
    Address::from_str(raw.trim())
        .map_err(|e| AppError::ConfigError(format!("{} is not a valid address: {}", key, e)))
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::ConfigError(format!("{} is not a valid number: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppResult<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port, "8081");
        assert_eq!(config.dydx_mode, DydxMode::Api);
        assert_eq!(config.token_decimals, 18);
        assert_eq!(config.source_timeout, Duration::from_secs(30));
        assert_eq!(config.log_block_chunk, None);
        assert_eq!(
            config.hyperliquid_contract,
            Address::from_str(DEFAULT_HYPERLIQUID_CONTRACT).unwrap()
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("DYDX_MODE", "onchain"),
            ("SOURCE_TIMEOUT_SECS", "5"),
            ("LOG_BLOCK_CHUNK", "10000"),
            ("LOG_FROM_BLOCK", "22207817"),
        ])
        .unwrap();
        assert_eq!(config.dydx_mode, DydxMode::OnChain);
        assert_eq!(config.source_timeout, Duration::from_secs(5));
        assert_eq!(config.log_block_chunk, Some(10_000));
        assert_eq!(config.log_from_block, 22_207_817);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("DYDX_MODE", "graphql")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            config_from(&[("LOG_BLOCK_CHUNK", "0")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            config_from(&[("HYPERLIQUID_CONTRACT", "0x1234")]),
            Err(AppError::ConfigError(_))
        ));
    }
}
