pub mod rpc_wallet;

pub use rpc_wallet::RpcWalletProvider;

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// A wallet account address. Displays in EIP-55 checksum form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(Address);

impl AccountId {
    /// Parses a `0x`-prefixed 20-byte hex address.
    ///
    /// Mixed-case input must carry a valid checksum; all-lower or all-upper input is accepted as is.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        let invalid = || AppError::InvalidAddress(raw.to_string());

        let hex = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(invalid)?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());

        let address = if has_lower && has_upper {
            Address::parse_checksummed(format!("0x{}", hex), None).map_err(|_| invalid())?
        } else {
            Address::from_str(hex).map_err(|_| invalid())?
        };

        Ok(Self(address))
    }

    pub fn address(&self) -> Address {
        self.0
    }
}

impl From<Address> for AccountId {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_checksum(None))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Session with a wallet that holds the user's keys.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the wallet to expose its accounts, prompting the user if needed.
    async fn request_accounts(&self) -> AppResult<Vec<String>>;

    /// Accounts currently exposed to this session.
    async fn get_accounts(&self) -> AppResult<Vec<String>>;
}

/// Returns the first account the provider exposes.
pub async fn resolve(provider: &dyn WalletProvider) -> AppResult<AccountId> {
    let accounts = provider.get_accounts().await?;
    let first = accounts.first().ok_or(AppError::NoAccount)?;
    AccountId::parse(first)
}

/// A provider that exposes a single caller-supplied address, or none.
#[derive(Debug, Clone, Default)]
pub struct StaticWalletProvider {
    account: Option<String>,
}

impl StaticWalletProvider {
    pub fn new(account: Option<String>) -> Self {
        Self { account }
    }
}

#[async_trait]
impl WalletProvider for StaticWalletProvider {
    async fn request_accounts(&self) -> AppResult<Vec<String>> {
        self.get_accounts().await
    }

    async fn get_accounts(&self) -> AppResult<Vec<String>> {
        Ok(self
            .account
            .iter()
            .filter(|a| !a.trim().is_empty())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0xC67E9Efdb8a66A4B91b1f3731C75F500130373A4";

    #[test]
    fn parses_and_displays_checksum() {
        let lower = AccountId::parse(&CHECKSUMMED.to_lowercase()).unwrap();
        assert_eq!(lower.to_string(), CHECKSUMMED);

        let checksummed = AccountId::parse(CHECKSUMMED).unwrap();
        assert_eq!(checksummed, lower);
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in [
            "",
            "C67E9Efdb8a66A4B91b1f3731C75F500130373A4",
            "0x1234",
            "0xZZ7E9Efdb8a66A4B91b1f3731C75F500130373A4",
            // checksum broken by flipping one letter's case
            "0xc67E9Efdb8a66A4B91b1f3731C75F500130373A4",
        ] {
            assert!(
                matches!(AccountId::parse(raw), Err(AppError::InvalidAddress(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn serializes_as_checksum_string() {
        let account = AccountId::parse(&CHECKSUMMED.to_lowercase()).unwrap();
        assert_eq!(
            serde_json::to_value(account).unwrap(),
            serde_json::json!(CHECKSUMMED)
        );
    }

    #[tokio::test]
    async fn resolve_uses_first_account() {
        let provider = StaticWalletProvider::new(Some(CHECKSUMMED.to_string()));
        let account = resolve(&provider).await.unwrap();
        assert_eq!(account.to_string(), CHECKSUMMED);
    }

    #[tokio::test]
    async fn resolve_without_accounts_fails() {
        let provider = StaticWalletProvider::new(None);
        assert!(matches!(resolve(&provider).await, Err(AppError::NoAccount)));

        let blank = StaticWalletProvider::new(Some("  ".to_string()));
        assert!(matches!(resolve(&blank).await, Err(AppError::NoAccount)));
    }
}
