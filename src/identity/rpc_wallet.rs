use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider};
use async_trait::async_trait;

use crate::datasource::chain::http_provider;
use crate::error::{AppError, AppResult};
use crate::identity::WalletProvider;

/// Wallet reached over JSON-RPC, e.g. a local signer exposing `eth_accounts`.
pub struct RpcWalletProvider {
    provider: DynProvider,
}

impl RpcWalletProvider {
    pub fn connect(url: &str) -> AppResult<Self> {
        Ok(Self {
            provider: http_provider(url)?,
        })
    }
}

fn to_strings(method: &str, accounts: Vec<Address>) -> Vec<String> {
    tracing::debug!("{} returned {} accounts", method, accounts.len());
    accounts.iter().map(Address::to_string).collect()
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn request_accounts(&self) -> AppResult<Vec<String>> {
        let accounts: Vec<Address> = self
            .provider
            .raw_request("eth_requestAccounts".into(), ())
            .await
            .map_err(|e| AppError::WalletError(format!("eth_requestAccounts failed: {}", e)))?;
        Ok(to_strings("eth_requestAccounts", accounts))
    }

    async fn get_accounts(&self) -> AppResult<Vec<String>> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(|e| AppError::WalletError(format!("eth_accounts failed: {}", e)))?;
        Ok(to_strings("eth_accounts", accounts))
    }
}
