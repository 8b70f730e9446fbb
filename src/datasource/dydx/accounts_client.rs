use async_trait::async_trait;
use reqwest::Client;

use crate::datasource::dydx::{AccountsApi, AccountsResponse};
use crate::error::{SourceFetchError, SourceResult};
use crate::identity::AccountId;

#[derive(Clone)]
pub struct DydxAccountsClient {
    client: Client,
    base_url: String,
}

impl DydxAccountsClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn accounts_url(&self, account: &AccountId) -> String {
        format!("{}/v3/accounts/{}", self.base_url, account)
    }
}

#[async_trait]
impl AccountsApi for DydxAccountsClient {
    async fn get_accounts(&self, account: &AccountId) -> SourceResult<AccountsResponse> {
        let response = self.client.get(self.accounts_url(account)).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SourceFetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
