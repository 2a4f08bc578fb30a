use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provider label attached to every account we expose.
pub const LINKEDIN_PROVIDER: &str = "linkedin";

/// Source status the provider reports for a healthy connection.
const SOURCE_STATUS_OK: &str = "OK";

/// Connection state of a linked account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Connected,
    Disconnected,
}

/// A linked messaging-platform identity through which searches and sends are performed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Account {
    pub provider: String,
    /// Provider account id, passed back as `account_id` on every other call
    pub id: String,
    pub name: String,
    /// Display label, e.g. "LinkedIn : Jane Doe"
    #[serde(rename = "accountId")]
    pub account_id: String,
    pub status: AccountStatus,
}

/// Account entry as returned by the provider's `accounts` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAccount {
    #[serde(rename = "type", default)]
    pub account_type: String,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sources: Vec<RawAccountSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAccountSource {
    #[serde(default)]
    pub status: String,
}

/// Page wrapper around the provider's account list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAccountPage {
    #[serde(default)]
    pub items: Vec<RawAccount>,
}

impl RawAccount {
    pub fn is_linkedin(&self) -> bool {
        self.account_type.eq_ignore_ascii_case(LINKEDIN_PROVIDER)
    }

    /// Connected as soon as any underlying source reports "OK".
    pub fn status(&self) -> AccountStatus {
        if self
            .sources
            .iter()
            .any(|source| source.status == SOURCE_STATUS_OK)
        {
            AccountStatus::Connected
        } else {
            AccountStatus::Disconnected
        }
    }

    pub fn into_account(self) -> Account {
        let status = self.status();
        Account {
            provider: LINKEDIN_PROVIDER.to_string(),
            account_id: format!("LinkedIn : {}", self.name),
            name: self.name.to_lowercase(),
            id: self.id,
            status,
        }
    }
}

/// Keep LinkedIn accounts only, first occurrence of each id wins.
pub fn linkedin_accounts(raw: Vec<RawAccount>) -> Vec<Account> {
    let mut accounts: Vec<Account> = Vec::new();
    for account in raw.into_iter().filter(RawAccount::is_linkedin) {
        if accounts.iter().any(|existing| existing.id == account.id) {
            continue;
        }
        accounts.push(account.into_account());
    }
    accounts
}
