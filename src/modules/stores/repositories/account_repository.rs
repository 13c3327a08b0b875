use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tracing::debug;

use crate::core::Result;
use crate::modules::stores::models::AccountRecord;

/// Read-only access to platform accounts and their store lists
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Accounts carrying a store list, ordered by account name.
    /// `account_filter` restricts to the named accounts when non-empty.
    async fn fetch_accounts(&self, account_filter: Option<&[String]>) -> Result<Vec<AccountRecord>>;
}

const ACCOUNT_SELECT: &str = r#"
    SELECT
        pa.account,
        su.name AS operator_name,
        pa.sales_name,
        pa.city_name,
        CAST(pa.stores_json AS CHAR) AS stores_json,
        CAST(pa.region_json AS CHAR) AS region_json
    FROM platform_accounts pa
    LEFT JOIN saas_users su ON pa.operator_id = su.id
    WHERE pa.stores_json IS NOT NULL
"#;

fn build_account_query<'a>(account_filter: Option<&'a [String]>) -> QueryBuilder<'a, MySql> {
    let mut builder = QueryBuilder::new(ACCOUNT_SELECT);

    if let Some(accounts) = account_filter.filter(|accounts| !accounts.is_empty()) {
        builder.push(" AND pa.account IN (");
        let mut separated = builder.separated(", ");
        for account in accounts {
            separated.push_bind(account.as_str());
        }
        separated.push_unseparated(")");
    }

    builder.push(" ORDER BY pa.account");
    builder
}

pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn fetch_accounts(&self, account_filter: Option<&[String]>) -> Result<Vec<AccountRecord>> {
        let rows = build_account_query(account_filter)
            .build_query_as::<AccountRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(accounts = rows.len(), "Fetched platform accounts");

        Ok(rows.into_iter().map(AccountRecord::from).collect())
    }
}

/// Database row representation for platform_accounts
#[derive(sqlx::FromRow)]
struct AccountRow {
    account: Option<String>,
    operator_name: Option<String>,
    sales_name: Option<String>,
    city_name: Option<String>,
    stores_json: Option<String>,
    region_json: Option<String>,
}

impl From<AccountRow> for AccountRecord {
    fn from(row: AccountRow) -> Self {
        AccountRecord {
            account: row.account.unwrap_or_default(),
            operator_name: row.operator_name,
            sales_name: row.sales_name,
            city_name: row.city_name,
            stores_json: row.stores_json,
            region_json: row.region_json,
        }
    }
}
