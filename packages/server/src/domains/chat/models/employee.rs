use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ContractId, EmployeeId};

/// Employee directory record. The chat core only joins against this
/// for display names; employee management itself lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: EmployeeId,
    pub contract_id: ContractId,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Find the employee behind a conversation
    pub async fn find_by_contract(contract_id: ContractId, pool: &PgPool) -> Result<Option<Self>> {
        let employee =
            sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE contract_id = $1")
                .bind(contract_id)
                .fetch_optional(pool)
                .await?;
        Ok(employee)
    }

    /// Create a directory record
    pub async fn create(
        contract_id: ContractId,
        first_name: String,
        last_name: String,
        pool: &PgPool,
    ) -> Result<Self> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (id, contract_id, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(EmployeeId::new())
        .bind(contract_id)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(pool)
        .await?;
        Ok(employee)
    }
}
