use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use salesrec_core::domain::company::CompanyId;
use salesrec_core::domain::product::{Product, ProductId};

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const LIST_ACTIVE_SQL: &str = "SELECT p.id, p.company_id, c.name AS company_name, p.name, \
     p.product_line, p.category, p.description, p.price, p.is_active \
     FROM products p JOIN companies c ON c.id = p.company_id \
     WHERE p.is_active = 1";

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn list_active(
        &self,
        company_name: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = match company_name {
            Some(name) => {
                let sql = format!(
                    "{LIST_ACTIVE_SQL} AND c.name = ? COLLATE NOCASE ORDER BY c.name, p.product_line, p.id"
                );
                sqlx::query(&sql).bind(name).fetch_all(&self.pool).await?
            }
            None => {
                let sql = format!("{LIST_ACTIVE_SQL} ORDER BY c.name, p.product_line, p.id");
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };

        rows.iter().map(decode_product).collect()
    }
}

fn decode_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let price: Option<String> = row.try_get("price")?;
    let price = price
        .map(|raw| {
            Decimal::from_str(raw.trim())
                .map_err(|_| RepositoryError::Decode(format!("invalid product price `{raw}`")))
        })
        .transpose()?;
    let active: i64 = row.try_get("is_active")?;

    Ok(Product {
        id: ProductId(row.try_get("id")?),
        company_id: CompanyId(row.try_get("company_id")?),
        company_name: row.try_get("company_name")?,
        name: row.try_get("name")?,
        product_line: row.try_get("product_line")?,
        category: row.try_get("category")?,
        description: row.try_get("description")?,
        price,
        active: active != 0,
    })
}
