//! Unified SQL ProcessStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend,
//! eliminating code duplication while maintaining type safety.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of ProcessStore.
///
/// Records live in `processes`, headers in `process_headers`. Every write
/// runs in a single transaction; an early return drops the transaction,
/// which rolls it back.
pub struct SqlProcessStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlProcessStore<DB> {
    /// Create a new SQL process store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// Macro to implement ProcessStore for a specific SQL backend.
macro_rules! impl_process_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl SqlProcessStore<$db_type> {
            /// Create the process tables if they do not exist.
            pub async fn init(&self) -> crate::interfaces::process_store::Result<()> {
                for statement in <$db_type as SqlDatabase>::SCHEMA {
                    sqlx::query(statement).execute(&self.pool).await?;
                }
                Ok(())
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::ProcessStore for SqlProcessStore<$db_type> {
            async fn find(
                &self,
                correlation_id: crate::process::CorrelationId,
            ) -> crate::interfaces::process_store::Result<
                Option<crate::interfaces::PersistedProcess>,
            > {
                use sea_query::{Expr, Query};
                use sqlx::Row;

                use crate::storage::schema::{ProcessHeaders, Processes};

                let id = correlation_id.to_string();
                let mut tx = self.pool.begin().await?;

                let stmt = Query::select()
                    .column(Processes::CorrelationId)
                    .column(Processes::BlobData)
                    .from(Processes::Table)
                    .and_where(Expr::col(Processes::CorrelationId).eq(&id))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let Some(row) = sqlx::query(&sql).fetch_optional(&mut *tx).await? else {
                    return Ok(None);
                };

                let stored_id: String = row.try_get("correlation_id")?;
                let blob: Vec<u8> = row.try_get("blob_data")?;

                let stmt = Query::select()
                    .column(ProcessHeaders::Key)
                    .column(ProcessHeaders::Value)
                    .from(ProcessHeaders::Table)
                    .and_where(Expr::col(ProcessHeaders::CorrelationId).eq(&id))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&mut *tx).await?;

                let mut headers = crate::process::Headers::with_capacity(rows.len());
                for row in rows {
                    let key: String = row.try_get("key")?;
                    let value: String = row.try_get("value")?;
                    headers.insert(key, value);
                }

                tx.commit().await?;

                Ok(Some(crate::interfaces::PersistedProcess {
                    correlation_id: stored_id.parse()?,
                    blob,
                    headers,
                }))
            }

            async fn save(
                &self,
                process: &crate::interfaces::PersistedProcess,
            ) -> crate::interfaces::process_store::Result<()> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{ProcessHeaders, Processes};

                let id = process.correlation_id.to_string();
                let mut tx = self.pool.begin().await?;

                let stmt = Query::update()
                    .table(Processes::Table)
                    .value(Processes::BlobData, process.blob.clone())
                    .and_where(Expr::col(Processes::CorrelationId).eq(&id))
                    .to_owned();

                let sql = <$db_type>::build_update(stmt);
                let updated = sqlx::query(&sql).execute(&mut *tx).await?;

                let inserted = updated.rows_affected() == 0;
                if inserted {
                    let stmt = Query::insert()
                        .into_table(Processes::Table)
                        .columns([Processes::CorrelationId, Processes::BlobData])
                        .values_panic([id.clone().into(), process.blob.clone().into()])
                        .to_owned();

                    let sql = <$db_type>::build_insert(stmt);
                    sqlx::query(&sql).execute(&mut *tx).await?;
                }

                let stmt = Query::delete()
                    .from_table(ProcessHeaders::Table)
                    .and_where(Expr::col(ProcessHeaders::CorrelationId).eq(&id))
                    .to_owned();

                let sql = <$db_type>::build_delete(stmt);
                sqlx::query(&sql).execute(&mut *tx).await?;

                if !process.headers.is_empty() {
                    // InsertStatement is not Send; it must be gone before the await.
                    let sql = {
                        let mut stmt = Query::insert();
                        stmt.into_table(ProcessHeaders::Table).columns([
                            ProcessHeaders::CorrelationId,
                            ProcessHeaders::Key,
                            ProcessHeaders::Value,
                        ]);
                        for (key, value) in &process.headers {
                            stmt.values_panic([
                                id.clone().into(),
                                key.clone().into(),
                                value.clone().into(),
                            ]);
                        }
                        <$db_type>::build_insert(stmt)
                    };
                    sqlx::query(&sql).execute(&mut *tx).await?;
                }

                tx.commit().await?;

                tracing::debug!(
                    correlation_id = %process.correlation_id,
                    inserted,
                    headers = process.headers.len(),
                    "Saved process"
                );

                Ok(())
            }

            async fn complete(
                &self,
                correlation_id: crate::process::CorrelationId,
            ) -> crate::interfaces::process_store::Result<()> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{ProcessHeaders, Processes};

                let id = correlation_id.to_string();
                let mut tx = self.pool.begin().await?;

                let stmt = Query::delete()
                    .from_table(ProcessHeaders::Table)
                    .and_where(Expr::col(ProcessHeaders::CorrelationId).eq(&id))
                    .to_owned();

                let sql = <$db_type>::build_delete(stmt);
                sqlx::query(&sql).execute(&mut *tx).await?;

                let stmt = Query::delete()
                    .from_table(Processes::Table)
                    .and_where(Expr::col(Processes::CorrelationId).eq(&id))
                    .to_owned();

                let sql = <$db_type>::build_delete(stmt);
                sqlx::query(&sql).execute(&mut *tx).await?;

                tx.commit().await?;

                Ok(())
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_process_store!(super::postgres::Postgres, "postgres");
impl_process_store!(super::sqlite::Sqlite, "sqlite");
