//! `SqliteDatabase` is a concrete implementation of a campus fee engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use cfs_common::Rupees;
use log::*;
use sqlx::SqlitePool;

use super::db::{new_pool, payments, users, MIGRATOR};
use crate::{
    db_types::{FeeType, NewPaymentRecord, OrderId, PaymentRecord, User, VerificationOutcome},
    fee_catalog,
    traits::{AccountApiError, AccountManagement, PaymentQueryFilter, PaymentStore, PaymentStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connect to the database at `url` and bring the schema up to date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, PaymentStoreError> {
        let pool = new_pool(url, max_connections).await?;
        MIGRATOR.run(&pool).await.map_err(|e| PaymentStoreError::DatabaseError(e.to_string()))?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl PaymentStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    /// The settled guard and the insert run in one transaction. SQLite serializes writers, so two concurrent
    /// creations for the same (student, fee type) pair cannot both read a stale completed total and slip past
    /// a guard that one of them should have failed.
    async fn insert_payment_record(&self, record: NewPaymentRecord) -> Result<PaymentRecord, PaymentStoreError> {
        let mut tx = self.pool.begin().await?;
        let ceiling = fee_catalog::ceiling_for(record.fee_type);
        let paid = payments::sum_completed(&record.student_id, record.fee_type, &mut tx).await?;
        if paid >= ceiling {
            return Err(PaymentStoreError::FeeAlreadySettled { fee_type: record.fee_type, paid, ceiling });
        }
        let inserted = payments::insert_payment_record(record, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Payment record #{} has been saved in the DB", inserted.id);
        Ok(inserted)
    }

    async fn fetch_payment_record(&self, id: i64) -> Result<Option<PaymentRecord>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let record = payments::fetch_payment_record(id, &mut conn).await?;
        Ok(record)
    }

    async fn fetch_record_by_order_id(&self, order_id: &OrderId) -> Result<Option<PaymentRecord>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let record = payments::fetch_record_by_order_id(order_id, &mut conn).await?;
        Ok(record)
    }

    async fn finalize_payment_record(
        &self,
        id: i64,
        outcome: VerificationOutcome,
    ) -> Result<Option<PaymentRecord>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let result = payments::finalize_payment_record(id, outcome, &mut conn).await?;
        if let Some(record) = &result {
            debug!("🗃️ Payment record #{} transitioned to {}", record.id, record.status);
        }
        Ok(result)
    }

    async fn sum_completed(&self, student_id: &str, fee_type: FeeType) -> Result<Rupees, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let total = payments::sum_completed(student_id, fee_type, &mut conn).await?;
        Ok(total)
    }

    async fn fetch_records_for_student(&self, student_id: &str) -> Result<Vec<PaymentRecord>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let records = payments::fetch_records_for_student(student_id, &mut conn).await?;
        Ok(records)
    }

    async fn search_payment_records(&self, query: PaymentQueryFilter) -> Result<Vec<PaymentRecord>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let records = payments::search_payment_records(query, &mut conn).await?;
        Ok(records)
    }

    async fn close(&mut self) -> Result<(), PaymentStoreError> {
        self.pool.close().await;
        Ok(())
    }
}

impl AccountManagement for SqliteDatabase {
    async fn fetch_user_by_reg_no(&self, reg_no: &str) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_reg_no(reg_no, &mut conn).await?;
        Ok(user)
    }

    async fn provision_admin(&self, reg_no: &str, name: &str) -> Result<bool, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let created = users::provision_admin(reg_no, name, &mut conn).await?;
        Ok(created)
    }
}
