use cfs_common::Rupees;
use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{FeeType, NewPaymentRecord, OrderId, PaymentRecord, VerificationOutcome},
    traits::{PaymentQueryFilter, PaymentStoreError},
};

/// Inserts a new payment record using the given connection. This is not atomic on its own. You can embed this
/// call inside a transaction if you need atomicity with the ledger guard, and pass `&mut *tx` as the connection
/// argument — [`crate::SqliteDatabase::insert_payment_record`] does exactly that.
pub async fn insert_payment_record(
    record: NewPaymentRecord,
    conn: &mut SqliteConnection,
) -> Result<PaymentRecord, PaymentStoreError> {
    let inserted = sqlx::query_as::<_, PaymentRecord>(
        r#"
            INSERT INTO payments (
                student_id,
                fee_type,
                amount,
                order_id,
                status
            ) VALUES ($1, $2, $3, $4, 'Pending')
            RETURNING *;
        "#,
    )
    .bind(record.student_id)
    .bind(record.fee_type)
    .bind(record.amount.value())
    .bind(record.order_id.clone())
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(de) if de.is_unique_violation() => PaymentStoreError::DuplicateOrderId(record.order_id),
        _ => PaymentStoreError::from(e),
    })?;
    debug!("📝️ Payment record [{}] inserted with id {}", inserted.order_id, inserted.id);
    Ok(inserted)
}

pub async fn fetch_payment_record(id: i64, conn: &mut SqliteConnection) -> Result<Option<PaymentRecord>, sqlx::Error> {
    let record = sqlx::query_as("SELECT * FROM payments WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(record)
}

pub async fn fetch_record_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentRecord>, sqlx::Error> {
    let record =
        sqlx::query_as("SELECT * FROM payments WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(record)
}

/// Sum of `amount` over all completed records for the (student, fee type) pair. The ledger guard reads this
/// inside the same transaction that inserts a new record.
pub async fn sum_completed(
    student_id: &str,
    fee_type: FeeType,
    conn: &mut SqliteConnection,
) -> Result<Rupees, sqlx::Error> {
    let (total,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE student_id = $1 AND fee_type = $2 AND status = \
         'Completed'",
    )
    .bind(student_id)
    .bind(fee_type)
    .fetch_one(conn)
    .await?;
    Ok(Rupees::from(total))
}

/// Compare-and-set transition away from `Pending`. Returns `None` if the record was not pending anymore — the
/// losing side of a concurrent verification never re-applies the transition.
pub async fn finalize_payment_record(
    id: i64,
    outcome: VerificationOutcome,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentRecord>, PaymentStoreError> {
    let result: Option<PaymentRecord> = match outcome {
        VerificationOutcome::Completed { gateway_payment_id, gateway_signature } => {
            sqlx::query_as(
                "UPDATE payments SET status = 'Completed', gateway_payment_id = $1, gateway_signature = $2, \
                 updated_at = CURRENT_TIMESTAMP WHERE id = $3 AND status = 'Pending' RETURNING *",
            )
            .bind(gateway_payment_id)
            .bind(gateway_signature)
            .bind(id)
            .fetch_optional(conn)
            .await?
        },
        VerificationOutcome::Failed => {
            sqlx::query_as(
                "UPDATE payments SET status = 'Failed', updated_at = CURRENT_TIMESTAMP WHERE id = $1 AND status = \
                 'Pending' RETURNING *",
            )
            .bind(id)
            .fetch_optional(conn)
            .await?
        },
    };
    trace!("📝️ finalize_payment_record({id}) transitioned: {}", result.is_some());
    Ok(result)
}

pub async fn fetch_records_for_student(
    student_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentRecord>, sqlx::Error> {
    let records = sqlx::query_as("SELECT * FROM payments WHERE student_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(student_id)
        .fetch_all(conn)
        .await?;
    Ok(records)
}

/// Fetches payment records according to criteria specified in the `PaymentQueryFilter`, newest first.
pub async fn search_payment_records(
    query: PaymentQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentRecord>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM payments ");
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(student_id) = query.student_id {
        where_clause.push("student_id = ");
        where_clause.push_bind_unseparated(student_id);
    }
    if let Some(fee_type) = query.fee_type {
        where_clause.push("fee_type = ");
        where_clause.push_bind_unseparated(fee_type.to_string());
    }
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status.to_string());
    }
    builder.push(" ORDER BY created_at DESC, id DESC");
    trace!("📝️ Executing query: {}", builder.sql());
    let records = builder.build_query_as::<PaymentRecord>().fetch_all(conn).await?;
    trace!("📝️ Result of search_payment_records: {:?}", records.len());
    Ok(records)
}
