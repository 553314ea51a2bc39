use sqlx::SqliteConnection;

use crate::db_types::User;

pub async fn fetch_user_by_reg_no(reg_no: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE reg_no = $1").bind(reg_no).fetch_optional(conn).await?;
    Ok(user)
}

/// Idempotent admin creation. The UNIQUE constraint on `reg_no` makes the conflict clause a no-op on repeats.
pub async fn provision_admin(reg_no: &str, name: &str, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (reg_no, name, role) VALUES ($1, $2, 'Admin') ON CONFLICT (reg_no) DO NOTHING",
    )
    .bind(reg_no)
    .bind(name)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
