use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct MemberStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub id: i64,
    pub email: String,
    pub nickname: String,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: i64,
    email: String,
    nickname: String,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            nickname: row.nickname,
        }
    }
}

impl MemberStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new member. Returns the member ID.
    pub async fn create(&self, email: &str, nickname: &str) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO members (email, nickname) VALUES (?, ?)")
            .bind(email)
            .bind(nickname)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a member by email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Member>, sqlx::Error> {
        let row: Option<MemberRow> =
            sqlx::query_as("SELECT id, email, nickname FROM members WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Member::from))
    }

    /// Delete a member by ID.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
