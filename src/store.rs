//! The user store query engine.
//!
//! [`UserStore`] wraps an injected SQLite pool and builds parameterized SQL
//! for filtered listing, single-record lookup, creation, partial update,
//! deletion (single and batch), and statistical aggregation. Constructing
//! the store provisions the schema, so every operation can assume the users
//! table exists.
//!
//! Mutations downgrade store-level faults to `None`/`false`/`0` after
//! logging them; lookups report misses as `Ok(None)`; read paths propagate
//! [`StoreError`]. See the crate error module for the full taxonomy.
//!
//! # Example
//!
//! ```no_run
//! use userstore::db::pool::{create_pool, DatabaseConfig};
//! use userstore::models::user::CreateUser;
//! use userstore::query::UserQuery;
//! use userstore::store::UserStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(DatabaseConfig {
//!     url: "sqlite:data/users.db".to_string(),
//!     ..Default::default()
//! })
//! .await?;
//!
//! let store = UserStore::connect(pool).await?;
//!
//! let created = store
//!     .create(CreateUser {
//!         username: "alice".to_string(),
//!         email: "alice@example.com".to_string(),
//!         password: "<opaque credential>".to_string(),
//!         first_name: None,
//!         last_name: None,
//!         avatar_url: None,
//!         role: None,
//!         is_active: None,
//!     })
//!     .await;
//!
//! let page = store.list(&UserQuery::default()).await?;
//! println!("{} users total", page.pagination.total);
//! # Ok(())
//! # }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use tracing::error;

use crate::db::schema::ensure_schema;
use crate::error::{StoreError, StoreResult};
use crate::models::user::{CreateUser, UpdateUser, User, DEFAULT_ROLE};
use crate::query::{where_clause, BindValue, Pagination, UserFilters, UserPage, UserQuery};

/// Aggregate statistics over the user table
///
/// The four sub-counts come from independent queries and are not computed
/// transactionally; under concurrent writes they may reflect slightly
/// different instants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    /// Total record count
    pub total_users: i64,

    /// Records with the active flag set
    pub active_users: i64,

    /// Records created on the store-local current calendar day
    pub today_users: i64,

    /// Role histogram, count descending, capped at 10 entries
    pub roles: Vec<RoleCount>,
}

/// One role-histogram entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleCount {
    /// Role label
    pub role: String,

    /// Number of users with that role
    pub count: i64,
}

/// Signup count for one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyCount {
    /// Store-local calendar date
    pub date: NaiveDate,

    /// Users created on that date
    pub count: i64,
}

/// Query engine over the single-table user store
///
/// Stateless beyond the pool handle: every call reflects the store's state
/// at call time, with no caching, retries, or in-process locking.
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Builds a store around an injected pool, provisioning the schema
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Provisioning`] if the users table is missing
    /// and the bundled schema script fails to apply.
    pub async fn connect(pool: SqlitePool) -> Result<Self, StoreError> {
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Lists users matching the query's filters, sorted and paginated
    ///
    /// The total is computed by a count query over the same predicate, then
    /// the page is fetched with `LIMIT`/`OFFSET` where
    /// `offset = (page - 1) * page_size`. An empty match yields an empty
    /// data sequence, not an error. Rows equal under the sort key come back
    /// in the store's natural order, which is unspecified.
    ///
    /// The count and the page are separate statements, so a concurrent
    /// write between them can make the total disagree with the page by a
    /// small margin.
    ///
    /// # Errors
    ///
    /// Returns an error if either query fails at the store level.
    pub async fn list(&self, query: &UserQuery) -> StoreResult<UserPage> {
        let conditions = query.filters.conditions();
        let where_sql = where_clause(&conditions);

        // Total matching count: same predicate, no sort or pagination.
        let count_sql = format!("SELECT COUNT(*) FROM users {}", where_sql);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for condition in &conditions {
            count_query = match condition.bind_value() {
                BindValue::Text(text) => count_query.bind(text),
                BindValue::Flag(flag) => count_query.bind(flag),
            };
        }
        let (total,) = count_query.fetch_one(&self.pool).await?;

        let page = query.page.max(1);
        let page_size = query.page_size.max(1);
        let offset = (page as i64 - 1) * page_size as i64;

        let data_sql = format!(
            "SELECT id, username, email, password, first_name, last_name, avatar_url, \
             role, is_active, created_at, updated_at \
             FROM users {} ORDER BY {} {} LIMIT ? OFFSET ?",
            where_sql,
            query.sort_by.column(),
            query.sort_order.keyword(),
        );

        let mut data_query = sqlx::query_as::<_, User>(&data_sql);
        for condition in &conditions {
            data_query = match condition.bind_value() {
                BindValue::Text(text) => data_query.bind(text),
                BindValue::Flag(flag) => data_query.bind(flag),
            };
        }

        let data = data_query
            .bind(page_size as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(UserPage {
            data,
            pagination: Pagination::new(page, page_size, total),
        })
    }

    /// Finds a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails at the store level; a miss is
    /// `Ok(None)`.
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, first_name, last_name, avatar_url,
                   role, is_active, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact username
    pub async fn get_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, first_name, last_name, avatar_url,
                   role, is_active, created_at, updated_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact email
    pub async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, first_name, last_name, avatar_url,
                   role, is_active, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Creates a new user, returning the stored row
    ///
    /// Unsupplied optional fields land as NULL, `role` defaults to "user",
    /// and `is_active` defaults to true. The id and both timestamps are
    /// store-assigned.
    ///
    /// Store-level failure (typically a uniqueness violation on username
    /// or email) is logged and reported as `None`. Callers wanting a
    /// friendly duplicate message should pre-check with
    /// [`get_by_username`](Self::get_by_username) /
    /// [`get_by_email`](Self::get_by_email); the store constraint remains
    /// the final authority.
    pub async fn create(&self, data: CreateUser) -> Option<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, first_name, last_name, avatar_url, role, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, username, email, password, first_name, last_name, avatar_url,
                      role, is_active, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.avatar_url)
        .bind(data.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()))
        .bind(data.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Some(user),
            Err(e) => {
                error!(error = %e, "Create user failed");
                None
            }
        }
    }

    /// Partially updates a user, returning the stored row
    ///
    /// Only fields present in `data` are written; the id and `created_at`
    /// are never settable, and `updated_at` is always stamped to now by the
    /// engine regardless of what the caller supplies. An empty partial is a
    /// no-op that returns `None` without touching the store; returning the
    /// unmodified row would be misleading about whether a write occurred.
    ///
    /// Returns `None` when the id does not exist or the store rejects the
    /// write (e.g. a uniqueness violation); store faults are logged before
    /// being downgraded.
    pub async fn update(&self, id: i64, data: UpdateUser) -> Option<User> {
        if data.is_empty() {
            return None;
        }

        // SET fragments and binds are pushed in the same fixed order.
        let mut sets: Vec<&'static str> = Vec::new();
        if data.username.is_some() {
            sets.push("username = ?");
        }
        if data.email.is_some() {
            sets.push("email = ?");
        }
        if data.password.is_some() {
            sets.push("password = ?");
        }
        if data.first_name.is_some() {
            sets.push("first_name = ?");
        }
        if data.last_name.is_some() {
            sets.push("last_name = ?");
        }
        if data.avatar_url.is_some() {
            sets.push("avatar_url = ?");
        }
        if data.role.is_some() {
            sets.push("role = ?");
        }
        if data.is_active.is_some() {
            sets.push("is_active = ?");
        }

        let sql = format!(
            "UPDATE users SET {}, updated_at = CURRENT_TIMESTAMP WHERE id = ? \
             RETURNING id, username, email, password, first_name, last_name, avatar_url, \
             role, is_active, created_at, updated_at",
            sets.join(", "),
        );

        let mut query = sqlx::query_as::<_, User>(&sql);
        if let Some(username) = data.username {
            query = query.bind(username);
        }
        if let Some(email) = data.email {
            query = query.bind(email);
        }
        if let Some(password) = data.password {
            query = query.bind(password);
        }
        if let Some(first_name) = data.first_name {
            query = query.bind(first_name);
        }
        if let Some(last_name) = data.last_name {
            query = query.bind(last_name);
        }
        if let Some(avatar_url) = data.avatar_url {
            query = query.bind(avatar_url);
        }
        if let Some(role) = data.role {
            query = query.bind(role);
        }
        if let Some(is_active) = data.is_active {
            query = query.bind(is_active);
        }
        query = query.bind(id);

        match query.fetch_optional(&self.pool).await {
            Ok(user) => user,
            Err(e) => {
                error!(user_id = id, error = %e, "Update user failed");
                None
            }
        }
    }

    /// Deletes a user by id
    ///
    /// Returns whether a row was actually removed, not merely whether the
    /// statement executed. Store faults are logged and reported as `false`;
    /// deletion is best-effort from the caller's perspective.
    pub async fn delete(&self, id: i64) -> bool {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => done.rows_affected() > 0,
            Err(e) => {
                error!(user_id = id, error = %e, "Delete user failed");
                false
            }
        }
    }

    /// Deletes a batch of users, returning the affected-row count
    ///
    /// An empty id set short-circuits to 0 without issuing any store call.
    /// Ids that do not exist simply don't count toward the result. Store
    /// faults are logged and reported as 0 affected.
    pub async fn delete_many(&self, ids: &[i64]) -> u64 {
        if ids.is_empty() {
            return 0;
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM users WHERE id IN ({})", placeholders);

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(*id);
        }

        match query.execute(&self.pool).await {
            Ok(done) => done.rows_affected(),
            Err(e) => {
                error!(ids = ids.len(), error = %e, "Batch delete failed");
                0
            }
        }
    }

    /// Computes aggregate statistics over the user table
    ///
    /// Four independent aggregates: total count, active count, today's
    /// signups (store-local date), and the top-10 role histogram. Not
    /// computed transactionally; see [`UserStats`].
    ///
    /// # Errors
    ///
    /// Returns an error if any aggregate query fails at the store level.
    pub async fn stats(&self) -> StoreResult<UserStats> {
        let (total_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let (active_users,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        let (today_users,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE DATE(created_at) = DATE('now')")
                .fetch_one(&self.pool)
                .await?;

        let roles = sqlx::query_as::<_, RoleCount>(
            r#"
            SELECT role, COUNT(*) AS count
            FROM users
            GROUP BY role
            ORDER BY count DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(UserStats {
            total_users,
            active_users,
            today_users,
            roles,
        })
    }

    /// Signup counts grouped by calendar date over the trailing window
    ///
    /// Buckets creation counts by store-local date for the last `days`
    /// days, most recent date first. Dates with no signups produce no
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails at the store level.
    pub async fn recent_signups(&self, days: u32) -> StoreResult<Vec<DailyCount>> {
        let rows = sqlx::query_as::<_, DailyCount>(
            r#"
            SELECT DATE(created_at) AS date, COUNT(*) AS count
            FROM users
            WHERE created_at >= datetime('now', '-' || ? || ' days')
            GROUP BY DATE(created_at)
            ORDER BY date DESC
            "#,
        )
        .bind(days as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists users with a given role.
    pub async fn list_by_role(&self, role: &str, page: u32, page_size: u32) -> StoreResult<UserPage> {
        self.list(&UserQuery {
            page,
            page_size,
            filters: UserFilters {
                role: Some(role.to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
    }

    /// Lists active or inactive users.
    pub async fn list_by_status(
        &self,
        is_active: bool,
        page: u32,
        page_size: u32,
    ) -> StoreResult<UserPage> {
        self.list(&UserQuery {
            page,
            page_size,
            filters: UserFilters {
                is_active: Some(is_active),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
    }

    /// Lists users whose username contains the given fragment.
    pub async fn search_username(
        &self,
        fragment: &str,
        page: u32,
        page_size: u32,
    ) -> StoreResult<UserPage> {
        self.list(&UserQuery {
            page,
            page_size,
            filters: UserFilters {
                username: Some(fragment.to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
    }

    /// Lists users with an exact email match.
    pub async fn search_email(&self, email: &str, page: u32, page_size: u32) -> StoreResult<UserPage> {
        self.list(&UserQuery {
            page,
            page_size,
            filters: UserFilters {
                email: Some(email.to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_stats_clone() {
        let stats = UserStats {
            total_users: 2,
            active_users: 1,
            today_users: 2,
            roles: vec![RoleCount {
                role: "user".to_string(),
                count: 2,
            }],
        };

        let cloned = stats.clone();
        assert_eq!(stats.total_users, cloned.total_users);
        assert_eq!(stats.roles, cloned.roles);
    }

    // Integration tests for store operations run against in-memory SQLite
    // and live in the tests/ directory.
}
