use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::{CreateMoodLogRequest, MoodLog, UpdateMoodLogRequest};
use crate::store::MoodStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::Row;
use tracing::{error, info, warn};

const MOOD_LOG_COLUMNS: &str = "id, mood, notes, tags, date";

/// PostgreSQL-backed mood log storage.
///
/// Holds the deadpool `Pool`; every operation checks out one connection and
/// runs exactly one statement on it. Path ids and body dates are bound as
/// text and cast in SQL so PostgreSQL does the coercion.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Builds the pool and checks that a connection can be opened.
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!(
            "Creating PostgreSQL connection pool for host: {}:{}",
            config.host, config.port
        );

        let pool = Self::create_pool(config)?;

        let db = Database { pool };
        db.test_connection().await?;

        Ok(db)
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);

        pg_config.ssl_mode = Some(match config.ssl_mode.as_str() {
            "disable" => deadpool_postgres::SslMode::Disable,
            "prefer" => deadpool_postgres::SslMode::Prefer,
            "require" => deadpool_postgres::SslMode::Require,
            other => {
                warn!("Unknown SSL mode '{}', defaulting to 'prefer'", other);
                deadpool_postgres::SslMode::Prefer
            }
        });

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            ApiError::storage(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            ApiError::storage(format!("Connection pool creation failed: {}", e))
        })
    }

    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database connection test failed: {}", e);
            ApiError::from(e)
        })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// The server's `CURRENT_DATE`, which is what an insert without a date stores.
    pub async fn current_date(&self) -> Result<NaiveDate, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_one("SELECT CURRENT_DATE", &[])
            .await
            .map_err(ApiError::from)?;

        Ok(row.get(0))
    }

    /// Creates `mood_logs` if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Ensuring mood_logs table exists");

        let client = self.get_connection().await?;

        let mood_logs_table = r#"
            CREATE TABLE IF NOT EXISTS mood_logs (
                id SERIAL PRIMARY KEY,
                mood VARCHAR(50),
                notes TEXT,
                tags VARCHAR(255),
                date DATE DEFAULT CURRENT_DATE
            )
        "#;

        client.execute(mood_logs_table, &[]).await.map_err(|e| {
            error!("Failed to create mood_logs table: {}", e);
            ApiError::from(e)
        })?;

        Ok(())
    }

    /// Closes the pool; connections still checked out are dropped when returned.
    pub fn close(&self) {
        info!("Closing PostgreSQL connection pool");
        self.pool.close();
    }
}

fn mood_log_from_row(row: &Row) -> MoodLog {
    MoodLog {
        id: row.get(0),
        mood: row.get(1),
        notes: row.get(2),
        tags: row.get(3),
        date: row.get(4),
    }
}

#[async_trait]
impl MoodStore for Database {
    async fn create_mood_log(&self, request: CreateMoodLogRequest) -> Result<MoodLog, ApiError> {
        let client = self.get_connection().await?;

        let query = format!(
            "INSERT INTO mood_logs (mood, notes, date) \
             VALUES ($1, $2, COALESCE($3::text::date, CURRENT_DATE)) \
             RETURNING {}",
            MOOD_LOG_COLUMNS
        );

        let row = client
            .query_one(&query, &[&request.mood, &request.notes, &request.date])
            .await
            .map_err(ApiError::from)?;

        let created = mood_log_from_row(&row);
        info!("Created mood log with id: {}", created.id);
        Ok(created)
    }

    async fn list_mood_logs(&self) -> Result<Vec<MoodLog>, ApiError> {
        let client = self.get_connection().await?;

        let query = format!("SELECT {} FROM mood_logs ORDER BY date DESC", MOOD_LOG_COLUMNS);

        let rows = client.query(&query, &[]).await.map_err(ApiError::from)?;

        Ok(rows.iter().map(mood_log_from_row).collect())
    }

    async fn update_mood_log(
        &self,
        id: &str,
        request: UpdateMoodLogRequest,
    ) -> Result<Option<MoodLog>, ApiError> {
        let client = self.get_connection().await?;

        let query = format!(
            "UPDATE mood_logs SET mood = $1, notes = $2, date = $3::text::date \
             WHERE id = $4::text::int4 \
             RETURNING {}",
            MOOD_LOG_COLUMNS
        );

        let row = client
            .query_opt(&query, &[&request.mood, &request.notes, &request.date, &id])
            .await
            .map_err(ApiError::from)?;

        match row {
            Some(row) => {
                let updated = mood_log_from_row(&row);
                info!("Updated mood log with id: {}", updated.id);
                Ok(Some(updated))
            }
            None => {
                info!("No mood log with id {} to update", id);
                Ok(None)
            }
        }
    }

    async fn delete_mood_log(&self, id: &str) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        let rows_affected = client
            .execute("DELETE FROM mood_logs WHERE id = $1::text::int4", &[&id])
            .await
            .map_err(ApiError::from)?;

        info!("Deleted {} mood log(s) with id: {}", rows_affected, id);
        Ok(())
    }
}
