use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls};

use jrdemo_core::error::{DemoError, Result};
use jrdemo_core::record::LogRow;

use super::{Connector, LogConnection};
use crate::config::DatabaseSection;

const INSERT_LOG_ROW: &str = "INSERT INTO request_log (timestamp, source_ip, endpoint, status_code, message) \
     VALUES ($1, $2, $3, $4, $5)";

fn db_err(e: tokio_postgres::Error) -> DemoError {
    DemoError::Database(e.to_string())
}

/// Connects to Postgres with the configured credentials. No pooling.
pub struct PgConnector {
    config: Config,
}

impl PgConnector {
    pub fn new(db: &DatabaseSection) -> Self {
        let mut config = Config::new();
        config
            .dbname(&db.name)
            .user(&db.user)
            .password(&db.password)
            .host(&db.host)
            .port(db.port);
        Self { config }
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self) -> Result<Box<dyn LogConnection>> {
        let (client, connection) = self.config.connect(NoTls).await.map_err(db_err)?;
        // The connection future drives the socket until the client is dropped.
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(error = %e, "postgres connection ended with error");
            }
        });
        Ok(Box::new(PgConnection { client, driver }))
    }
}

pub struct PgConnection {
    client: Client,
    driver: JoinHandle<()>,
}

#[async_trait]
impl LogConnection for PgConnection {
    async fn begin(&mut self) -> Result<()> {
        self.client.batch_execute("BEGIN").await.map_err(db_err)
    }

    async fn insert(&mut self, row: &LogRow) -> Result<()> {
        self.client
            .execute(
                INSERT_LOG_ROW,
                &[
                    &row.timestamp,
                    &row.source_ip,
                    &row.endpoint,
                    &row.status_code,
                    &row.message,
                ],
            )
            .await
            .map(|_| ())
            .map_err(db_err)
    }

    async fn commit(&mut self) -> Result<()> {
        self.client.batch_execute("COMMIT").await.map_err(db_err)
    }

    async fn rollback(&mut self) -> Result<()> {
        self.client.batch_execute("ROLLBACK").await.map_err(db_err)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let PgConnection { client, driver } = *self;
        drop(client);
        driver
            .await
            .map_err(|e| DemoError::Internal(format!("postgres driver task: {e}")))
    }
}
