//! Request log storage.
//!
//! The logger talks to storage only through [`Connector`] and
//! [`LogConnection`]; transaction boundaries are driven by the caller.

pub mod postgres;

use async_trait::async_trait;

use jrdemo_core::error::Result;
use jrdemo_core::record::LogRow;

pub use postgres::PgConnector;

/// One open database session, owned by a single request.
#[async_trait]
pub trait LogConnection: Send {
    async fn begin(&mut self) -> Result<()>;
    async fn insert(&mut self, row: &LogRow) -> Result<()>;
    async fn commit(&mut self) -> Result<()>;
    async fn rollback(&mut self) -> Result<()>;
    /// Release the session. Consumes the connection.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens new, unpooled connections on demand.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn LogConnection>>;
}
