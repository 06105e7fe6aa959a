//! Live counter retrieval from the MySQL server.

use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts, OptsBuilder};
use tracing::{debug, warn};

use crate::config::ConnectionSettings;
use crate::counters::Counter;
use crate::error::ProbeError;

/// Source of `(Variable_name, Variable_value)` status rows.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch_status(&mut self) -> Result<Vec<(String, String)>, ProbeError>;
}

/// Query selecting every counter in [`Counter::ALL`].
pub fn status_query() -> String {
    let names = Counter::ALL
        .iter()
        .map(|c| format!("'{}'", c.name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT Variable_name, Variable_value FROM performance_schema.global_status \
         WHERE Variable_name IN ({names})"
    )
}

/// Reads status counters over a single short-lived connection.
pub struct MysqlSource {
    opts: Opts,
}

impl MysqlSource {
    pub fn new(settings: &ConnectionSettings) -> Self {
        let opts = OptsBuilder::default()
            .ip_or_hostname(settings.hostname.clone())
            .tcp_port(settings.port)
            .user(Some(settings.username.clone()))
            .pass(settings.password.clone())
            .db_name(Some(settings.database.clone()));

        Self { opts: opts.into() }
    }
}

impl StatusSource for MysqlSource {
    async fn fetch_status(&mut self) -> Result<Vec<(String, String)>, ProbeError> {
        debug!(
            "Connecting to {}:{}",
            self.opts.ip_or_hostname(),
            self.opts.tcp_port()
        );
        let mut conn = Conn::new(self.opts.clone())
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;

        let query = status_query();
        let result = conn.query::<(String, String), _>(query.as_str()).await;

        // the connection is done with either way
        if let Err(e) = conn.disconnect().await {
            warn!("Failed to close connection cleanly: {}", e);
        }

        let rows = result.map_err(|e| ProbeError::Query(e.to_string()))?;
        debug!("Fetched {} status rows", rows.len());
        Ok(rows)
    }
}
