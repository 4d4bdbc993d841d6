use async_trait::async_trait;
use redis::aio::{ConnectionLike, ConnectionManager};
use redis::{AsyncCommands, Client};
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::interval};
use tracing::{debug, error, info, warn};

use super::Store;
use crate::error::StoreError;

enum Connection<C> {
    Ready(C),
    Unavailable(String),
}

/// Store sobre Redis.
///
/// Generic over the connection so tests can plug in a mock; production code
/// uses [`ConnectionManager`], which reconnects on its own after a drop.
pub struct RedisStore<C = ConnectionManager> {
    connection: Connection<C>,
}

impl RedisStore<ConnectionManager> {
    /// Conecta de forma eager y falla si Redis no responde.
    pub async fn try_connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)
            .map_err(|e| StoreError::Unavailable(format!("invalid redis url: {e}")))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect to redis: {e}")))?;

        info!("🗄️ Conectado a Redis");
        Ok(Self::from_connection(connection))
    }

    /// Like [`try_connect`](Self::try_connect) but never fails: on error the
    /// fault is logged and every read on the returned store fails.
    pub async fn connect(url: &str) -> Self {
        match Self::try_connect(url).await {
            Ok(store) => store,
            Err(e) => {
                error!("❌ Error al conectar con Redis: {}", e);
                warn!("🔄 Continuando sin store utilizable; todas las lecturas fallarán");
                Self::unavailable(e.to_string())
            }
        }
    }
}

impl<C> RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    pub fn from_connection(connection: C) -> Self {
        Self {
            connection: Connection::Ready(connection),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            connection: Connection::Unavailable(reason.into()),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection, Connection::Ready(_))
    }

    fn connection(&self) -> Result<C, StoreError> {
        match &self.connection {
            Connection::Ready(conn) => Ok(conn.clone()),
            Connection::Unavailable(reason) => Err(StoreError::Unavailable(reason.clone())),
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let _: String = conn.ping().await?;
        Ok(())
    }

    /// Lanza una tarea que hace PING periódicamente y registra fallos de conexión.
    ///
    /// Faults are only logged; in-flight lookups are unaffected unless their own
    /// command fails.
    pub fn spawn_health_monitor(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = interval(every);
            let mut healthy = true;

            loop {
                ticker.tick().await;

                match store.ping().await {
                    Ok(()) => {
                        if !healthy {
                            info!("✅ Conexión con Redis restablecida");
                        }
                        healthy = true;
                    }
                    Err(e) => {
                        if healthy {
                            error!("❌ Error de conexión con Redis: {}", e);
                        } else {
                            debug!("Redis sigue sin responder: {}", e);
                        }
                        healthy = false;
                    }
                }
            }
        })
    }
}

#[async_trait]
impl<C> Store for RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection()?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        // SETEX no acepta 0
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }
}
