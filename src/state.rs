use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::Key;
use diesel::{
    SqliteConnection,
    connection::{AnsiTransactionManager, SimpleConnection, TransactionManager},
    r2d2::{
        ConnectionManager, CustomizeConnection, Pool, PoolError,
        PooledConnection,
    },
    result::QueryResult,
};

use crate::{settings::Settings, util_resp::FailureResponse};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

type PooledConn = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: DbPool,
    pub key: Key,
    pub settings: Arc<Settings>,
}

/// Applied to every connection handed out by the pool. SQLite leaves foreign
/// key enforcement off unless it is requested per connection.
#[derive(Debug)]
pub struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error>
    for SqlitePragmas
{
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn make_pool(db_url: &str) -> Result<DbPool, PoolError> {
    Pool::builder()
        // every `:memory:` connection is a separate database
        .max_size(if db_url == ":memory:" { 1 } else { 10 })
        .connection_customizer(Box::new(SqlitePragmas))
        .build(ConnectionManager::<SqliteConnection>::new(db_url))
}

/// Opens a transaction holding the write lock from the start. Writers then
/// queue on the busy timeout instead of failing when a read lock cannot be
/// upgraded, and each one sees the rows committed before it.
pub fn begin_immediate(conn: &mut SqliteConnection) -> QueryResult<()> {
    AnsiTransactionManager::begin_transaction_sql(conn, "BEGIN IMMEDIATE")
}

/// Slot shared between [`commit_transactions`] and the connection extractor,
/// so that the middleware can finish the transaction a handler opened.
#[derive(Clone, Default)]
struct OpenTransaction(
    Arc<std::sync::Mutex<Option<Arc<tokio::sync::Mutex<PooledConn>>>>>,
);

/// This middleware commits transactions opened while handling a request, once
/// the response has been produced. Failed requests are rolled back instead.
pub async fn commit_transactions(mut req: Request, next: Next) -> Response {
    let open = OpenTransaction::default();
    req.extensions_mut().insert(open.clone());

    let res = next.run(req).await;

    let conn = match open.0.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => None,
    };

    if let Some(conn) = conn {
        let mut conn = conn.lock().await;

        let status = res.status();
        let outcome = if status.is_success()
            || status.is_redirection()
            || status.is_informational()
        {
            <PooledConn as diesel::Connection>
                ::TransactionManager
                ::commit_transaction(&mut *conn)
        } else {
            tracing::debug!(%status, "rolling back request transaction");
            <PooledConn as diesel::Connection>
                ::TransactionManager
                ::rollback_transaction(&mut *conn)
        };

        if let Err(e) = outcome {
            tracing::error!("failed to finish request transaction: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    res
}

/// A pooled connection shared by every extractor of a single request. When
/// `TX` is set the connection has an open write transaction (see
/// [`begin_immediate`]) which is finished by [`commit_transactions`]; pages
/// which only read take `Conn<false>` and run in autocommit mode.
#[derive(Clone)]
pub struct ThreadSafeConn<const TX: bool> {
    pub inner: Arc<tokio::sync::Mutex<PooledConn>>,
}

#[async_trait]
impl<S, const TX: bool> FromRequestParts<S> for ThreadSafeConn<TX>
where
    S: Send + Sync,
    DbPool: FromRef<S>,
{
    type Rejection = FailureResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        if let Some(conn) = parts.extensions.get::<ThreadSafeConn<TX>>() {
            return Ok(conn.clone());
        }

        let pool = DbPool::from_ref(state);
        let mut conn = tokio::task::spawn_blocking(move || pool.get())
            .await
            .map_err(|e| {
                tracing::error!("connection task failed: {e}");
                FailureResponse::ServerError(())
            })?
            .map_err(|e| {
                tracing::error!("could not acquire a connection: {e}");
                FailureResponse::ServerError(())
            })?;

        let conn = if TX {
            let open = parts
                .extensions
                .get::<OpenTransaction>()
                .cloned()
                .ok_or_else(|| {
                    tracing::error!(
                        "transactional connection requested outside of \
                         the commit middleware"
                    );
                    FailureResponse::ServerError(())
                })?;

            begin_immediate(&mut conn).map_err(FailureResponse::from)?;

            let conn = Arc::new(tokio::sync::Mutex::new(conn));
            match open.0.lock() {
                Ok(mut slot) => *slot = Some(conn.clone()),
                Err(_) => return Err(FailureResponse::ServerError(())),
            }
            conn
        } else {
            Arc::new(tokio::sync::Mutex::new(conn))
        };

        let conn = ThreadSafeConn { inner: conn };
        parts.extensions.insert(conn.clone());
        Ok(conn)
    }
}

pub struct Conn<const TX: bool> {
    inner: tokio::sync::OwnedMutexGuard<PooledConn>,
}

impl<const TX: bool> Deref for Conn<TX> {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<const TX: bool> DerefMut for Conn<TX> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[async_trait]
impl<S, const TX: bool> FromRequestParts<S> for Conn<TX>
where
    S: Send + Sync,
    DbPool: FromRef<S>,
{
    type Rejection = FailureResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let conn = ThreadSafeConn::<TX>::from_request_parts(parts, state).await?;

        let inner = conn.inner.try_lock_owned().map_err(|_| {
            tracing::error!("request connection is already in use");
            FailureResponse::ServerError(())
        })?;

        Ok(Conn { inner })
    }
}
