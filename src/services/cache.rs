//! The cache-lookup-and-refresh protocol shared by every resource kind.
//!
//! Each kind supplies a store (one table per kind), a provider fetcher and a
//! configured TTL; the protocol itself is generic. A batch of rows written
//! together shares one freshness window, judged from the first row's
//! `created_at`.
//!
//! Known race: two concurrent misses for the same location may both fetch and
//! both insert. Reads and writes are individual statements with no
//! cross-statement transaction, so no de-duplication is guaranteed.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::clients::FetchError;
use crate::db::StoreError;
use crate::models::{CachedRecord, LocationRef, ResourceKind};

/// Keyed persistence for one resource kind, normally backed by sqlite through
/// [`crate::db::Store`]. Kept as a trait so tests can substitute doubles.
#[async_trait]
pub trait ResourceStore<R>: Send + Sync {
    /// All cached rows for a location, oldest first.
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<R>, StoreError>;

    /// Persist a fetched batch, keeping each record's own `created_at`.
    async fn insert_all(&self, location_id: i32, records: &[R]) -> Result<(), StoreError>;

    async fn delete_by_location(&self, location_id: i32) -> Result<(), StoreError>;
}

/// External fetch for one resource kind: provider call plus normalization
/// into this system's record type.
#[async_trait]
pub trait ResourceFetcher<R>: Send + Sync {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<R>, FetchError>;
}

/// Outcome of a cache lookup, consumed by pattern matching.
#[derive(Debug)]
pub enum CacheOutcome<R> {
    /// Stored rows exist and are within the TTL.
    Hit(Vec<R>),
    /// No rows, or they were stale and have just been purged.
    Miss,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Look up the cached batch for a location. Stale batches are purged before
/// reporting a miss, so a `Miss` always means the table holds no rows for
/// this location.
pub async fn lookup<R, S>(
    store: &S,
    kind: ResourceKind,
    ttl: Duration,
    location_id: i32,
) -> Result<CacheOutcome<R>, StoreError>
where
    R: CachedRecord + Send,
    S: ResourceStore<R> + ?Sized,
{
    let rows = store.find_by_location(location_id).await?;

    let Some(first) = rows.first() else {
        debug!("{} cache empty for location {}", kind, location_id);
        return Ok(CacheOutcome::Miss);
    };

    let age = Utc::now() - first.created_at();
    if age <= ttl {
        debug!(
            "{} cache hit for location {} ({} rows, age {}ms)",
            kind,
            location_id,
            rows.len(),
            age.num_milliseconds()
        );
        return Ok(CacheOutcome::Hit(rows));
    }

    info!(
        "{} cache stale for location {} (age {}ms > ttl {}ms), purging",
        kind,
        location_id,
        age.num_milliseconds(),
        ttl.num_milliseconds()
    );
    store.delete_by_location(location_id).await?;

    Ok(CacheOutcome::Miss)
}

/// Serve a resource from cache, refreshing from the provider on a miss.
///
/// On a miss the fetched records are persisted tagged with the location id
/// and the in-memory batch is returned directly, not re-read from the store.
/// A provider returning zero items is a valid success: nothing is persisted
/// and the empty batch is returned. A fetch failure propagates with nothing
/// persisted.
pub async fn fetch_resource<R, S, F>(
    store: &S,
    fetcher: &F,
    kind: ResourceKind,
    ttl: Duration,
    location: &LocationRef,
) -> Result<Vec<R>, CacheError>
where
    R: CachedRecord + Send + Sync,
    S: ResourceStore<R> + ?Sized,
    F: ResourceFetcher<R> + ?Sized,
{
    match lookup(store, kind, ttl, location.id).await? {
        CacheOutcome::Hit(rows) => Ok(rows),
        CacheOutcome::Miss => {
            let records = fetcher.fetch(location).await?;

            if records.is_empty() {
                info!(
                    "{} provider returned no items for location {}",
                    kind, location.id
                );
                return Ok(records);
            }

            store.insert_all(location.id, &records).await?;
            info!(
                "Cached {} {} rows for location {}",
                records.len(),
                kind,
                location.id
            );

            Ok(records)
        }
    }
}
