//! List operations of the cache manager.
//!
//! A list entry is one JSON array stored under one key. Each mutation reads
//! the whole array, changes it in memory and writes the whole array back, so
//! every call costs O(n) to decode and encode, and the encoded array can be no
//! larger than the store's maximum value size.
//!
//! A missing key, a zero-length blob and JSON `null` all mean "no list": the
//! mutation is skipped without error. Lists are never created implicitly;
//! seed them with [`CacheManager::set`].

use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{cancellable, codec, validate_key, CacheManager, SortOrder};
use crate::cache::CacheEntryOptions;
use crate::error::Result;

// == In-memory mutations ==

/// Appends `item`, then re-sorts when an order is given.
fn append<T, K, F>(list: &mut Vec<T>, item: T, order: Option<(F, SortOrder)>) -> bool
where
    K: Ord,
    F: Fn(&T) -> K,
{
    list.push(item);
    if let Some((order_by, direction)) = order {
        direction.sort(list, order_by);
    }
    true
}

/// Replaces the first element matching `predicate` in place.
/// Returns false, leaving the list untouched, when nothing matches.
fn replace_first<T, P, K, F>(
    list: &mut [T],
    predicate: P,
    item: T,
    order: Option<(F, SortOrder)>,
) -> bool
where
    P: Fn(&T) -> bool,
    K: Ord,
    F: Fn(&T) -> K,
{
    let Some(index) = list.iter().position(|existing| predicate(existing)) else {
        return false;
    };
    list[index] = item;
    if let Some((order_by, direction)) = order {
        direction.sort(list, order_by);
    }
    true
}

/// Removes the first element matching `predicate`.
fn remove_first<T, P>(list: &mut Vec<T>, predicate: P) -> bool
where
    P: Fn(&T) -> bool,
{
    match list.iter().position(|existing| predicate(existing)) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

/// Placeholder key extractor for the unordered variants.
type NoOrder<T> = fn(&T);

impl CacheManager {
    // == Read-modify-write ==

    fn mutate_list<T, M>(&self, key: &str, options: &CacheEntryOptions, mutate: M) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        M: FnOnce(&mut Vec<T>) -> bool,
    {
        let Some(bytes) = self.store.get(key)? else {
            debug!(key, "list not cached, skipping mutation");
            return Ok(());
        };
        let Some(mut list) = codec::decode_list::<T>(&bytes)? else {
            debug!(key, "list entry holds no sequence, skipping mutation");
            return Ok(());
        };
        if !mutate(&mut list) {
            debug!(key, "no list element matched, skipping write");
            return Ok(());
        }

        let encoded = codec::encode(&list)?;
        self.store.set(key, encoded, options)?;
        debug!(key, len = list.len(), "rewrote list entry");
        Ok(())
    }

    async fn mutate_list_async<T, M>(
        &self,
        key: &str,
        options: &CacheEntryOptions,
        token: &CancellationToken,
        mutate: M,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        M: FnOnce(&mut Vec<T>) -> bool,
    {
        let Some(bytes) = cancellable(token, self.store.get_async(key)).await? else {
            debug!(key, "list not cached, skipping mutation");
            return Ok(());
        };
        let Some(mut list) = codec::decode_list::<T>(&bytes)? else {
            debug!(key, "list entry holds no sequence, skipping mutation");
            return Ok(());
        };
        if !mutate(&mut list) {
            debug!(key, "no list element matched, skipping write");
            return Ok(());
        }

        let encoded = codec::encode(&list)?;
        cancellable(token, self.store.set_async(key, encoded, options)).await?;
        debug!(key, len = list.len(), "rewrote list entry");
        Ok(())
    }

    // == Add To List ==
    /// Appends `item` to the list under `key`.
    ///
    /// Does nothing when no list is cached under `key`.
    pub fn add_to_list<T>(&self, key: &str, item: T, options: &CacheEntryOptions) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        validate_write(key, &item, options)?;
        self.mutate_list::<T, _>(key, options, |list| {
            append(list, item, None::<(NoOrder<T>, SortOrder)>)
        })
    }

    /// Appends `item`, then stably sorts the whole list by `order_by`.
    pub fn add_to_list_ordered<T, K, F>(
        &self,
        key: &str,
        item: T,
        order_by: F,
        order: SortOrder,
        options: &CacheEntryOptions,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        K: Ord,
        F: Fn(&T) -> K,
    {
        validate_write(key, &item, options)?;
        self.mutate_list::<T, _>(key, options, |list| {
            append(list, item, Some((order_by, order)))
        })
    }

    pub async fn add_to_list_async<T>(
        &self,
        key: &str,
        item: T,
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        validate_write(key, &item, options)?;
        self.mutate_list_async::<T, _>(key, options, token, |list| {
            append(list, item, None::<(NoOrder<T>, SortOrder)>)
        })
        .await
    }

    pub async fn add_to_list_ordered_async<T, K, F>(
        &self,
        key: &str,
        item: T,
        order_by: F,
        order: SortOrder,
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        K: Ord,
        F: Fn(&T) -> K,
    {
        validate_write(key, &item, options)?;
        self.mutate_list_async::<T, _>(key, options, token, |list| {
            append(list, item, Some((order_by, order)))
        })
        .await
    }

    // == Update In List ==
    /// Replaces the first element matching `predicate` with `updated`,
    /// keeping its position.
    ///
    /// When nothing matches, the cached list is left as it was.
    pub fn update_in_list<T, P>(
        &self,
        key: &str,
        predicate: P,
        updated: T,
        options: &CacheEntryOptions,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        validate_write(key, &updated, options)?;
        self.mutate_list::<T, _>(key, options, |list| {
            replace_first(list, predicate, updated, None::<(NoOrder<T>, SortOrder)>)
        })
    }

    /// Replaces the first match, then stably sorts the whole list by `order_by`.
    pub fn update_in_list_ordered<T, P, K, F>(
        &self,
        key: &str,
        predicate: P,
        updated: T,
        order_by: F,
        order: SortOrder,
        options: &CacheEntryOptions,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        P: Fn(&T) -> bool,
        K: Ord,
        F: Fn(&T) -> K,
    {
        validate_write(key, &updated, options)?;
        self.mutate_list::<T, _>(key, options, |list| {
            replace_first(list, predicate, updated, Some((order_by, order)))
        })
    }

    pub async fn update_in_list_async<T, P>(
        &self,
        key: &str,
        predicate: P,
        updated: T,
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        validate_write(key, &updated, options)?;
        self.mutate_list_async::<T, _>(key, options, token, |list| {
            replace_first(list, predicate, updated, None::<(NoOrder<T>, SortOrder)>)
        })
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_in_list_ordered_async<T, P, K, F>(
        &self,
        key: &str,
        predicate: P,
        updated: T,
        order_by: F,
        order: SortOrder,
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        P: Fn(&T) -> bool,
        K: Ord,
        F: Fn(&T) -> K,
    {
        validate_write(key, &updated, options)?;
        self.mutate_list_async::<T, _>(key, options, token, |list| {
            replace_first(list, predicate, updated, Some((order_by, order)))
        })
        .await
    }

    // == Remove From List ==
    /// Removes the first element matching `predicate`.
    pub fn remove_from_list<T, P>(
        &self,
        key: &str,
        predicate: P,
        options: &CacheEntryOptions,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        validate_key(key)?;
        options.validate()?;
        self.mutate_list::<T, _>(key, options, |list| remove_first(list, predicate))
    }

    pub async fn remove_from_list_async<T, P>(
        &self,
        key: &str,
        predicate: P,
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        validate_key(key)?;
        options.validate()?;
        self.mutate_list_async::<T, _>(key, options, token, |list| remove_first(list, predicate))
            .await
    }
}

fn validate_write<T: Serialize>(key: &str, item: &T, options: &CacheEntryOptions) -> Result<()> {
    validate_key(key)?;
    codec::ensure_present("item", item)?;
    options.validate()
}
