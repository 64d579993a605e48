//! # Mapping Adapter — Dict-Like Surface Over Five Primitives
//!
//! Containers that can enumerate keys and get, set and delete single items
//! implement [`MappingAccess`]. The blanket [`DictLike`] extension trait then
//! provides the full dictionary vocabulary (`keys`, `items`, `pop`,
//! `setdefault`, `update`, comparison against plain mappings, ...) on top of
//! those five primitives.
//!
//! Writes are fallible because the containers this is built for route every
//! assignment through a validator.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{FormError, FormResult};

/// Minimal capability interface of a mapping-like container.
pub trait MappingAccess {
    /// Key type. `Debug` is used to name missing keys in errors.
    type Key: Clone + Ord + fmt::Debug;
    /// Item type.
    type Item: Clone + PartialEq;

    /// Iterate the keys currently present, in container order.
    fn iter_keys(&self) -> impl Iterator<Item = Self::Key> + '_;

    /// Return the item stored under `key`, if any.
    fn get_item(&self, key: &Self::Key) -> Option<Self::Item>;

    /// Store `value` under `key`.
    fn set_item(&mut self, key: Self::Key, value: Self::Item) -> FormResult<()>;

    /// Remove the item stored under `key`.
    ///
    /// # Errors
    ///
    /// [`FormError::KeyNotFound`] if `key` is absent.
    fn del_item(&mut self, key: &Self::Key) -> FormResult<()>;

    /// `true` if an item is stored under `key`.
    fn contains_key(&self, key: &Self::Key) -> bool {
        self.get_item(key).is_some()
    }
}

/// Dictionary operations derived from [`MappingAccess`].
///
/// Implemented for every `MappingAccess` type; never implement it by hand.
pub trait DictLike: MappingAccess {
    /// Keys in container order.
    fn keys(&self) -> Vec<Self::Key> {
        self.iter_keys().collect()
    }

    /// Iterate `(key, item)` pairs in container order.
    fn iter_items(&self) -> impl Iterator<Item = (Self::Key, Self::Item)> + '_ {
        self.iter_keys().filter_map(move |key| {
            let item = self.get_item(&key)?;
            Some((key, item))
        })
    }

    /// `(key, item)` pairs in container order.
    fn items(&self) -> Vec<(Self::Key, Self::Item)> {
        self.iter_items().collect()
    }

    /// Iterate items in container order.
    fn iter_values(&self) -> impl Iterator<Item = Self::Item> + '_ {
        self.iter_items().map(|(_, item)| item)
    }

    /// Items in container order.
    fn values(&self) -> Vec<Self::Item> {
        self.iter_values().collect()
    }

    /// Number of keys present.
    fn len(&self) -> usize {
        self.iter_keys().count()
    }

    /// `true` when no key is present.
    fn is_empty(&self) -> bool {
        self.iter_keys().next().is_none()
    }

    /// Alias of [`MappingAccess::contains_key`].
    fn has_key(&self, key: &Self::Key) -> bool {
        self.contains_key(key)
    }

    /// Return the item under `key`, or `default` when absent.
    fn get_or(&self, key: &Self::Key, default: Self::Item) -> Self::Item {
        self.get_item(key).unwrap_or(default)
    }

    /// Store `default` under `key` unless the key is present, then return
    /// whatever the container holds for `key`.
    fn setdefault(&mut self, key: Self::Key, default: Self::Item) -> FormResult<Option<Self::Item>> {
        if !self.contains_key(&key) {
            self.set_item(key.clone(), default)?;
        }
        Ok(self.get_item(&key))
    }

    /// Remove and return the item under `key`.
    ///
    /// # Errors
    ///
    /// [`FormError::KeyNotFound`] if `key` is absent.
    fn pop(&mut self, key: &Self::Key) -> FormResult<Self::Item> {
        let item = self
            .get_item(key)
            .ok_or_else(|| FormError::KeyNotFound(format!("{key:?}")))?;
        self.del_item(key)?;
        Ok(item)
    }

    /// Remove and return the item under `key`, or return `default` when absent.
    fn pop_or(&mut self, key: &Self::Key, default: Self::Item) -> FormResult<Self::Item> {
        match self.get_item(key) {
            Some(item) => {
                self.del_item(key)?;
                Ok(item)
            }
            None => Ok(default),
        }
    }

    /// Remove and return the first item in container order.
    ///
    /// # Errors
    ///
    /// [`FormError::KeyNotFound`] if the container is empty.
    fn popitem(&mut self) -> FormResult<(Self::Key, Self::Item)> {
        let first = self.iter_items().next();
        let (key, item) = first.ok_or_else(|| FormError::KeyNotFound("container is empty".into()))?;
        self.del_item(&key)?;
        Ok((key, item))
    }

    /// Store every pair from `other`, in iteration order.
    fn update<I>(&mut self, other: I) -> FormResult<()>
    where
        I: IntoIterator<Item = (Self::Key, Self::Item)>,
    {
        for (key, item) in other {
            self.set_item(key, item)?;
        }
        Ok(())
    }

    /// Delete every key.
    fn clear(&mut self) -> FormResult<()> {
        for key in self.keys() {
            self.del_item(&key)?;
        }
        Ok(())
    }

    /// Snapshot the container as an ordered map.
    fn to_map(&self) -> BTreeMap<Self::Key, Self::Item> {
        self.iter_items().collect()
    }

    /// Compare contents with a plain mapping or with the items of another
    /// container. Order is irrelevant.
    fn eq_mapping<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = (Self::Key, Self::Item)>,
    {
        self.to_map() == other.into_iter().collect::<BTreeMap<_, _>>()
    }
}

impl<T: MappingAccess + ?Sized> DictLike for T {}
