//! Cart Store: the single owner of the customer's cart.
//!
//! The store loads the persisted cart once, serves reads from memory, and
//! writes the full cart back to the [`LocalStore`] on every mutation before
//! returning. After each successful mutation it publishes a [`CartEvent`]
//! so that observers (cart badge, order summary) can re-read the store.
//!
//! Delivery follows `tokio::sync::broadcast` semantics: every receiver that
//! exists at publish time gets the event, receivers created later see only
//! later events, and a receiver that falls more than the channel capacity
//! behind gets `RecvError::Lagged` and should simply call [`CartStore::get`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use estimator_core::{CartItem, CartItemError, CartItemId, CartState};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::storage::{CART_KEY, LocalStore, StorageError};

const EVENT_CAPACITY: usize = 64;

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Persisting the cart failed; the in-memory cart is unchanged.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("cart serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The change would overflow a quantity or amount; nothing was changed.
    #[error(transparent)]
    Item(#[from] CartItemError),
}

/// Notification published after every cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// Lines were added, removed or changed.
    Updated { total_items: u64, total_amount: u64 },
    /// The cart was emptied.
    Cleared,
}

/// Service object owning the cart state.
pub struct CartStore<S> {
    storage: S,
    state: Mutex<CartState>,
    events: broadcast::Sender<CartEvent>,
}

impl<S: LocalStore> CartStore<S> {
    /// Open the store, loading any persisted cart.
    ///
    /// A missing, unreadable or malformed persisted cart yields an empty cart.
    pub fn open(storage: S) -> Self {
        let state = load(&storage);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            state: Mutex::new(state),
            events,
        }
    }

    /// Current cart.
    #[must_use]
    pub fn get(&self) -> CartState {
        self.lock().clone()
    }

    /// Subscribe to cart notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Add a line, merging it with an existing line of the same identity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Item` if the merged line or the cart total would
    /// overflow, or another `CartError` if the cart cannot be persisted.
    #[instrument(skip(self, item), fields(item_id = %item.id(), quantity = item.quantity()))]
    pub fn add(&self, item: CartItem) -> Result<CartState, CartError> {
        self.mutate(|cart| cart.add(item))
    }

    /// Remove the line with `id`. Unknown ids leave the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart cannot be persisted.
    #[instrument(skip(self), fields(item_id = %id))]
    pub fn remove(&self, id: &CartItemId) -> Result<CartState, CartError> {
        self.mutate(|cart| {
            if !cart.remove(id) {
                debug!("Remove requested for a line not in the cart");
            }
            Ok(())
        })
    }

    /// Set a line's quantity. `quantity <= 0` is the same as [`Self::remove`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::Item` if the quantity or resulting amount does
    /// not fit, or another `CartError` if the cart cannot be persisted.
    #[instrument(skip(self), fields(item_id = %id))]
    pub fn update_quantity(&self, id: &CartItemId, quantity: i64) -> Result<CartState, CartError> {
        self.mutate(|cart| {
            if !cart.update_quantity(id, quantity)? {
                debug!("Quantity update for a line not in the cart");
            }
            Ok(())
        })
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<CartState, CartError> {
        self.mutate(|cart| {
            cart.clear();
            Ok(())
        })
    }

    /// Re-read the persisted cart, replacing the in-memory copy. Used when
    /// another process may have written the store.
    pub fn reload(&self) -> CartState {
        let fresh = load(&self.storage);
        let mut guard = self.lock();
        guard.clone_from(&fresh);
        fresh
    }

    /// Apply `change` to a copy of the cart, persist it, then swap it in.
    fn mutate(
        &self,
        change: impl FnOnce(&mut CartState) -> Result<(), CartItemError>,
    ) -> Result<CartState, CartError> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        change(&mut next)?;

        let raw = serde_json::to_string(&next)?;
        self.storage.set(CART_KEY, &raw)?;
        guard.clone_from(&next);
        drop(guard);

        let event = if next.is_empty() {
            CartEvent::Cleared
        } else {
            CartEvent::Updated {
                total_items: next.total_items(),
                total_amount: next.total_amount(),
            }
        };
        self.publish(event);
        Ok(next)
    }

    fn publish(&self, event: CartEvent) {
        if self.events.send(event).is_err() {
            debug!(?event, "No cart subscribers");
        }
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Load the persisted cart, falling back to an empty one.
fn load(storage: &impl LocalStore) -> CartState {
    match storage.get(CART_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<CartState>(&raw) {
            Ok(state) => {
                info!(
                    lines = state.items().len(),
                    total_items = state.total_items(),
                    "Loaded persisted cart"
                );
                state
            }
            Err(e) => {
                warn!(error = %e, "Persisted cart is malformed, starting empty");
                CartState::new()
            }
        },
        Ok(None) => CartState::new(),
        Err(e) => {
            warn!(error = %e, "Persisted cart is unreadable, starting empty");
            CartState::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::num::NonZeroU32;
    use std::sync::Arc;

    use estimator_core::{Dimensions, FurnitureConfig};
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    fn item(category: &str, price: u64, quantity: u32) -> CartItem {
        CartItem::new(
            format!("{category} item"),
            FurnitureConfig {
                category: category.to_owned(),
                material: "teak".to_owned(),
                dimensions: Dimensions::new(84, 36, 36),
                finish: "lacquered".to_owned(),
                color: "natural".to_owned(),
            },
            price,
            NonZeroU32::new(quantity).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_store_opens_empty() {
        let store = CartStore::open(MemoryStore::new());
        let cart = store.get();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_amount(), 0);
    }

    #[test]
    fn test_corrupted_store_opens_empty() {
        for garbage in ["not json", "{\"items\": 3}", "[]", ""] {
            let storage = MemoryStore::new();
            storage.set(CART_KEY, garbage).unwrap();
            let store = CartStore::open(storage);
            assert_eq!(store.get(), CartState::new(), "input: {garbage:?}");
        }
    }

    #[test]
    fn test_mutations_are_persisted_before_returning() {
        let storage = Arc::new(MemoryStore::new());
        let store = CartStore::open(Arc::clone(&storage));

        store.add(item("sofa", 125_000, 1)).unwrap();
        let returned = store.add(item("sofa", 125_000, 1)).unwrap();
        assert_eq!(returned.total_items(), 2);

        let raw = storage.get(CART_KEY).unwrap().unwrap();
        let persisted: CartState = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, returned);

        let reopened = CartStore::open(Arc::clone(&storage));
        assert_eq!(reopened.get(), returned);
    }

    #[test]
    fn test_update_to_zero_matches_remove() {
        let a = CartStore::open(MemoryStore::new());
        let b = CartStore::open(MemoryStore::new());
        for store in [&a, &b] {
            store.add(item("bed", 60_000, 1)).unwrap();
            store.add(item("chair", 18_000, 2)).unwrap();
        }
        let id = a.get().items()[0].id().clone();

        let via_update = a.update_quantity(&id, 0).unwrap();
        let via_remove = b.remove(&id).unwrap();
        assert_eq!(via_update, via_remove);
        assert_eq!(via_update.items().len(), 1);
    }

    #[test]
    fn test_update_quantity_sets_line_total() {
        let store = CartStore::open(MemoryStore::new());
        store.add(item("table", 45_000, 1)).unwrap();
        let id = store.get().items()[0].id().clone();

        let cart = store.update_quantity(&id, 4).unwrap();
        assert_eq!(cart.items()[0].quantity(), 4);
        assert_eq!(cart.items()[0].total_price(), 180_000);
        assert_eq!(cart.total_amount(), 180_000);
    }

    #[test]
    fn test_unknown_id_is_a_noop() {
        let store = CartStore::open(MemoryStore::new());
        store.add(item("table", 45_000, 1)).unwrap();
        let before = store.get();
        let after = store.remove(&CartItemId::from("nope")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_subscribers_receive_events_published_after_subscribing() {
        let store = CartStore::open(MemoryStore::new());
        store.add(item("chair", 18_000, 1)).unwrap();

        let mut rx = store.subscribe();
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        store.add(item("chair", 18_000, 2)).unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::Updated {
                total_items: 3,
                total_amount: 54_000
            }
        );

        let mut late = store.subscribe();
        store.clear().unwrap();
        assert_eq!(rx.try_recv().unwrap(), CartEvent::Cleared);
        assert_eq!(late.try_recv().unwrap(), CartEvent::Cleared);
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_failed_persist_leaves_cart_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let store = CartStore::open(FileStore::open(&data_dir).unwrap());
        store.add(item("dresser", 32_000, 1)).unwrap();

        std::fs::remove_dir_all(&data_dir).unwrap();
        assert!(matches!(
            store.add(item("dresser", 32_000, 1)),
            Err(CartError::Storage(_))
        ));
        assert_eq!(store.get().total_items(), 1);
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let storage = Arc::new(MemoryStore::new());
        let ours = CartStore::open(Arc::clone(&storage));
        let theirs = CartStore::open(Arc::clone(&storage));

        theirs.add(item("bookshelf", 28_000, 1)).unwrap();
        assert!(ours.get().is_empty());
        assert_eq!(ours.reload().total_items(), 1);
        assert_eq!(ours.get().total_amount(), 28_000);
    }

    #[test]
    fn test_overflowing_change_is_rejected_without_persisting() {
        let storage = Arc::new(MemoryStore::new());
        let store = CartStore::open(Arc::clone(&storage));
        store.add(item("throne", u64::MAX / 2, 1)).unwrap();
        let persisted = storage.get(CART_KEY).unwrap();
        let mut rx = store.subscribe();

        assert!(matches!(
            store.add(item("throne", u64::MAX / 2, 2)),
            Err(CartError::Item(CartItemError::AmountOverflow(_)))
        ));
        let id = store.get().items()[0].id().clone();
        assert!(matches!(
            store.update_quantity(&id, i64::MAX),
            Err(CartError::Item(CartItemError::QuantityOverflow(_)))
        ));

        assert_eq!(store.get().items()[0].quantity(), 1);
        assert_eq!(storage.get(CART_KEY).unwrap(), persisted);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}
