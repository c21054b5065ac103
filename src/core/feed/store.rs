//! In-memory record store shared by the alert and notification feeds.
//!
//! Every mutation builds a fresh record list and publishes it as a new
//! [`Snapshot`]; snapshots already handed out are never touched again.
//! Records are held behind `Arc`, so a new list shares every record the
//! mutation didn't touch.
//! Subscribers are woken through a `tokio::sync::watch` channel, which is
//! written synchronously so nothing inside the store awaits.

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

use tokio::sync::watch;

use super::record::{AlertRecord, Dismissible, FeedRecord, NotificationRecord, Readable, RecordId};
use crate::core::error::FeedError;

pub type AlertStore = RecordStore<AlertRecord>;
pub type NotificationStore = RecordStore<NotificationRecord>;

/// Single-threaded handle to a store, created once at the application root
/// and passed down to every consumer that needs to mutate it.
pub type SharedStore<R> = Rc<RefCell<RecordStore<R>>>;

/// Immutable point-in-time view of a store, newest record first.
#[derive(Debug)]
pub struct Snapshot<R>(Arc<Vec<Arc<R>>>);

impl<R> Snapshot<R> {
    pub fn empty() -> Self {
        Self(Arc::new(Vec::new()))
    }

    /// True when both snapshots come from the same publish.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<R> Clone for Snapshot<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R> Deref for Snapshot<R> {
    type Target = [Arc<R>];

    fn deref(&self) -> &[Arc<R>] {
        &self.0
    }
}

impl<R> Default for Snapshot<R> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Consumer side of a store: always sees the latest published snapshot.
#[derive(Debug, Clone)]
pub struct Subscription<R> {
    rx: watch::Receiver<Snapshot<R>>,
}

impl<R> Subscription<R> {
    /// Latest snapshot, without marking it as seen.
    pub fn current(&self) -> Snapshot<R> {
        self.rx.borrow().clone()
    }

    /// Latest snapshot, marking it as seen.
    pub fn latest(&mut self) -> Snapshot<R> {
        self.rx.borrow_and_update().clone()
    }

    /// Whether a mutation happened since the last `latest()`.
    /// A dropped store counts as unchanged.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next mutation. Returns false once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

#[derive(Debug)]
pub struct RecordStore<R> {
    records: Snapshot<R>,
    /// Next id handed out by `next_id`, always above every id seen so far
    next_id: RecordId,
    tx: watch::Sender<Snapshot<R>>,
}

impl<R: FeedRecord> RecordStore<R> {
    pub fn new() -> Self {
        let records = Snapshot::empty();
        let (tx, _rx) = watch::channel(records.clone());
        Self {
            records,
            next_id: 1,
            tx,
        }
    }

    pub fn into_shared(self) -> SharedStore<R> {
        Rc::new(RefCell::new(self))
    }

    /// Allocate a fresh id for a record about to be added.
    pub fn next_id(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Insert a record at the head of the feed.
    ///
    /// A record whose id is already present is rejected and the store is
    /// left untouched.
    pub fn add(&mut self, record: R) -> Result<(), FeedError> {
        let id = record.id();
        if self.contains(id) {
            log::error!("Rejected duplicate record id {}", id);
            return Err(FeedError::DuplicateId { id });
        }

        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(Arc::new(record));
        next.extend(self.records.iter().cloned());

        self.next_id = self.next_id.max(id.saturating_add(1));
        self.publish(next);
        log::debug!("Added record {} ({} total)", id, self.records.len());
        Ok(())
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id).map(Arc::as_ref)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot<R> {
        self.records.clone()
    }

    pub fn subscribe(&self) -> Subscription<R> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    fn publish(&mut self, records: Vec<Arc<R>>) {
        self.records = Snapshot(Arc::new(records));
        self.tx.send_replace(self.records.clone());
    }
}

impl<R: FeedRecord> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Dismissible> RecordStore<R> {
    /// Remove a record for good. Dismissing an absent id is a no-op so
    /// repeated clicks on the same close button are harmless.
    pub fn dismiss(&mut self, id: RecordId) -> bool {
        if !self.contains(id) {
            log::debug!("Dismiss of absent record {} ignored", id);
            return false;
        }

        let next = self
            .records
            .iter()
            .filter(|r| r.id() != id)
            .cloned()
            .collect();
        self.publish(next);
        true
    }
}

impl<R: Readable> RecordStore<R> {
    /// Mark one record read. Returns false if absent or already read.
    pub fn mark_read(&mut self, id: RecordId) -> bool {
        match self.get(id) {
            Some(record) if !record.is_read() => {}
            _ => return false,
        }

        let next = self
            .records
            .iter()
            .map(|r| {
                if r.id() == id {
                    let mut updated = R::clone(r);
                    updated.mark_read();
                    Arc::new(updated)
                } else {
                    Arc::clone(r)
                }
            })
            .collect();
        self.publish(next);
        true
    }

    /// Mark every current record read. Returns how many flipped; when none
    /// did, nothing is published.
    pub fn mark_all_read(&mut self) -> usize {
        let flipped = self.unread_count();
        if flipped == 0 {
            return 0;
        }

        let next = self
            .records
            .iter()
            .map(|r| {
                if r.is_read() {
                    Arc::clone(r)
                } else {
                    let mut updated = R::clone(r);
                    updated.mark_read();
                    Arc::new(updated)
                }
            })
            .collect();
        self.publish(next);
        log::debug!("Marked {} records read", flipped);
        flipped
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_read()).count()
    }
}
