//! Feed rendering: turns a store snapshot into serializable feed items.
//!
//! Relative time labels are recomputed on every render and never cached, so
//! they are only as fresh as the last render. Nothing re-renders on a timer;
//! a label can lag behind the wall clock until the next store mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::sync::Arc;

use super::classify::{category_icon, classify_category, classify_priority, classify_severity, Presentation};
use super::record::{AlertRecord, Category, FeedRecord, NotificationRecord, Readable, RecordId};
use super::store::{Snapshot, Subscription};
use super::time::relative_time;

/// Per-record presentation hooks used by the feed renderer.
pub trait FeedItemSource: FeedRecord {
    fn presentation(&self) -> Presentation;
    fn icon(&self) -> &'static str;

    fn category(&self) -> Option<Category> {
        None
    }

    /// Records without a read flag always render as read.
    fn read(&self) -> bool {
        true
    }
}

impl FeedItemSource for AlertRecord {
    fn presentation(&self) -> Presentation {
        classify_severity(self.severity)
    }

    fn icon(&self) -> &'static str {
        "alert-circle"
    }
}

impl FeedItemSource for NotificationRecord {
    fn presentation(&self) -> Presentation {
        classify_priority(self.priority)
    }

    fn icon(&self) -> &'static str {
        category_icon(self.category)
    }

    fn category(&self) -> Option<Category> {
        Some(self.category)
    }

    fn read(&self) -> bool {
        self.is_read()
    }
}

/// Which records a feed shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    #[default]
    All,
    Unread,
    Category(Category),
}

impl FeedFilter {
    fn accepts<R: FeedItemSource>(&self, record: &R) -> bool {
        match self {
            Self::All => true,
            Self::Unread => !record.read(),
            Self::Category(category) => record.category() == Some(*category),
        }
    }
}

/// One rendered feed row, as sent to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: RecordId,
    pub title: String,
    pub message: String,
    pub color: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub category: Option<Category>,
    /// Category tag shown beside the title
    pub category_badge: Option<Presentation>,
    pub created_at: DateTime<Utc>,
    pub time_ago: String,
    pub is_read: bool,
}

/// Render records in snapshot order, keeping those the filter accepts.
pub fn render_records<'a, R, I>(records: I, filter: FeedFilter, now: DateTime<Utc>) -> Vec<FeedItem>
where
    R: FeedItemSource + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter(|r| filter.accepts(*r))
        .map(|r| {
            let presentation = r.presentation();
            FeedItem {
                id: r.id(),
                title: r.title().to_string(),
                message: r.message().to_string(),
                color: presentation.color,
                label: presentation.label,
                icon: r.icon(),
                category: r.category(),
                category_badge: r.category().map(classify_category),
                created_at: r.created_at(),
                time_ago: relative_time(now, r.created_at()),
                is_read: r.read(),
            }
        })
        .collect()
}

/// A feed bound to one store through its subscription.
pub struct FeedView<R> {
    subscription: Subscription<R>,
    filter: FeedFilter,
}

impl<R: FeedItemSource> FeedView<R> {
    pub fn new(subscription: Subscription<R>) -> Self {
        Self {
            subscription,
            filter: FeedFilter::All,
        }
    }

    pub fn with_filter(mut self, filter: FeedFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn set_filter(&mut self, filter: FeedFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> FeedFilter {
        self.filter
    }

    /// Render the latest snapshot and mark it as seen.
    pub fn render(&mut self, now: DateTime<Utc>) -> Vec<FeedItem> {
        let snapshot: Snapshot<R> = self.subscription.latest();
        render_records(snapshot.iter().map(Arc::as_ref), self.filter, now)
    }

    /// Unread records in the latest snapshot, ignoring the filter.
    pub fn unread_count(&self) -> usize {
        self.subscription.current().iter().filter(|r| !r.read()).count()
    }

    pub fn has_changed(&self) -> bool {
        self.subscription.has_changed()
    }

    pub async fn changed(&mut self) -> bool {
        self.subscription.changed().await
    }
}
