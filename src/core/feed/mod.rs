// Alert and notification feed module.
//
// Architecture:
// - record.rs: Record types and the capability traits that pick a store's mutation set
// - store.rs: Generic record store with snapshot publishing
// - provider.rs: Scoped access to the session notification store
// - time.rs: Relative timestamp labels
// - classify.rs: Severity/priority/AQI presentation lookups
// - view.rs: Renders store snapshots into feed items

pub mod classify;
pub mod provider;
pub mod record;
pub mod store;
pub mod time;
pub mod view;
