//! Rank-ordered service registry
//!
//! Every pluggable strategy is held in a [`RankedServices`] list. Services
//! can be bound and unbound at any time from any thread; readers take a
//! [`Snapshot`] and iterate it without ever seeing a partially updated list.

use arc_swap::ArcSwap;
use caconfig_resource::{ValueMap, ValueMapExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Service property carrying the declared rank.
pub const SERVICE_RANKING: &str = "service.ranking";

struct Entry<T: ?Sized> {
    service: Arc<T>,
    ranking: i64,
    /// Registration order, used to break ranking ties
    sequence: u64,
}

impl<T: ?Sized> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            ranking: self.ranking,
            sequence: self.sequence,
        }
    }
}

/// Services ordered by descending ranking, ties in registration order.
///
/// # Example
///
/// ```
/// use caconfig_meta::RankedServices;
/// use std::sync::Arc;
///
/// let services: RankedServices<str> = RankedServices::new();
/// services.bind_ranked(Arc::from("low"), 0);
/// services.bind_ranked(Arc::from("high"), 100);
///
/// let snapshot = services.snapshot();
/// let order: Vec<&str> = snapshot.iter().map(|s| &**s).collect();
/// assert_eq!(order, vec!["high", "low"]);
/// ```
pub struct RankedServices<T: ?Sized> {
    entries: ArcSwap<Vec<Entry<T>>>,
    next_sequence: AtomicU64,
}

impl<T: ?Sized> Default for RankedServices<T> {
    fn default() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Vec::new()),
            next_sequence: AtomicU64::new(0),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for RankedServices<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rankings: Vec<i64> = self.entries.load().iter().map(|e| e.ranking).collect();
        f.debug_struct("RankedServices")
            .field("rankings", &rankings)
            .finish()
    }
}

impl<T: ?Sized> RankedServices<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a service, reading its rank from the `service.ranking` property
    /// (default 0).
    pub fn bind(&self, service: Arc<T>, properties: &ValueMap) {
        let ranking = properties.get_i64(SERVICE_RANKING).unwrap_or(0);
        self.bind_ranked(service, ranking);
    }

    /// Bind a service with an explicit rank.
    pub fn bind_ranked(&self, service: Arc<T>, ranking: i64) {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let entry = Entry {
            service,
            ranking,
            sequence,
        };
        self.entries.rcu(|current| {
            let mut next: Vec<Entry<T>> = current.iter().cloned().collect();
            let position = next
                .iter()
                .position(|e| {
                    e.ranking < entry.ranking
                        || (e.ranking == entry.ranking && e.sequence > entry.sequence)
                })
                .unwrap_or(next.len());
            next.insert(position, entry.clone());
            next
        });
        tracing::trace!(ranking, sequence, "Bound service");
    }

    /// Remove a service by identity. Returns `false` if it was not bound.
    pub fn unbind(&self, service: &Arc<T>) -> bool {
        let mut removed = false;
        self.entries.rcu(|current| {
            let next: Vec<Entry<T>> = current
                .iter()
                .filter(|e| !std::ptr::addr_eq(Arc::as_ptr(&e.service), Arc::as_ptr(service)))
                .cloned()
                .collect();
            removed = next.len() != current.len();
            next
        });
        removed
    }

    /// Consistent view of the currently bound services.
    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            entries: self.entries.load_full(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}

/// Immutable view of a [`RankedServices`] list at one point in time.
pub struct Snapshot<T: ?Sized> {
    entries: Arc<Vec<Entry<T>>>,
}

impl<T: ?Sized> Snapshot<T> {
    /// Services, highest rank first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<T>> + ExactSizeIterator {
        self.entries.iter().map(|e| &e.service)
    }

    /// Services paired with their rank, highest rank first.
    pub fn iter_ranked(&self) -> impl DoubleEndedIterator<Item = (&Arc<T>, i64)> {
        self.entries.iter().map(|e| (&e.service, e.ranking))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(services: &RankedServices<str>) -> Vec<String> {
        services.snapshot().iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_orders_by_rank_then_registration() {
        let services: RankedServices<str> = RankedServices::new();
        services.bind_ranked(Arc::from("a"), 0);
        services.bind_ranked(Arc::from("b"), 10);
        services.bind_ranked(Arc::from("c"), 0);
        services.bind_ranked(Arc::from("d"), -5);
        services.bind_ranked(Arc::from("e"), 10);

        assert_eq!(names(&services), vec!["b", "e", "a", "c", "d"]);
    }

    #[test]
    fn test_bind_reads_ranking_property() {
        let services: RankedServices<str> = RankedServices::new();
        let props = json!({ "service.ranking": 2000 }).as_object().cloned().unwrap();
        services.bind(Arc::from("default"), &ValueMap::new());
        services.bind(Arc::from("legacy"), &props);

        assert_eq!(names(&services), vec!["legacy", "default"]);
    }

    #[test]
    fn test_unbind_by_identity() {
        let services: RankedServices<str> = RankedServices::new();
        let first: Arc<str> = Arc::from("same");
        let second: Arc<str> = Arc::from("same");
        services.bind_ranked(first.clone(), 0);
        services.bind_ranked(second.clone(), 0);

        assert!(services.unbind(&second));
        assert!(!services.unbind(&second));
        assert_eq!(services.len(), 1);
        assert!(Arc::ptr_eq(services.snapshot().iter().next().unwrap(), &first));
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_binds() {
        let services: RankedServices<str> = RankedServices::new();
        services.bind_ranked(Arc::from("a"), 0);
        let snapshot = services.snapshot();
        services.bind_ranked(Arc::from("b"), 1);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(services.len(), 2);
    }
}
