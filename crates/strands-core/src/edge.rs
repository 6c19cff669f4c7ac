//! Edge store: owns every edge record

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{btree_set, BTreeSet};

use crate::attr::Attributes;
use crate::error::{Error, Result};
use crate::ids::{CoupleKey, EdgeId};
use crate::time::Timestamp;

/// Iteration order for time-ordered scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

/// A stored edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub couple: CoupleKey,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Owner of edge payloads, addressed by [`EdgeId`]
///
/// Ids are never reused. Two secondary indexes give time-ordered scans in
/// either direction; ties are broken by insertion order in both.
#[derive(Debug, Clone, Default)]
pub struct EdgeStore {
    records: Vec<Option<EdgeRecord>>,
    by_time: BTreeSet<(Timestamp, EdgeId)>,
    newest_first: BTreeSet<(Reverse<Timestamp>, EdgeId)>,
    live: usize,
}

impl EdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live edges
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Store a new edge; attribute values are kept as given
    pub fn insert(
        &mut self,
        couple: CoupleKey,
        timestamp: Timestamp,
        attributes: Attributes,
    ) -> EdgeId {
        let id = EdgeId::from_raw(self.records.len() as u64);
        self.records.push(Some(EdgeRecord {
            couple,
            timestamp,
            attributes,
        }));
        self.by_time.insert((timestamp, id));
        self.newest_first.insert((Reverse(timestamp), id));
        self.live += 1;
        id
    }

    pub fn get(&self, id: EdgeId) -> Result<&EdgeRecord> {
        self.records
            .get(id.slot())
            .and_then(Option::as_ref)
            .ok_or(Error::EdgeNotFound(id))
    }

    pub fn contains(&self, id: EdgeId) -> bool {
        self.get(id).is_ok()
    }

    pub fn remove(&mut self, id: EdgeId) -> Result<EdgeRecord> {
        let record = self
            .records
            .get_mut(id.slot())
            .and_then(Option::take)
            .ok_or(Error::EdgeNotFound(id))?;
        self.by_time.remove(&(record.timestamp, id));
        self.newest_first.remove(&(Reverse(record.timestamp), id));
        self.live -= 1;
        Ok(record)
    }

    /// Edge ids ordered by timestamp, ties in insertion order
    ///
    /// `Descending` puts later timestamps first but still yields edges
    /// sharing a timestamp oldest first. The iterator borrows the store;
    /// call again to restart.
    pub fn iterate_by_time(&self, order: Order) -> ByTime<'_> {
        let inner = match order {
            Order::Ascending => TimeIter::Oldest(self.by_time.iter()),
            Order::Descending => TimeIter::Newest(self.newest_first.iter()),
        };
        ByTime { inner }
    }

    /// Live edges in creation order
    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, &EdgeRecord)> + '_ {
        self.records.iter().enumerate().filter_map(|(i, r)| {
            r.as_ref().map(|record| (EdgeId::from_raw(i as u64), record))
        })
    }

    /// Drop every edge while keeping the id cursor
    pub fn clear(&mut self) {
        for record in self.records.iter_mut() {
            *record = None;
        }
        self.by_time.clear();
        self.newest_first.clear();
        self.live = 0;
    }
}

/// Time-ordered edge ids, see [`EdgeStore::iterate_by_time`]
#[derive(Debug, Clone)]
pub struct ByTime<'a> {
    inner: TimeIter<'a>,
}

#[derive(Debug, Clone)]
enum TimeIter<'a> {
    Oldest(btree_set::Iter<'a, (Timestamp, EdgeId)>),
    Newest(btree_set::Iter<'a, (Reverse<Timestamp>, EdgeId)>),
}

impl Iterator for ByTime<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        match &mut self.inner {
            TimeIter::Oldest(iter) => iter.next().map(|(_, id)| *id),
            TimeIter::Newest(iter) => iter.next().map(|(_, id)| *id),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            TimeIter::Oldest(iter) => iter.size_hint(),
            TimeIter::Newest(iter) => iter.size_hint(),
        }
    }
}

impl DoubleEndedIterator for ByTime<'_> {
    fn next_back(&mut self) -> Option<EdgeId> {
        match &mut self.inner {
            TimeIter::Oldest(iter) => iter.next_back().map(|(_, id)| *id),
            TimeIter::Newest(iter) => iter.next_back().map(|(_, id)| *id),
        }
    }
}

impl ExactSizeIterator for ByTime<'_> {}
