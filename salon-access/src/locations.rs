//! Active location snapshot
//!
//! The set of physical ids a grant or a query may legitimately reference.
//! Built by the location registry owner and replaced wholesale on change.

use std::collections::BTreeSet;

use shared::models::{LocationId, LocationRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSnapshot {
    version: u64,
    active: BTreeSet<LocationId>,
}

impl LocationSnapshot {
    pub fn new<I>(version: u64, active: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<LocationId>,
    {
        Self {
            version,
            active: active.into_iter().map(Into::into).collect(),
        }
    }

    /// Inactive records are left out
    pub fn from_records<'a>(version: u64, records: impl IntoIterator<Item = &'a LocationRecord>) -> Self {
        Self {
            version,
            active: records
                .into_iter()
                .filter(|record| record.is_active)
                .map(|record| record.id.clone())
                .collect(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn contains(&self, id: &LocationId) -> bool {
        self.active.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &LocationId> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, is_active: bool) -> LocationRecord {
        LocationRecord {
            id: LocationId::new(id),
            name: id.to_uppercase(),
            address: String::new(),
            is_active,
        }
    }

    #[test]
    fn test_from_records_skips_inactive() {
        let records = [record("loc1", true), record("loc2", false), record("loc3", true)];
        let snapshot = LocationSnapshot::from_records(4, &records);

        assert_eq!(snapshot.version(), 4);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains(&LocationId::new("loc1")));
        assert!(!snapshot.contains(&LocationId::new("loc2")));
        assert_eq!(
            snapshot.ids().map(LocationId::as_str).collect::<Vec<_>>(),
            vec!["loc1", "loc3"]
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = LocationSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(!snapshot.contains(&LocationId::new("loc1")));
    }
}
