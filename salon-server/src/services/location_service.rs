//! Location Service - 门店注册表与活跃快照缓存
//!
//! 访问控制核心只读取 [`LocationSnapshot`]。快照在首次读取时构建并缓存，
//! 任何修改门店记录的操作都会显式调用 [`LocationService::invalidate`]。

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use salon_access::LocationSnapshot;
use shared::models::{LocationId, LocationRecord, LocationUpsert};
use shared::{AppError, AppResult, ErrorCode};

use crate::core::ResourceVersions;

/// 版本计数器中的资源名
pub const LOCATION_RESOURCE: &str = "location";

#[derive(Clone)]
pub struct LocationService {
    /// 全部门店 (含停用)
    records: Arc<RwLock<BTreeMap<LocationId, LocationRecord>>>,
    /// 活跃门店快照缓存
    snapshot: Arc<RwLock<Option<Arc<LocationSnapshot>>>>,
    versions: Arc<ResourceVersions>,
}

impl std::fmt::Debug for LocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationService")
            .field("records", &self.records.read().len())
            .field("cached", &self.snapshot.read().is_some())
            .field("version", &self.versions.get(LOCATION_RESOURCE))
            .finish()
    }
}

impl LocationService {
    pub fn new(records: Vec<LocationRecord>, versions: Arc<ResourceVersions>) -> Self {
        versions.increment(LOCATION_RESOURCE);
        Self {
            records: Arc::new(RwLock::new(
                records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            )),
            snapshot: Arc::new(RwLock::new(None)),
            versions,
        }
    }

    /// 当前活跃门店快照 (缓存)
    pub fn snapshot(&self) -> Arc<LocationSnapshot> {
        if let Some(snapshot) = self.snapshot.read().as_ref() {
            return snapshot.clone();
        }

        let mut cache = self.snapshot.write();
        // another writer may have filled it
        if let Some(snapshot) = cache.as_ref() {
            return snapshot.clone();
        }

        let records = self.records.read();
        let snapshot = Arc::new(LocationSnapshot::from_records(
            self.versions.get(LOCATION_RESOURCE),
            records.values(),
        ));
        tracing::debug!(
            version = snapshot.version(),
            active = snapshot.len(),
            "Location snapshot rebuilt"
        );
        *cache = Some(snapshot.clone());
        snapshot
    }

    /// 丢弃缓存快照并递增版本号
    pub fn invalidate(&self) {
        let version = self.versions.increment(LOCATION_RESOURCE);
        *self.snapshot.write() = None;
        tracing::debug!(version, "Location snapshot invalidated");
    }

    /// 全部门店 (含停用)
    pub fn list(&self) -> Vec<LocationRecord> {
        self.records.read().values().cloned().collect()
    }

    pub fn get(&self, id: &LocationId) -> Option<LocationRecord> {
        self.records.read().get(id).cloned()
    }

    /// 创建或更新门店
    ///
    /// `all` / `home` / `online` 为保留标识，不能作为门店 ID。
    pub fn upsert(&self, id: LocationId, payload: LocationUpsert) -> AppResult<LocationRecord> {
        if id.as_str().trim().is_empty() {
            return Err(AppError::validation("Location id must not be empty"));
        }
        if id.is_reserved() {
            return Err(AppError::with_message(
                ErrorCode::LocationIdReserved,
                format!("Location id '{}' is reserved", id),
            )
            .with_detail("location_id", id.as_str()));
        }
        if payload.name.trim().is_empty() {
            return Err(AppError::validation("Location name must not be empty"));
        }

        let record = {
            let mut records = self.records.write();
            let is_active = payload
                .is_active
                .or_else(|| records.get(&id).map(|r| r.is_active))
                .unwrap_or(true);
            let record = LocationRecord {
                id: id.clone(),
                name: payload.name,
                address: payload.address,
                is_active,
            };
            records.insert(id, record.clone());
            record
        };

        self.invalidate();
        Ok(record)
    }

    /// 停用门店 (记录保留，从快照中移除)
    pub fn deactivate(&self, id: &LocationId) -> AppResult<LocationRecord> {
        let record = {
            let mut records = self.records.write();
            let record = records
                .get_mut(id)
                .ok_or_else(|| AppError::location_not_found(id.as_str()))?;
            record.is_active = false;
            record.clone()
        };

        self.invalidate();
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> LocationRecord {
        LocationRecord {
            id: LocationId::new(id),
            name: id.to_uppercase(),
            address: String::new(),
            is_active: true,
        }
    }

    fn service() -> LocationService {
        LocationService::new(vec![record("loc1"), record("loc2")], Arc::new(ResourceVersions::new()))
    }

    #[test]
    fn test_snapshot_is_cached_until_invalidated() {
        let service = service();
        let first = service.snapshot();
        let second = service.snapshot();
        assert!(Arc::ptr_eq(&first, &second));

        service.invalidate();
        let third = service.snapshot();
        assert!(!Arc::ptr_eq(&first, &third));
        assert!(third.version() > first.version());
    }

    #[test]
    fn test_upsert_invalidates_snapshot() {
        let service = service();
        let before = service.snapshot();
        assert!(!before.contains(&LocationId::new("loc3")));

        service
            .upsert(
                LocationId::new("loc3"),
                LocationUpsert {
                    name: "Harbour".into(),
                    address: "1 Quay St".into(),
                    is_active: None,
                },
            )
            .unwrap();

        let after = service.snapshot();
        assert!(after.contains(&LocationId::new("loc3")));
        // the old snapshot is untouched
        assert!(!before.contains(&LocationId::new("loc3")));
    }

    #[test]
    fn test_upsert_keeps_active_flag_when_omitted() {
        let service = service();
        service.deactivate(&LocationId::new("loc2")).unwrap();

        let updated = service
            .upsert(
                LocationId::new("loc2"),
                LocationUpsert {
                    name: "Renamed".into(),
                    address: String::new(),
                    is_active: None,
                },
            )
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.name, "Renamed");
    }

    #[test]
    fn test_reserved_ids_rejected() {
        let service = service();
        for id in ["all", "Home", "ONLINE"] {
            let err = service
                .upsert(
                    LocationId::new(id),
                    LocationUpsert {
                        name: "x".into(),
                        address: String::new(),
                        is_active: None,
                    },
                )
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::LocationIdReserved);
        }
    }

    #[test]
    fn test_deactivate() {
        let service = service();
        let record = service.deactivate(&LocationId::new("loc1")).unwrap();
        assert!(!record.is_active);
        assert!(!service.snapshot().contains(&LocationId::new("loc1")));
        assert_eq!(service.list().len(), 2);

        let err = service.deactivate(&LocationId::new("nope")).unwrap_err();
        assert_eq!(err.code, ErrorCode::LocationNotFound);
    }
}
