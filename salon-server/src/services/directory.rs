//! Directory Service - 员工 / 预约 / 服务
//!
//! 资源提供者：返回完整集合，由 API 层交给 `AccessGate::visible_subset` 过滤。

use std::sync::Arc;

use salon_access::StaffIndex;
use shared::models::{Appointment, Service, StaffMember};

#[derive(Debug, Clone)]
pub struct DirectoryService {
    staff: Arc<Vec<StaffMember>>,
    appointments: Arc<Vec<Appointment>>,
    services: Arc<Vec<Service>>,
    /// 员工 → 门店/上门服务 (跨门店规则使用)
    staff_index: Arc<StaffIndex>,
}

impl DirectoryService {
    pub fn new(staff: Vec<StaffMember>, appointments: Vec<Appointment>, services: Vec<Service>) -> Self {
        let staff_index = Arc::new(StaffIndex::from_members(&staff));
        Self {
            staff: Arc::new(staff),
            appointments: Arc::new(appointments),
            services: Arc::new(services),
            staff_index,
        }
    }

    /// 在职员工
    pub fn active_staff(&self) -> impl Iterator<Item = &StaffMember> {
        self.staff.iter().filter(|s| s.is_active)
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// 包含停用员工
    pub fn staff_index(&self) -> &StaffIndex {
        &self.staff_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{LocationId, StaffId};

    #[test]
    fn test_inactive_staff_hidden_but_indexed() {
        let staff = vec![
            StaffMember {
                id: StaffId::new("s1"),
                name: "Ana".into(),
                job_role: None,
                locations: [LocationId::new("loc1")].into(),
                offers_home_service: true,
                is_active: true,
            },
            StaffMember {
                id: StaffId::new("s2"),
                name: "Bo".into(),
                job_role: None,
                locations: [LocationId::new("loc2")].into(),
                offers_home_service: false,
                is_active: false,
            },
        ];
        let directory = DirectoryService::new(staff, Vec::new(), Vec::new());

        assert_eq!(directory.active_staff().count(), 1);
        assert_eq!(directory.staff_index().len(), 2);
        assert!(directory.staff_index().get(&StaffId::new("s2")).is_some());
    }
}
