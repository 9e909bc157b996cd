//! Role Override Service - 自定义角色权限覆盖
//!
//! 保存 [`CustomRole`] 记录，并向访问控制核心提供一个不可变的
//! [`RoleOverrideSource`] 快照。每次修改都会替换整个快照。

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use salon_access::{RoleOverrideSource, RoleOverrides};
use shared::models::{CustomRole, Role, RolePermissionsUpdate};
use shared::{AppError, AppResult, ErrorCode};

use crate::core::ResourceVersions;

pub const ROLE_RESOURCE: &str = "role";

#[derive(Clone)]
pub struct RoleOverrideService {
    /// role id (lowercase) → record
    roles: Arc<RwLock<BTreeMap<String, CustomRole>>>,
    source: Arc<RwLock<Arc<dyn RoleOverrideSource>>>,
    versions: Arc<ResourceVersions>,
}

impl std::fmt::Debug for RoleOverrideService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleOverrideService")
            .field("roles", &self.roles.read().len())
            .field("version", &self.versions.get(ROLE_RESOURCE))
            .finish()
    }
}

impl RoleOverrideService {
    pub fn new(roles: Vec<CustomRole>, versions: Arc<ResourceVersions>) -> Self {
        let roles: BTreeMap<String, CustomRole> = roles
            .into_iter()
            .map(|mut r| {
                r.name = r.name.trim().to_lowercase();
                (r.name.clone(), r)
            })
            .collect();
        let source: Arc<dyn RoleOverrideSource> = Arc::new(RoleOverrides::from_custom_roles(roles.values()));
        versions.increment(ROLE_RESOURCE);

        Self {
            roles: Arc::new(RwLock::new(roles)),
            source: Arc::new(RwLock::new(source)),
            versions,
        }
    }

    /// 使用外部覆盖来源 (例如远端角色存储)
    pub fn with_source(self, source: Arc<dyn RoleOverrideSource>) -> Self {
        *self.source.write() = source;
        self
    }

    /// 当前覆盖快照
    pub fn source(&self) -> Arc<dyn RoleOverrideSource> {
        self.source.read().clone()
    }

    pub fn list(&self) -> Vec<CustomRole> {
        self.roles.read().values().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<CustomRole> {
        self.roles.read().get(&name.trim().to_lowercase()).cloned()
    }

    /// 更新 (或创建) 某角色的权限覆盖
    ///
    /// 只允许内置的非管理员角色；空列表表示回退到默认角色表。
    pub fn update_permissions(&self, name: &str, update: RolePermissionsUpdate) -> AppResult<CustomRole> {
        let role: Role = name.parse().map_err(|_| {
            AppError::with_message(ErrorCode::RoleNotFound, format!("Role {} not found", name))
                .with_detail("role", name)
        })?;
        if role.is_admin() {
            return Err(AppError::with_message(
                ErrorCode::RoleIsSystem,
                format!("Role {} cannot be modified", role),
            ));
        }

        let key = role.as_str().to_string();
        let record = {
            let mut roles = self.roles.write();
            let record = roles.entry(key.clone()).or_insert_with(|| CustomRole {
                name: key.clone(),
                description: None,
                permissions: Vec::new(),
                is_active: true,
            });
            record.permissions = update.permissions;
            if update.description.is_some() {
                record.description = update.description;
            }
            let record = record.clone();

            *self.source.write() = Arc::new(RoleOverrides::from_custom_roles(roles.values()));
            record
        };

        let version = self.versions.increment(ROLE_RESOURCE);
        tracing::debug!(role = %key, version, "Role override snapshot replaced");
        Ok(record)
    }
}
