use std::sync::Arc;

use dashmap::DashMap;
use salon_access::{AccessGate, PermissionRegistry};

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::services::{DirectoryService, LocationService, RoleOverrideService, SeedData};

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。
/// 每种资源类型 (门店、角色) 维护独立的版本号，快照携带构建时的版本。
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 创建空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    ///
    /// 如果资源不存在，从 0 开始递增（返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    ///
    /// 如果资源不存在，返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | registry | Arc<PermissionRegistry> | 权限表快照 |
/// | locations | LocationService | 门店注册表 |
/// | roles | RoleOverrideService | 自定义角色覆盖 |
/// | directory | DirectoryService | 员工/预约/服务 |
/// | resource_versions | Arc<ResourceVersions> | 资源版本管理 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub jwt_service: Arc<JwtService>,
    pub registry: Arc<PermissionRegistry>,
    pub locations: LocationService,
    pub roles: RoleOverrideService,
    pub directory: DirectoryService,
    pub resource_versions: Arc<ResourceVersions>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 配置了 `SEED_FILE` 时从种子数据加载，否则以空目录启动
    pub fn initialize(config: &Config) -> Result<Self> {
        let seed = match &config.seed_file {
            Some(path) => SeedData::load(path)?,
            None => {
                tracing::warn!("SEED_FILE not set, starting with an empty directory");
                SeedData::default()
            }
        };
        Ok(Self::from_seed(config, seed))
    }

    /// 从种子数据构建状态 (测试常用)
    pub fn from_seed(config: &Config, seed: SeedData) -> Self {
        let resource_versions = Arc::new(ResourceVersions::new());
        let locations = LocationService::new(seed.locations, resource_versions.clone());
        let roles = RoleOverrideService::new(seed.roles, resource_versions.clone());
        let directory = DirectoryService::new(seed.staff, seed.appointments, seed.services);

        Self {
            config: config.clone(),
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            registry: Arc::new(PermissionRegistry::builtin()),
            locations,
            roles,
            directory,
            resource_versions,
        }
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// 以当前快照构建访问控制门面
    pub fn access_gate(&self) -> AccessGate {
        AccessGate::new(self.registry.clone(), self.roles.source(), self.locations.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;

    #[test]
    fn test_resource_versions() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("location"), 0);
        assert_eq!(versions.increment("location"), 1);
        assert_eq!(versions.increment("location"), 2);
        assert_eq!(versions.get("role"), 0);
    }

    #[test]
    fn test_gate_tracks_location_changes() {
        let config = Config::with_overrides("/tmp/salon-test", 0, JwtConfig::with_secret("state-test-secret-state-test-secret"));
        let seed = SeedData::from_json(r#"{ "locations": [{ "id": "loc1", "name": "Centre" }] }"#).unwrap();
        let state = ServerState::from_seed(&config, seed);

        let before = state.access_gate();
        state
            .locations
            .deactivate(&shared::models::LocationId::new("loc1"))
            .unwrap();
        let after = state.access_gate();

        assert_eq!(before.locations().len(), 1);
        assert!(after.locations().is_empty());
        assert!(after.locations().version() > before.locations().version());
    }
}
