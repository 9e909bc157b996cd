//! 服务层 - 访问控制核心的外部协作者
//!
//! - [`LocationService`] - 门店注册表 (带缓存的活跃快照，显式失效)
//! - [`RoleOverrideService`] - 自定义角色权限覆盖
//! - [`DirectoryService`] - 员工 / 预约 / 服务目录
//! - [`SeedData`] - JSON 种子数据

pub mod directory;
pub mod location_service;
pub mod role_overrides;
pub mod seed;

pub use directory::DirectoryService;
pub use location_service::LocationService;
pub use role_overrides::RoleOverrideService;
pub use seed::SeedData;
