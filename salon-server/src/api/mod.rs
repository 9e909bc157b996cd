//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 当前用户信息
//! - [`role`] - 角色权限管理
//! - [`locations`] - 门店列表、切换选项、门店维护
//! - [`staff`] - 员工列表
//! - [`appointments`] - 预约列表
//! - [`services`] - 服务列表
//!
//! 列表接口的顺序固定：先 `require_permission` 做动作检查，
//! 再由处理器调用 `AccessGate::visible_subset` 过滤结果。

pub mod appointments;
pub mod auth;
pub mod health;
pub mod locations;
pub mod role;
pub mod services;
pub mod staff;

use serde::Deserialize;
use shared::models::LocationRef;

pub use shared::{AppError, AppResult};

/// `?location=` 查询参数
///
/// 缺省或空白视为 `all`；`home` / `online` 不区分大小写，其余为门店 ID。
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub location: Option<String>,
}

impl LocationQuery {
    pub fn location_ref(&self) -> LocationRef {
        self.location
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(LocationRef::All)
    }
}
