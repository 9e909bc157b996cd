//! Salon Server - 多门店沙龙平台的 HTTP 服务
//!
//! # 架构概述
//!
//! 访问控制核心 (`salon-access`) 是纯函数库；本 crate 负责扮演它的外部协作者：
//!
//! - **认证** (`auth`): Bearer JWT → [`CurrentUser`] (内含 `Principal`)
//! - **服务** (`services`): 门店注册表、自定义角色覆盖、员工/预约/服务目录
//! - **HTTP API** (`api`): 列表接口先做权限检查，再做可见性过滤
//!
//! # 模块结构
//!
//! ```text
//! salon-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── auth/          # JWT 认证、中间件、提取器
//! ├── services/      # 门店、角色覆盖、目录、种子数据
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// Audit logging macro - 只记录触发点 (target = "audit")
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $resource:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "audit",
            action = $action,
            resource = $resource,
            $($key = $value),*
        );
    };
}

/// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env，初始化日志
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("WORK_DIR").ok().map(|dir| format!("{}/logs", dir));

    init_logger_with_file(&level, json, log_dir.as_deref())
}

pub fn print_banner() {
    println!(
        r#"
   _____       __
  / ___/____ _/ /___  ____
  \__ \/ __ `/ / __ \/ __ \
 ___/ / /_/ / / /_/ / / / /
/____/\__,_/_/\____/_/ /_/
    "#
    );
}
