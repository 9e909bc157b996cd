//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use salon_access::{AccessError, AccessGate};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后向请求扩展注入 [`CurrentUser`] 和本次请求的 [`AccessGate`]
/// (由当前快照构建，请求期间不变)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/health`
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 / 未知角色 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if path == "/api/health" {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let user = authenticate(state.get_jwt_service(), token, req.uri())?;
    let gate = state.access_gate();

    let stale = gate.grant_resolution(&user.principal).stale;
    if !stale.is_empty() {
        security_log!(
            "WARN",
            "stale_location_grant",
            user_id = user.id().to_string(),
            stale = format!("{:?}", stale)
        );
    }

    req.extensions_mut().insert(gate);
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 验证令牌并还原 [`CurrentUser`]
pub(crate) fn authenticate(jwt_service: &JwtService, token: &str, uri: &http::Uri) -> Result<CurrentUser, AppError> {
    let claims = match jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", uri)
            );

            return match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    CurrentUser::try_from(claims).map_err(|e| {
        security_log!(
            "WARN",
            "auth_unknown_role",
            error = format!("{}", e),
            uri = format!("{:?}", uri)
        );
        AppError::invalid_token(format!("Malformed JWT claims: {}", e))
    })
}

/// 权限检查中间件 - 要求特定权限
///
/// 通过 [`require_auth`] 注入的 [`AccessGate`] 解析权限；
/// 权限来源故障时拒绝请求 (503)，绝不回退到默认权限。
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/staff", get(handler::list))
///     .layer(middleware::from_fn(require_permission("view_staff")));
/// ```
///
/// # 错误
///
/// 无权限返回 403 Forbidden
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;
            let gate = req
                .extensions()
                .get::<AccessGate>()
                .ok_or_else(|| AppError::internal("Access gate not initialized"))?;

            if let Err(e) = gate.ensure_permission(&user.principal, permission) {
                match &e {
                    AccessError::OverrideSource { role, source } => {
                        security_log!(
                            "ERROR",
                            "permission_source_unavailable",
                            user_id = user.id().to_string(),
                            role = role.as_str(),
                            error = source.to_string()
                        );
                    }
                    AccessError::PermissionDenied { .. } => {
                        security_log!(
                            "WARN",
                            "permission_denied",
                            user_id = user.id().to_string(),
                            username = user.username.clone(),
                            required_permission = permission
                        );
                    }
                }
                return Err(e.into());
            }

            Ok(next.run(req).await)
        })
    }
}
