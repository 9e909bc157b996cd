//! JWT 令牌服务
//!
//! 验证 Bearer 令牌并还原为 [`Principal`]。令牌签发只用于工具和测试；
//! 登录流程不在本服务内。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::models::{JobRole, LocationGrant, Principal, Role, UnknownRole};

/// 开发环境密钥字符集
const PRINTABLE_SECRET_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 指定密钥，其余取默认值 (测试/工具)
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: 60,
            issuer: "salon-server".to_string(),
            audience: "salon-clients".to_string(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using temporary key", e);
                    generate_secure_printable_jwt_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "salon-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "salon-clients".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 角色 ID (snake_case)
    pub role: String,
    /// 职位标签
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_role: Option<String>,
    /// 门店授权 (逗号分隔, "all" 表示全部)
    #[serde(default)]
    pub locations: String,
    /// 令牌类型
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("密钥生成失败: {0}")]
    KeyGenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成安全的 JWT 密钥
pub fn generate_secure_jwt_secret() -> Result<Vec<u8>, JwtError> {
    let rng = SystemRandom::new();
    let mut key = vec![0u8; 32]; // 256-bit key

    rng.fill(&mut key).map_err(|_| {
        JwtError::KeyGenerationFailed("Failed to generate secure random key".to_string())
    })?;

    Ok(key)
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> String {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        return "SalonServerDevelopmentSecureKey2026!ChangeMe".to_string();
    }

    bytes
        .iter()
        .map(|b| PRINTABLE_SECRET_CHARS[*b as usize % PRINTABLE_SECRET_CHARS.len()] as char)
        .collect()
}

/// 从环境变量加载 JWT 密钥
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() < 32 => Err(JwtError::ConfigError(
            "JWT_SECRET must be at least 32 characters long".to_string(),
        )),
        Ok(secret) => Ok(secret),
        Err(_) => Err(JwtError::ConfigError(
            "JWT_SECRET environment variable is not set".to_string(),
        )),
    }
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish()
    }
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为 principal 签发访问令牌
    pub fn generate_token(&self, principal: &Principal, username: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: principal.id.clone(),
            username: username.to_string(),
            role: principal.role.as_str().to_string(),
            job_role: principal.job_role.as_ref().map(|j| j.as_str().to_string()),
            locations: principal.location_grant.to_list(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建并注入请求扩展。权限不随令牌携带，
/// 每次请求由 `AccessGate` 根据当前快照解析。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub principal: Principal,
    /// 用户名
    pub username: String,
}

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.principal.id
    }

    pub fn role(&self) -> Role {
        self.principal.role
    }

    /// 管理员 (`admin` / `super_admin`)
    pub fn is_admin(&self) -> bool {
        self.principal.is_admin()
    }
}

/// 未知角色 → 拒绝令牌 (fail closed)
impl TryFrom<Claims> for CurrentUser {
    type Error = UnknownRole;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role: Role = claims.role.parse()?;
        let mut principal = Principal::new(claims.sub, role, LocationGrant::parse_list(&claims.locations));
        if let Some(job_role) = claims.job_role.filter(|j| !j.trim().is_empty()) {
            principal = principal.with_job_role(JobRole::new(job_role));
        }

        Ok(Self {
            principal,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::LocationRef;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::with_secret("test-secret-test-secret-test-secret!!"))
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let principal = Principal::new("user123", Role::Staff, LocationGrant::physical(["loc1", "loc2"]))
            .with_job_role("stylist");

        let token = service
            .generate_token(&principal, "jane")
            .expect("Failed to generate test token");
        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "jane");
        assert_eq!(claims.role, "staff");
        assert_eq!(claims.job_role.as_deref(), Some("stylist"));
        assert_eq!(claims.locations, "loc1,loc2");

        let user = CurrentUser::try_from(claims).unwrap();
        assert_eq!(user.principal, principal);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let principal = Principal::new("u", Role::Client, LocationGrant::none());
        let token = service().generate_token(&principal, "c").unwrap();

        let other = JwtService::with_config(JwtConfig::with_secret("another-secret-another-secret-1234"));
        assert!(matches!(other.validate_token(&token), Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let service = service();
        let principal = Principal::new("u", Role::Staff, LocationGrant::none());
        let token = service.generate_token(&principal, "u").unwrap();
        let mut claims = service.validate_token(&token).unwrap();
        claims.role = "owner".to_string();

        assert!(CurrentUser::try_from(claims).is_err());
    }

    #[test]
    fn test_claims_grant_parsing() {
        let service = service();
        let admin = Principal::new("a", Role::SuperAdmin, LocationGrant::All);
        let claims = service.validate_token(&service.generate_token(&admin, "root").unwrap()).unwrap();
        assert_eq!(claims.locations, "all");

        let mut user = CurrentUser::try_from(claims).unwrap();
        assert!(user.is_admin());
        assert!(user.principal.location_grant.is_all());

        user.principal.location_grant = LocationGrant::parse_list("loc1,home");
        let LocationGrant::Only(refs) = &user.principal.location_grant else {
            panic!("expected a finite grant");
        };
        assert!(refs.contains(&LocationRef::Home));
    }

    #[test]
    fn test_secure_key_generation() {
        let key1 = generate_secure_jwt_secret().expect("Failed to generate first secure key");
        let key2 = generate_secure_jwt_secret().expect("Failed to generate second secure key");

        assert_ne!(key1, key2);
        assert_eq!(key1.len(), 32);

        let printable = generate_secure_printable_jwt_secret();
        assert_eq!(printable.len(), 64);
        assert!(printable.bytes().all(|b| PRINTABLE_SECRET_CHARS.contains(&b)));
    }
}
