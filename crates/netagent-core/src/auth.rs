//! 下载服务认证头。
//!
//! 格式：
//! - `Authorization: <base64(user_name:service_key)>`（服务端约定：不带 `Basic ` 前缀）
//! - `API-Key: <api_key>`
//! - `Accept: application/json`
//!
//! 安全注意：
//! - 认证头包含密钥，`Debug` 输出会脱敏，不应写入日志
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::credentials::Credentials;

pub const AUTHORIZATION: &str = "Authorization";
pub const API_KEY: &str = "API-Key";
pub const ACCEPT: &str = "Accept";
pub const ACCEPT_JSON: &str = "application/json";

/// 一次下载请求所需的认证头。
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    authorization: String,
    api_key: String,
}

impl AuthHeaders {
    /// 根据完整凭据生成认证头。
    pub fn from_credentials(credentials: &Credentials) -> Self {
        let token = STANDARD.encode(format!(
            "{}:{}",
            credentials.user_name(),
            credentials.service_key()
        ));
        Self {
            authorization: token,
            api_key: credentials.api_key().to_string(),
        }
    }

    /// 全部请求头（名称, 值）。
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (AUTHORIZATION, self.authorization.as_str()),
            (API_KEY, self.api_key.as_str()),
            (ACCEPT, ACCEPT_JSON),
        ]
    }
}

impl fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("authorization", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
