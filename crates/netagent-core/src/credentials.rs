//! 凭据模型。
//!
//! - [`PartialCredentials`]：解析过程中逐字段填充的中间结果
//! - [`Credentials`]：校验完整后的最终凭据，构造后不再修改
//!
//! 安全注意：
//! - `api_key`/`service_key` 属于密钥，`Debug` 输出会脱敏，不应写入日志
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::InstallerConfig;
use crate::error::IncompleteCredentials;

/// 凭据字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialField {
    ApiUrl,
    ApiKey,
    ServiceKey,
    UserName,
}

impl CredentialField {
    /// 全部字段（固定顺序，用于遍历来源与输出缺失字段）。
    pub const ALL: [CredentialField; 4] = [
        CredentialField::ApiUrl,
        CredentialField::ApiKey,
        CredentialField::ServiceKey,
        CredentialField::UserName,
    ];

    /// 必填字段；`ApiUrl` 缺失时使用默认地址。
    pub const REQUIRED: [CredentialField; 3] = [
        CredentialField::ApiKey,
        CredentialField::ServiceKey,
        CredentialField::UserName,
    ];

    /// 面向用户的字段名（与命令行参数一致）。
    pub fn display_name(self) -> &'static str {
        match self {
            CredentialField::ApiUrl => "api-url",
            CredentialField::ApiKey => "api-key",
            CredentialField::ServiceKey => "service-key",
            CredentialField::UserName => "user-name",
        }
    }
}

/// 部分凭据：每个字段都可能缺失。
///
/// 空字符串（含仅空白）视为未设置。
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PartialCredentials {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub service_key: Option<String>,
    pub user_name: Option<String>,
}

impl PartialCredentials {
    /// 读取指定字段（仅返回非空值）。
    pub fn get(&self, field: CredentialField) -> Option<&str> {
        let slot = match field {
            CredentialField::ApiUrl => &self.api_url,
            CredentialField::ApiKey => &self.api_key,
            CredentialField::ServiceKey => &self.service_key,
            CredentialField::UserName => &self.user_name,
        };
        slot.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// 字段是否已有非空值。
    pub fn is_set(&self, field: CredentialField) -> bool {
        self.get(field).is_some()
    }

    /// 仅在字段未设置时填入值；已设置的字段保持不变。
    ///
    /// 返回值：
    /// - `true`：本次填入了值
    /// - `false`：字段已存在或 `value` 为空
    pub fn fill(&mut self, field: CredentialField, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.is_set(field) {
            return false;
        }
        let slot = match field {
            CredentialField::ApiUrl => &mut self.api_url,
            CredentialField::ApiKey => &mut self.api_key,
            CredentialField::ServiceKey => &mut self.service_key,
            CredentialField::UserName => &mut self.user_name,
        };
        *slot = Some(value.to_string());
        true
    }

    /// 尚未设置的字段（按 [`CredentialField::ALL`] 顺序）。
    pub fn unset_fields(&self) -> Vec<CredentialField> {
        CredentialField::ALL
            .into_iter()
            .filter(|f| !self.is_set(*f))
            .collect()
    }

    /// 尚未设置的必填字段。
    pub fn missing_required(&self) -> Vec<CredentialField> {
        CredentialField::REQUIRED
            .into_iter()
            .filter(|f| !self.is_set(*f))
            .collect()
    }

    /// 必填字段是否全部具备。
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// 所有字段（含 `ApiUrl`）是否都已设置；此时无需再查询更低优先级来源。
    pub fn is_saturated(&self) -> bool {
        self.unset_fields().is_empty()
    }

    /// 校验完整性并生成最终凭据。
    ///
    /// 参数：
    /// - `config`：用于规范化服务地址（缺失时取默认地址）
    ///
    /// 异常处理：
    /// - 任一必填字段缺失：返回 [`IncompleteCredentials`]，携带全部缺失字段
    pub fn finalize(&self, config: &InstallerConfig) -> Result<Credentials, IncompleteCredentials> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(IncompleteCredentials { missing });
        }
        let field = |f| self.get(f).unwrap_or_default().to_string();
        Ok(Credentials {
            api_url: config.normalize_url(self.get(CredentialField::ApiUrl)),
            api_key: field(CredentialField::ApiKey),
            service_key: field(CredentialField::ServiceKey),
            user_name: field(CredentialField::UserName),
        })
    }
}

impl fmt::Debug for PartialCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialCredentials")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("service_key", &self.service_key.as_ref().map(|_| "<redacted>"))
            .field("user_name", &self.user_name)
            .finish()
    }
}

/// 完整凭据：`api_key`/`service_key`/`user_name` 均非空，`api_url` 已规范化。
///
/// 只能通过 [`PartialCredentials::finalize`] 构造。
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_url: String,
    api_key: String,
    service_key: String,
    user_name: String,
}

impl Credentials {
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn service_key(&self) -> &str {
        &self.service_key
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("service_key", &"<redacted>")
            .field("user_name", &self.user_name)
            .finish()
    }
}
