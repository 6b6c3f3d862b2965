//! 凭据来源：统一的 `read(field) -> Option<String>` 能力，由解析器按优先级组合。
//!
//! 来源（优先级从高到低）：
//! - [`ExplicitSource`]：命令行显式传入的值
//! - [`YamlConfigSource`]：数据目录下的结构化配置（`contrast_security.yaml`）
//! - [`LegacyConfigSource`]：安装目录下的旧版配置（`DotnetAgentService.exe.config`）
//!
//! 异常处理：
//! - 文件不存在或读取失败时不构造来源（`open` 返回 `None`）
//! - 文件内容格式不正确时，对应字段读取结果为 `None`，不报错
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::credentials::{CredentialField, PartialCredentials};
use crate::inventory::xml_attributes;

/// 单个凭据来源。
pub trait CredentialSource {
    /// 来源描述（用于日志）。
    fn describe(&self) -> String;

    /// 读取指定字段；缺失或为空时返回 `None`。
    fn read(&self, field: CredentialField) -> Option<String>;
}

/// 显式传入的值。
pub struct ExplicitSource<'a>(pub &'a PartialCredentials);

impl CredentialSource for ExplicitSource<'_> {
    fn describe(&self) -> String {
        "命令行参数".to_string()
    }

    fn read(&self, field: CredentialField) -> Option<String> {
        self.0.get(field).map(str::to_string)
    }
}

/// 读取文本文件；不存在或读取失败时返回 `None`。
fn read_optional(path: &Path) -> Option<String> {
    if !path.is_file() {
        debug!("配置文件不存在: {}", path.display());
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            warn!("读取配置文件失败，跳过: {}: {e}", path.display());
            None
        }
    }
}

/// 结构化（YAML）配置文件，按行匹配 `key: value`。
///
/// 同一键出现多次时取第一次出现的值。
pub struct YamlConfigSource {
    path: PathBuf,
    content: String,
}

impl YamlConfigSource {
    /// 打开配置文件；不存在或不可读时返回 `None`。
    pub fn open(path: &Path) -> Option<Self> {
        read_optional(path).map(|content| Self {
            path: path.to_path_buf(),
            content,
        })
    }

    fn key(field: CredentialField) -> &'static str {
        match field {
            CredentialField::ApiUrl => "url",
            CredentialField::ApiKey => "api_key",
            CredentialField::ServiceKey => "service_key",
            CredentialField::UserName => "user_name",
        }
    }
}

fn yaml_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Za-z0-9_]+)\s*:\s*(.*?)\s*$").expect("valid regex"))
}

/// 去掉行尾注释与成对引号。
fn clean_yaml_scalar(raw: &str) -> &str {
    let value = raw.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) {
            if let Some(end) = value[1..].find(quote) {
                return &value[1..1 + end];
            }
        }
    }
    match value.find(" #") {
        Some(idx) => value[..idx].trim_end(),
        None if value.starts_with('#') => "",
        None => value,
    }
}

impl CredentialSource for YamlConfigSource {
    fn describe(&self) -> String {
        format!("结构化配置 {}", self.path.display())
    }

    fn read(&self, field: CredentialField) -> Option<String> {
        let key = Self::key(field);
        self.content
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .filter_map(|line| yaml_line().captures(line))
            .find(|c| &c[1] == key)
            .map(|c| clean_yaml_scalar(c.get(2).map_or("", |m| m.as_str())).to_string())
            .filter(|v| !v.is_empty())
    }
}

/// 旧版（XML）配置文件，读取 `<appSettings>` 中的 `<add key="..." value="..."/>`。
pub struct LegacyConfigSource {
    path: PathBuf,
    content: String,
}

impl LegacyConfigSource {
    /// 打开旧版配置文件；不存在或不可读时返回 `None`。
    pub fn open(path: &Path) -> Option<Self> {
        read_optional(path).map(|content| Self {
            path: path.to_path_buf(),
            content,
        })
    }

    fn key(field: CredentialField) -> &'static str {
        match field {
            CredentialField::ApiUrl => "TeamServerUrl",
            CredentialField::ApiKey => "TeamServerApiKey",
            CredentialField::ServiceKey => "TeamServerServiceKey",
            CredentialField::UserName => "TeamServerUserName",
        }
    }
}

fn add_element() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<add\s([^>]*)>").expect("valid regex"))
}

impl CredentialSource for LegacyConfigSource {
    fn describe(&self) -> String {
        format!("旧版配置 {}", self.path.display())
    }

    fn read(&self, field: CredentialField) -> Option<String> {
        let wanted = Self::key(field);
        for element in add_element().captures_iter(&self.content) {
            let attrs = xml_attributes(&element[1]);
            let is_wanted = attrs
                .iter()
                .any(|(k, v)| k.eq_ignore_ascii_case("key") && v.eq_ignore_ascii_case(wanted));
            if !is_wanted {
                continue;
            }
            return attrs
                .into_iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("value"))
                .map(|(_, v)| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
        None
    }
}
