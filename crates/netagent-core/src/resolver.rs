//! 凭据解析：按优先级逐字段合并多个来源，最后统一校验完整性。
//!
//! 优先级（从高到低）：
//! 1) 显式传入的值
//! 2) 已有安装数据目录下的结构化配置
//! 3) 已有安装目录下的旧版配置（仅填补前两者仍缺失的字段）
//!
//! 合并规则：
//! - 高优先级来源已填充的字段不会被低优先级来源覆盖
//! - 没有已有安装且显式值不完整时直接判定为不完整
//! - 安装记录中的目录为空或为相对路径时跳过对应来源
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::InstallerConfig;
use crate::credentials::{Credentials, PartialCredentials};
use crate::error::IncompleteCredentials;
use crate::host::PriorInstallationRecord;
use crate::sources::{CredentialSource, ExplicitSource, LegacyConfigSource, YamlConfigSource};

/// 凭据解析器。
pub struct CredentialResolver<'a> {
    config: &'a InstallerConfig,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(config: &'a InstallerConfig) -> Self {
        Self { config }
    }

    /// 解析得到完整凭据。
    ///
    /// 参数：
    /// - `explicit`：命令行显式传入的部分凭据
    /// - `prior`：已有安装记录（不存在则为 `None`）
    ///
    /// 返回值：
    /// - 成功：完整的 [`Credentials`]（服务地址已规范化）
    ///
    /// 异常处理：
    /// - 合并后仍缺必填字段：返回 [`IncompleteCredentials`]，携带缺失字段
    /// - 配置文件缺失/不可读/格式错误不会报错，仅使对应字段保持未设置
    pub fn resolve(
        &self,
        explicit: &PartialCredentials,
        prior: Option<&PriorInstallationRecord>,
    ) -> Result<Credentials, IncompleteCredentials> {
        let mut merged = PartialCredentials::default();
        merge_from(&mut merged, &ExplicitSource(explicit));

        let Some(prior) = prior else {
            if !merged.is_complete() {
                info!("未发现已有安装，且显式凭据不完整");
            }
            return merged.finalize(self.config);
        };

        let structured = config_file(&prior.data_directory, &self.config.structured_config_file)
            .and_then(|path| YamlConfigSource::open(&path));
        let legacy = config_file(&prior.install_directory, &self.config.legacy_config_file)
            .and_then(|path| LegacyConfigSource::open(&path));
        let fallbacks: Vec<&dyn CredentialSource> = [
            structured.as_ref().map(|s| s as &dyn CredentialSource),
            legacy.as_ref().map(|s| s as &dyn CredentialSource),
        ]
        .into_iter()
        .flatten()
        .collect();

        merge_sources(&mut merged, &fallbacks);
        merged.finalize(self.config)
    }
}

/// 已有安装目录下的配置文件路径。
///
/// 记录中的目录为空或不是绝对路径时返回 `None`，不会退化为相对当前工作目录的查找。
fn config_file(base: &Path, file_name: &str) -> Option<PathBuf> {
    if base.as_os_str().is_empty() || !base.is_absolute() {
        debug!("安装记录中的目录无效，跳过 {file_name}: {:?}", base);
        return None;
    }
    Some(base.join(file_name))
}

/// 依次从各来源填补未设置的字段；全部字段已设置后不再查询后续来源。
pub fn merge_sources(merged: &mut PartialCredentials, sources: &[&dyn CredentialSource]) {
    for source in sources {
        if merged.is_saturated() {
            break;
        }
        merge_from(merged, *source);
    }
}

fn merge_from(merged: &mut PartialCredentials, source: &dyn CredentialSource) {
    for field in merged.unset_fields() {
        if let Some(value) = source.read(field) {
            if merged.fill(field, &value) {
                debug!("{} 提供字段 {}", source.describe(), field.display_name());
            }
        }
    }
}
