//! 代理安装记录读取（HKLM）。
//!
//! 说明：
//! - 安装记录由外部安装程序写入；本模块只读
//! - 键不存在或缺少版本号时视为“未安装”
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use netagent_core::config::RecordLocation;
use netagent_core::host::PriorInstallationRecord;
use winreg::enums::HKEY_LOCAL_MACHINE;
use winreg::RegKey;

/// 读取安装记录。
///
/// 参数：
/// - `location`：记录所在子键与值名
///
/// 返回值：
/// - `Ok(Some(_))`：存在带版本号的记录
/// - `Ok(None)`：键不存在或版本号为空
///
/// 异常处理：
/// - 除“不存在”以外的读取失败返回错误
pub fn read_record(location: &RecordLocation) -> Result<Option<PriorInstallationRecord>> {
    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key = match hklm.open_subkey(&location.key) {
        Ok(key) => key,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("打开安装记录注册表键失败: HKLM\\{}", location.key))
        }
    };
    let Some(version) = read_sz(&key, &location.version_value)? else {
        return Ok(None);
    };
    let install_directory = read_sz(&key, &location.install_directory_value)?.unwrap_or_default();
    let data_directory = read_sz(&key, &location.data_directory_value)?.unwrap_or_default();
    Ok(Some(PriorInstallationRecord {
        version,
        install_directory: PathBuf::from(install_directory),
        data_directory: PathBuf::from(data_directory),
    }))
}

/// 读取字符串值；不存在或为空返回 `None`。
fn read_sz(key: &RegKey, name: &str) -> Result<Option<String>> {
    match key.get_value::<String, _>(name) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(v.trim().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("读取注册表值失败: {name}")),
    }
}
