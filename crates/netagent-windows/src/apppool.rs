//! 应用程序池枚举（通过 `appcmd.exe list apppool /xml`）。
//!
//! 说明：
//! - `appcmd.exe` 随 IIS 管理工具安装；不存在时视为查询组件不可用
//! - 输出解析由 `netagent_core::inventory` 完成
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::path::PathBuf;
use std::process::Command;

use anyhow::anyhow;
use netagent_core::error::InventoryError;
use netagent_core::host::ApplicationPoolInfo;
use netagent_core::inventory::parse_appcmd_apppools;

/// `appcmd.exe` 的默认位置：`%windir%\System32\inetsrv\appcmd.exe`。
pub fn appcmd_path() -> PathBuf {
    let windir = std::env::var_os("windir").unwrap_or_else(|| "C:\\Windows".into());
    PathBuf::from(windir)
        .join("System32")
        .join("inetsrv")
        .join("appcmd.exe")
}

/// 枚举本机全部应用程序池。
///
/// 异常处理：
/// - `appcmd.exe` 不存在：[`InventoryError::Unavailable`]
/// - 启动失败或退出码非 0：[`InventoryError::Query`]，附带 stderr 便于排障
pub fn list_application_pools() -> Result<Vec<ApplicationPoolInfo>, InventoryError> {
    let appcmd = appcmd_path();
    if !appcmd.is_file() {
        return Err(InventoryError::Unavailable(format!(
            "未找到 {}",
            appcmd.display()
        )));
    }
    let out = Command::new(&appcmd)
        .args(["list", "apppool", "/xml"])
        .output()
        .map_err(|e| anyhow!("执行 {} 失败: {e}", appcmd.display()))?;
    if !out.status.success() {
        return Err(InventoryError::Query(anyhow!(
            "appcmd 执行失败: {}\n{}",
            out.status,
            String::from_utf8_lossy(&out.stderr)
        )));
    }
    Ok(parse_appcmd_apppools(&String::from_utf8_lossy(&out.stdout)))
}
