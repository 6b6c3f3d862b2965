//! IIS（Web 服务器角色）安装检测。
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::io::ErrorKind;

use anyhow::{Context, Result};
use winreg::enums::HKEY_LOCAL_MACHINE;
use winreg::RegKey;

const INETSTP_COMPONENTS: &str = "SOFTWARE\\Microsoft\\InetStp\\Components";

/// 检测“万维网服务”组件是否已安装。
///
/// 检测逻辑：
/// - 读取 `HKLM\SOFTWARE\Microsoft\InetStp\Components` 的 `W3SVC` 值
/// - W3SVC == 1 视为已安装；键或值不存在视为未安装
///
/// 异常处理：
/// - 除“不存在”以外的读取失败（常见原因：权限不足）返回错误
pub fn web_server_installed() -> Result<bool> {
    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key = match hklm.open_subkey(INETSTP_COMPONENTS) {
        Ok(key) => key,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).context("打开 IIS 组件注册表键失败"),
    };
    match key.get_value::<u32, _>("W3SVC") {
        Ok(v) => Ok(v == 1),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).context("读取 W3SVC 组件值失败"),
    }
}
