//! 外部宿主状态接口。
//!
//! 目的：
//! - 将 Windows 功能/服务/应用程序池查询与安装记录读取抽象为注入式接口
//! - 资格探测与凭据解析只依赖这些接口，可用假实现做确定性测试
//!
//! 真实实现位于 `netagent-windows` crate。
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Web 服务器服务状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// 服务未安装。
    NotInstalled,
    /// 已安装且正在运行。
    Running,
    /// 已安装但未运行（已停止、暂停或处于过渡状态）。
    NotRunning,
}

/// 宿主上发现的一个应用程序池。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPoolInfo {
    pub name: String,
    /// 托管运行时版本（例如 `v4.0`；“无托管代码”时为空字符串）。
    pub managed_runtime_version: String,
}

/// 已安装代理的安装记录快照（只读）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorInstallationRecord {
    pub version: String,
    pub install_directory: PathBuf,
    pub data_directory: PathBuf,
}

/// 宿主环境查询与操作。
pub trait HostEnvironment {
    /// Web 服务器功能是否已安装。
    fn web_server_feature_installed(&self) -> Result<bool>;

    /// 查询 Web 服务器服务状态。
    fn web_service_state(&self) -> Result<ServiceState>;

    /// 尝试启动 Web 服务器服务（只尝试一次，由实现决定等待时长）。
    fn start_web_service(&self) -> Result<()>;

    /// 枚举应用程序池。
    ///
    /// 异常处理：
    /// - 查询组件不可用：返回 [`InventoryError::Unavailable`]
    fn application_pools(&self) -> Result<Vec<ApplicationPoolInfo>, InventoryError>;
}

/// 安装记录读取。
///
/// 安装记录只由外部安装程序写入，本系统仅读取。
pub trait InstallationRegistry {
    /// 读取当前安装记录；未安装时返回 `Ok(None)`。
    fn read_installation(&self) -> Result<Option<PriorInstallationRecord>>;
}
