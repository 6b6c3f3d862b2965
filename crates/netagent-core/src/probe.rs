//! 环境资格探测：判断当前主机是否是有效的安装目标。
//!
//! 资格条件（全部满足）：
//! 1) Web 服务器功能已安装
//! 2) Web 服务器服务已安装且正在运行；未运行时尝试启动一次并复查
//! 3) 至少一个应用程序池的托管运行时版本属于旧版 .NET Framework 标记
//!
//! 副作用：
//! - 条件 2 可能启动 Web 服务器服务（会输出日志）
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use tracing::{debug, info, warn};

use crate::error::InventoryError;
use crate::host::{HostEnvironment, ServiceState};

/// 资格探测器。
pub struct EnvironmentProbe<'a> {
    host: &'a dyn HostEnvironment,
    legacy_runtime_markers: &'a [String],
}

impl<'a> EnvironmentProbe<'a> {
    /// 创建探测器。
    ///
    /// 参数：
    /// - `host`：宿主环境查询接口
    /// - `legacy_runtime_markers`：视为旧版运行时的版本字符串（忽略 ASCII 大小写）
    pub fn new(host: &'a dyn HostEnvironment, legacy_runtime_markers: &'a [String]) -> Self {
        Self {
            host,
            legacy_runtime_markers,
        }
    }

    /// 判断主机是否满足安装条件。
    ///
    /// 返回值：
    /// - `true`：可以继续安装
    /// - `false`：无需安装；调用方将其视为“无事可做”，而不是错误
    ///
    /// 异常处理：
    /// - 任何查询失败都按“不满足”处理并输出告警，不向上返回错误
    pub fn is_eligible(&self) -> bool {
        self.web_server_feature_present() && self.web_service_running() && self.has_legacy_pool()
    }

    fn web_server_feature_present(&self) -> bool {
        match self.host.web_server_feature_installed() {
            Ok(true) => true,
            Ok(false) => {
                info!("Web 服务器功能未安装");
                false
            }
            Err(e) => {
                warn!("检测 Web 服务器功能失败: {e:#}");
                false
            }
        }
    }

    fn web_service_running(&self) -> bool {
        match self.host.web_service_state() {
            Ok(ServiceState::Running) => true,
            Ok(ServiceState::NotInstalled) => {
                info!("Web 服务器服务未安装");
                false
            }
            Ok(ServiceState::NotRunning) => self.try_start_web_service(),
            Err(e) => {
                warn!("查询 Web 服务器服务状态失败: {e:#}");
                false
            }
        }
    }

    /// 启动一次服务并复查；失败不重试。
    fn try_start_web_service(&self) -> bool {
        info!("Web 服务器服务未运行，尝试启动");
        if let Err(e) = self.host.start_web_service() {
            warn!("启动 Web 服务器服务失败: {e:#}");
            return false;
        }
        match self.host.web_service_state() {
            Ok(ServiceState::Running) => {
                info!("Web 服务器服务已启动");
                true
            }
            Ok(state) => {
                warn!("启动后 Web 服务器服务仍未运行: {state:?}");
                false
            }
            Err(e) => {
                warn!("复查 Web 服务器服务状态失败: {e:#}");
                false
            }
        }
    }

    fn has_legacy_pool(&self) -> bool {
        let pools = match self.host.application_pools() {
            Ok(pools) => pools,
            Err(e @ InventoryError::Unavailable(_)) => {
                warn!("{e}，按无旧版运行时应用程序池处理");
                return false;
            }
            Err(InventoryError::Query(e)) => {
                warn!("枚举应用程序池失败，按无旧版运行时应用程序池处理: {e:#}");
                return false;
            }
        };
        let found = pools.iter().find(|p| {
            self.legacy_runtime_markers
                .iter()
                .any(|m| m.eq_ignore_ascii_case(p.managed_runtime_version.trim()))
        });
        match found {
            Some(pool) => {
                debug!(
                    "应用程序池 {} 使用运行时 {}",
                    pool.name, pool.managed_runtime_version
                );
                true
            }
            None => {
                info!("未发现使用旧版 .NET Framework 运行时的应用程序池（共 {} 个）", pools.len());
                false
            }
        }
    }
}
