//! [`WindowsHost`]：`netagent_core::host` 接口的系统实现。
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::time::Duration;

use anyhow::Result;
use netagent_core::config::{InstallerConfig, RecordLocation};
use netagent_core::error::InventoryError;
use netagent_core::host::{
    ApplicationPoolInfo, HostEnvironment, InstallationRegistry, PriorInstallationRecord,
    ServiceState,
};

/// 本机宿主。
#[derive(Debug, Clone)]
pub struct WindowsHost {
    web_service_name: String,
    service_start_timeout: Duration,
    record: RecordLocation,
}

impl WindowsHost {
    pub fn new(config: &InstallerConfig) -> Self {
        Self {
            web_service_name: config.web_service_name.clone(),
            service_start_timeout: config.service_start_timeout(),
            record: config.record.clone(),
        }
    }
}

#[cfg(windows)]
impl HostEnvironment for WindowsHost {
    fn web_server_feature_installed(&self) -> Result<bool> {
        crate::feature::web_server_installed()
    }

    fn web_service_state(&self) -> Result<ServiceState> {
        crate::service::query_state(&self.web_service_name)
    }

    fn start_web_service(&self) -> Result<()> {
        crate::service::start_and_wait(&self.web_service_name, self.service_start_timeout)
    }

    fn application_pools(&self) -> Result<Vec<ApplicationPoolInfo>, InventoryError> {
        crate::apppool::list_application_pools()
    }
}

#[cfg(windows)]
impl InstallationRegistry for WindowsHost {
    fn read_installation(&self) -> Result<Option<PriorInstallationRecord>> {
        crate::registry::read_record(&self.record)
    }
}

// 非 Windows：没有 IIS，也不会有安装记录。
#[cfg(not(windows))]
impl HostEnvironment for WindowsHost {
    fn web_server_feature_installed(&self) -> Result<bool> {
        tracing::warn!("当前平台不是 Windows，Web 服务器功能视为未安装");
        Ok(false)
    }

    fn web_service_state(&self) -> Result<ServiceState> {
        Ok(ServiceState::NotInstalled)
    }

    fn start_web_service(&self) -> Result<()> {
        Err(anyhow::anyhow!(
            "当前平台不支持启动服务: {} (等待 {:?})",
            self.web_service_name,
            self.service_start_timeout
        ))
    }

    fn application_pools(&self) -> Result<Vec<ApplicationPoolInfo>, InventoryError> {
        Err(InventoryError::Unavailable(format!(
            "当前平台没有 {}",
            crate::apppool::appcmd_path().display()
        )))
    }
}

#[cfg(not(windows))]
impl InstallationRegistry for WindowsHost {
    fn read_installation(&self) -> Result<Option<PriorInstallationRecord>> {
        tracing::debug!(
            "当前平台没有注册表，安装记录 {} 视为不存在",
            self.record.key
        );
        Ok(None)
    }
}
