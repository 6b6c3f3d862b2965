//! Web 服务器服务（W3SVC）状态查询与启动（基于 `windows-service` crate）。
//!
//! 权限要求：
//! - 查询状态一般不需要管理员；启动服务需要管理员权限
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::ffi::OsStr;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use netagent_core::host::ServiceState;
use tracing::debug;
use windows_service::service::{Service, ServiceAccess, ServiceState as ScmState};
use windows_service::service_manager::{ServiceManager, ServiceManagerAccess};

/// ERROR_SERVICE_DOES_NOT_EXIST。
const ERROR_SERVICE_DOES_NOT_EXIST: i32 = 1060;

/// 启动后轮询状态的间隔。
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// 打开服务；服务不存在时返回 `Ok(None)`。
fn open(service_name: &str, access: ServiceAccess) -> Result<Option<Service>> {
    let manager = ServiceManager::local_computer(None::<&str>, ServiceManagerAccess::CONNECT)
        .context("打开 ServiceManager 失败")?;
    match manager.open_service(service_name, access) {
        Ok(service) => Ok(Some(service)),
        Err(windows_service::Error::Winapi(e))
            if e.raw_os_error() == Some(ERROR_SERVICE_DOES_NOT_EXIST) =>
        {
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("打开服务失败: {service_name}")),
    }
}

/// 查询服务状态。
///
/// 异常处理：
/// - 打开服务管理器或查询失败返回错误；服务不存在返回 `NotInstalled`
pub fn query_state(service_name: &str) -> Result<ServiceState> {
    let Some(service) = open(service_name, ServiceAccess::QUERY_STATUS)? else {
        return Ok(ServiceState::NotInstalled);
    };
    let status = service
        .query_status()
        .with_context(|| format!("查询服务状态失败: {service_name}"))?;
    Ok(match status.current_state {
        ScmState::Running => ServiceState::Running,
        _ => ServiceState::NotRunning,
    })
}

/// 启动服务并等待其进入运行状态。
///
/// 参数：
/// - `service_name`：服务名
/// - `timeout`：最长等待时间
///
/// 异常处理：
/// - 服务不存在、启动请求失败或超时仍未运行时返回错误
pub fn start_and_wait(service_name: &str, timeout: Duration) -> Result<()> {
    let service = open(
        service_name,
        ServiceAccess::START | ServiceAccess::QUERY_STATUS,
    )?
    .ok_or_else(|| anyhow!("服务不存在: {service_name}"))?;
    service
        .start(&[] as &[&OsStr])
        .with_context(|| format!("启动服务失败: {service_name}"))?;

    let deadline = Instant::now() + timeout;
    loop {
        let state = service
            .query_status()
            .with_context(|| format!("查询服务状态失败: {service_name}"))?
            .current_state;
        debug!("服务 {service_name} 状态: {state:?}");
        match state {
            ScmState::Running => return Ok(()),
            _ if Instant::now() >= deadline => break,
            _ => std::thread::sleep(POLL_INTERVAL),
        }
    }
    Err(anyhow!("等待服务启动超时: {service_name}"))
}
