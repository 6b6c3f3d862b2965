//! Windows 宿主能力封装（IIS 功能/服务/应用程序池查询、安装记录读取）。
//!
//! 目标：
//! - 将注册表、服务管理器与 `appcmd.exe` 调用集中在此，核心库只依赖
//!   `netagent_core::host` 中的接口
//! - 统一错误处理风格（以 `anyhow::Result` 形式向上返回）
//!
//! 非 Windows 平台：
//! - [`WindowsHost`] 仍可构造，但主机始终被判定为不满足安装条件，且没有安装记录
//!
//! 权限要求：
//! - 启动 W3SVC 服务需要管理员权限；读取注册表一般不需要
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

pub mod apppool;
#[cfg(windows)]
pub mod feature;
#[cfg(windows)]
pub mod registry;
#[cfg(windows)]
pub mod service;

mod host;

pub use host::WindowsHost;
