//! .NET 代理静默安装器核心库（跨平台/与宿主实现无关）。
//!
//! 功能：
//! - 定义凭据模型与多来源按字段合并的解析器
//! - 定义宿主环境/安装记录/安装程序等外部协作者接口（便于用假实现测试）
//! - 实现环境资格探测、下载 → 解压 → 安装 → 校验 → 清理流水线与总体编排
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

pub mod archive;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod host;
pub mod installer;
pub mod inventory;
pub mod orchestrator;
pub mod pipeline;
pub mod probe;
pub mod resolver;
pub mod sources;
pub mod transport;
pub mod url;
pub mod workdir;
