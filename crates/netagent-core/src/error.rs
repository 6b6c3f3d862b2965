//! 领域错误分类。
//!
//! 说明：
//! - 宿主查询、文件系统等底层操作统一使用 `anyhow::Result` 向上返回
//! - 本模块只定义需要被编排层区分处理的错误；它们最终都会在 [`crate::orchestrator`]
//!   中转换为 [`crate::pipeline::InstallOutcome`]，不会作为未处理错误离开编排层
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use thiserror::Error;

use crate::credentials::CredentialField;

/// 凭据不完整：合并所有来源后仍有必填字段为空。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("凭据不完整，缺少: {}", format_fields(.missing))]
pub struct IncompleteCredentials {
    /// 仍然缺失的字段（按固定顺序）。
    pub missing: Vec<CredentialField>,
}

fn format_fields(fields: &[CredentialField]) -> String {
    fields
        .iter()
        .map(|f| f.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 应用程序池清单查询失败。
///
/// 两种情况在资格探测中都按“无旧版运行时应用程序池”处理，并输出告警。
#[derive(Debug, Error)]
pub enum InventoryError {
    /// 查询组件本身不可用（例如 IIS 管理工具未安装）。
    #[error("应用程序池清单查询组件不可用: {0}")]
    Unavailable(String),
    /// 查询组件存在但执行失败。
    #[error(transparent)]
    Query(#[from] anyhow::Error),
}

/// 下载传输失败。
#[derive(Debug, Error)]
pub enum TransportError {
    /// 请求未能完成（连接失败、TLS 协商失败、超时等）。
    #[error("请求失败: {0}")]
    Request(String),
    /// 服务端返回非成功状态码。
    #[error("服务端返回 HTTP {status}")]
    Status { status: u16 },
}

/// 安装包解压失败。
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("安装包不是有效的 zip 归档: {0}")]
    Corrupt(String),
    #[error("解压安装包失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("安装包中缺少文件: {0}")]
    MissingEntry(String),
}
