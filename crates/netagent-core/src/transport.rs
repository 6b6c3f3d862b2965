//! 安装包下载（阻塞式 HTTP）。
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::time::Duration;

use tracing::{debug, info};

use crate::auth::AuthHeaders;
use crate::error::TransportError;

/// 安装包下载接口。
pub trait PackageFetcher {
    /// 带认证头请求 `url` 并返回完整响应体。
    ///
    /// 异常处理：
    /// - 传输失败（含 TLS 协商失败、超时）：[`TransportError::Request`]
    /// - 非 2xx 响应：[`TransportError::Status`]
    fn fetch(&self, url: &str, headers: &AuthHeaders) -> Result<Vec<u8>, TransportError>;
}

/// 基于 `reqwest::blocking` 的实现。
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// 创建下载器。
    ///
    /// 参数：
    /// - `timeout`：整个请求（含读取响应体）的超时时间
    ///
    /// 异常处理：
    /// - TLS 后端初始化失败时返回错误
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("netagent-installer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl PackageFetcher for HttpFetcher {
    fn fetch(&self, url: &str, headers: &AuthHeaders) -> Result<Vec<u8>, TransportError> {
        info!("下载安装包: {url}");
        let mut request = self.client.get(url);
        for (name, value) in headers.pairs() {
            request = request.header(name, value);
        }
        let response = request
            .send()
            .map_err(|e| TransportError::Request(format!("{e:#}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .map_err(|e| TransportError::Request(format!("读取响应体失败: {e:#}")))?;
        debug!("安装包大小: {} 字节", bytes.len());
        Ok(bytes.to_vec())
    }
}
