//! 服务基础地址规范化。
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

/// 默认服务地址（未提供任何地址时使用）。
pub const DEFAULT_SERVICE_URL: &str = "https://app.contrastsecurity.com";

/// 旧版配置中附加在基础地址后的路径段标记。
pub const LEGACY_PATH_MARKER: &str = "/Contrast";

/// 使用默认常量规范化服务地址，等价于
/// `normalize_with(url, DEFAULT_SERVICE_URL, LEGACY_PATH_MARKER)`。
pub fn normalize(url: Option<&str>) -> String {
    normalize_with(url, DEFAULT_SERVICE_URL, LEGACY_PATH_MARKER)
}

/// 规范化服务地址，保证所有调用方拼接出一致的请求地址。
///
/// 规则：
/// - `url` 为空（`None` 或仅空白）：返回 `default_url`
/// - 包含 `marker`：截断到第一次出现的位置
/// - 其他情况原样返回
///
/// 纯函数，不会失败。
pub fn normalize_with(url: Option<&str>, default_url: &str, marker: &str) -> String {
    let raw = match url {
        Some(u) if !u.trim().is_empty() => u,
        _ => default_url,
    };
    match raw.find(marker) {
        Some(idx) if !marker.is_empty() => raw[..idx].to_string(),
        _ => raw.to_string(),
    }
}

/// 将规范化后的基础地址与固定下载路径拼接。
pub fn join_download_url(base: &str, download_path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        download_path.trim_start_matches('/')
    )
}
