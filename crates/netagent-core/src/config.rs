//! 安装器配置（可选的 JSON 配置文件）。
//!
//! 约定：
//! - 结构体整体使用 `#[serde(default)]`，配置文件只需写出需要覆盖的字段
//! - 默认值即生产常量；测试与特殊部署可通过 `--config` 覆盖
//! - 该模块只有 [`InstallerConfig::load`] 做文件 IO
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::url::{DEFAULT_SERVICE_URL, LEGACY_PATH_MARKER};

/// 安装器配置根对象。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// 未提供服务地址时使用的默认地址。
    pub default_service_url: String,
    /// 旧版地址中需要截断的路径段标记。
    pub legacy_path_marker: String,
    /// 拼接在基础地址后的安装包下载路径。
    pub download_path: String,
    /// 视为“旧版 .NET Framework”的应用程序池运行时版本。
    pub legacy_runtime_markers: Vec<String>,
    /// Web 服务器服务名。
    pub web_service_name: String,
    /// 启动 Web 服务器服务后等待其进入运行状态的最长秒数。
    pub service_start_timeout_secs: u64,
    /// 数据目录下的结构化（YAML）凭据配置文件名。
    pub structured_config_file: String,
    /// 安装目录下的旧版（XML）凭据配置文件名。
    pub legacy_config_file: String,
    /// 下载安装包在工作目录中的保存文件名。
    pub package_file_name: String,
    /// 解压后工作目录中的安装程序文件名。
    pub installer_program: String,
    /// 解压后工作目录中由服务端生成的代理配置文件名。
    pub installer_config_file: String,
    /// 安装程序参数；`{config}` 会被替换为代理配置文件的绝对路径。
    pub installer_args: Vec<String>,
    /// 视为成功的安装程序退出码（为空时使用 0/3010/1641）。
    pub installer_success_exit_codes: Vec<i32>,
    /// HTTP 下载超时时间（秒）。
    pub http_timeout_secs: u64,
    /// 临时工作目录的父目录；为空则使用系统临时目录。
    pub work_root: Option<PathBuf>,
    /// 安装记录所在的注册表位置。
    pub record: RecordLocation,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            default_service_url: DEFAULT_SERVICE_URL.to_string(),
            legacy_path_marker: LEGACY_PATH_MARKER.to_string(),
            download_path: "Contrast/api/engine/dotnet".to_string(),
            legacy_runtime_markers: vec!["v2.0".to_string(), "v4.0".to_string()],
            web_service_name: "W3SVC".to_string(),
            service_start_timeout_secs: 30,
            structured_config_file: "contrast_security.yaml".to_string(),
            legacy_config_file: "DotnetAgentService.exe.config".to_string(),
            package_file_name: "package.zip".to_string(),
            installer_program: "ContrastSetup.exe".to_string(),
            installer_config_file: "contrast_security.yaml".to_string(),
            installer_args: vec![
                "-s".to_string(),
                "-norestart".to_string(),
                "PathToYaml={config}".to_string(),
            ],
            installer_success_exit_codes: Vec::new(),
            http_timeout_secs: 300,
            work_root: None,
            record: RecordLocation::default(),
        }
    }
}

/// 安装记录的注册表位置（HKLM 下）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordLocation {
    /// 子键路径（不含根键）。
    pub key: String,
    /// 版本号值名。
    pub version_value: String,
    /// 安装目录值名。
    pub install_directory_value: String,
    /// 数据目录值名。
    pub data_directory_value: String,
}

impl Default for RecordLocation {
    fn default() -> Self {
        Self {
            key: "SOFTWARE\\Contrast Security\\Contrast .NET Agent".to_string(),
            version_value: "Version".to_string(),
            install_directory_value: "InstallDirectory".to_string(),
            data_directory_value: "DataDirectory".to_string(),
        }
    }
}

impl InstallerConfig {
    /// 读取并解析 JSON 配置文件。
    ///
    /// 异常处理：
    /// - 文件读取失败（不存在/权限/IO）返回错误
    /// - JSON 解析失败返回错误
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("解析配置文件 JSON 失败: {}", path.display()))
    }

    /// 规范化服务地址（使用本配置中的默认地址与旧版标记）。
    pub fn normalize_url(&self, url: Option<&str>) -> String {
        crate::url::normalize_with(url, &self.default_service_url, &self.legacy_path_marker)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn service_start_timeout(&self) -> Duration {
        Duration::from_secs(self.service_start_timeout_secs)
    }

    /// 临时工作目录的父目录。
    pub fn work_root(&self) -> PathBuf {
        self.work_root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// 安装程序成功退出码。
    ///
    /// 未配置时使用约定默认值：
    /// - 0：成功
    /// - 3010：成功但需要重启（MSI 常见）
    /// - 1641：成功并已触发重启（MSI 常见）
    pub fn success_exit_codes(&self) -> Vec<i32> {
        if self.installer_success_exit_codes.is_empty() {
            vec![0, 3010, 1641]
        } else {
            self.installer_success_exit_codes.clone()
        }
    }
}
