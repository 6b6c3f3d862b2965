//! 安装流水线：下载 → 解压 → 安装 → 清理 → 校验。
//!
//! 主要步骤：
//! 1) 创建名称唯一的临时工作目录
//! 2) 带认证头下载安装包（失败：`DownloadFailed`）
//! 3) 解压到工作目录并确认安装程序存在（失败：`ExtractFailed`）
//! 4) 以静默参数同步执行安装程序（退出码仅记录）
//! 5) 删除工作目录（任何路径都会执行；失败只告警）
//! 6) 重新读取安装记录：存在且带版本号为 `Success`，否则为 `InstallFailed`
//!
//! 幂等性：
//! - 已安装主机上再次执行即为原地升级，由外部安装程序负责处理两种情况
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::archive::ArchiveExtractor;
use crate::auth::AuthHeaders;
use crate::config::InstallerConfig;
use crate::credentials::{CredentialField, Credentials};
use crate::error::ExtractError;
use crate::host::InstallationRegistry;
use crate::installer::{expand_args, Installer, InstallerExit};
use crate::transport::PackageFetcher;
use crate::url::join_download_url;
use crate::workdir::WorkDir;

/// 流水线输入；只能由完整凭据构造。
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub credentials: Credentials,
    /// 临时工作目录的父目录。
    pub work_root: PathBuf,
}

impl InstallRequest {
    pub fn new(credentials: Credentials, work_root: PathBuf) -> Self {
        Self {
            credentials,
            work_root,
        }
    }
}

/// 一次运行的最终结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstallOutcome {
    /// 主机不满足安装条件（无事可做）。
    Ineligible,
    /// 凭据不完整。
    MissingCredentials { missing: Vec<CredentialField> },
    /// 下载失败。
    DownloadFailed { detail: String },
    /// 解压失败。
    ExtractFailed { detail: String },
    /// 安装后未找到带版本号的安装记录，或安装程序无法启动。
    InstallFailed { detail: String },
    /// 安装成功，携带安装后的版本号。
    Success { version: String },
}

impl InstallOutcome {
    /// 结果类别名（用于状态行与 JSON 报告）。
    pub fn label(&self) -> &'static str {
        match self {
            InstallOutcome::Ineligible => "ineligible",
            InstallOutcome::MissingCredentials { .. } => "missing_credentials",
            InstallOutcome::DownloadFailed { .. } => "download_failed",
            InstallOutcome::ExtractFailed { .. } => "extract_failed",
            InstallOutcome::InstallFailed { .. } => "install_failed",
            InstallOutcome::Success { .. } => "success",
        }
    }

    /// 进程退出码。
    pub fn exit_code(&self) -> u8 {
        match self {
            InstallOutcome::Ineligible | InstallOutcome::Success { .. } => 0,
            InstallOutcome::MissingCredentials { .. } => 2,
            InstallOutcome::DownloadFailed { .. } => 3,
            InstallOutcome::ExtractFailed { .. } => 4,
            InstallOutcome::InstallFailed { .. } => 5,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InstallOutcome::Success { .. })
    }
}

/// 流水线运行详情。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    pub outcome: InstallOutcome,
    /// 安装程序退出码（未执行到安装步骤或被信号终止时为 `None`）。
    pub installer_exit_code: Option<i32>,
    /// 安装程序退出码是否属于成功退出码（未执行安装程序时为 `true`）。
    pub installer_exit_accepted: bool,
    /// 临时工作目录是否已成功删除。
    pub cleaned_up: bool,
}

/// 安装流水线。
pub struct InstallPipeline<'a> {
    config: &'a InstallerConfig,
    registry: &'a dyn InstallationRegistry,
    fetcher: &'a dyn PackageFetcher,
    extractor: &'a dyn ArchiveExtractor,
    installer: &'a dyn Installer,
}

/// 安装步骤（2～4）的结果。
enum Staged {
    /// 安装程序已执行完毕。
    Ran(InstallerExit),
    /// 提前终止，结果已确定。
    Stopped(InstallOutcome),
}

impl<'a> InstallPipeline<'a> {
    pub fn new(
        config: &'a InstallerConfig,
        registry: &'a dyn InstallationRegistry,
        fetcher: &'a dyn PackageFetcher,
        extractor: &'a dyn ArchiveExtractor,
        installer: &'a dyn Installer,
    ) -> Self {
        Self {
            config,
            registry,
            fetcher,
            extractor,
            installer,
        }
    }

    /// 执行流水线并返回最终结果。
    pub fn run(&self, req: &InstallRequest) -> InstallOutcome {
        self.execute(req).outcome
    }

    /// 执行流水线并返回运行详情。
    ///
    /// 任何路径上工作目录都会被删除；删除失败只体现在 `cleaned_up = false`。
    pub fn execute(&self, req: &InstallRequest) -> PipelineRun {
        let workdir = match WorkDir::create(&req.work_root) {
            Ok(dir) => dir,
            Err(e) => {
                return PipelineRun {
                    outcome: InstallOutcome::DownloadFailed {
                        detail: format!("{e:#}"),
                    },
                    installer_exit_code: None,
                    installer_exit_accepted: true,
                    cleaned_up: true,
                }
            }
        };

        let staged = self.stage_and_install(&req.credentials, workdir.path());
        let cleaned_up = workdir.close();

        let exit = match staged {
            Staged::Stopped(outcome) => {
                return PipelineRun {
                    outcome,
                    installer_exit_code: None,
                    installer_exit_accepted: true,
                    cleaned_up,
                }
            }
            Staged::Ran(exit) => exit,
        };

        PipelineRun {
            outcome: self.verify(exit),
            installer_exit_code: exit.code,
            installer_exit_accepted: exit.is_success(&self.config.success_exit_codes()),
            cleaned_up,
        }
    }

    fn stage_and_install(&self, credentials: &Credentials, work: &Path) -> Staged {
        let base = self.config.normalize_url(Some(credentials.api_url()));
        let url = join_download_url(&base, &self.config.download_path);
        let headers = AuthHeaders::from_credentials(credentials);
        let bytes = match self.fetcher.fetch(&url, &headers) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("下载安装包失败: {e}");
                return Staged::Stopped(InstallOutcome::DownloadFailed {
                    detail: e.to_string(),
                });
            }
        };

        if let Err(e) = self.unpack(&bytes, work) {
            warn!("{e}");
            return Staged::Stopped(InstallOutcome::ExtractFailed {
                detail: e.to_string(),
            });
        }

        let program = work.join(&self.config.installer_program);
        let config_path = work.join(&self.config.installer_config_file);
        if !config_path.is_file() {
            warn!("安装包中未找到代理配置文件: {}", config_path.display());
        }
        let args = expand_args(&self.config.installer_args, &config_path);
        match self.installer.run(&program, &args, work) {
            Ok(exit) => {
                if exit.is_success(&self.config.success_exit_codes()) {
                    info!("安装程序退出: {:?}", exit.code);
                } else {
                    warn!("安装程序退出码异常: {:?}，以安装记录为准", exit.code);
                }
                Staged::Ran(exit)
            }
            Err(e) => {
                warn!("{e:#}");
                Staged::Stopped(InstallOutcome::InstallFailed {
                    detail: format!("{e:#}"),
                })
            }
        }
    }

    /// 保存安装包、解压并确认安装程序存在。
    fn unpack(&self, bytes: &[u8], work: &Path) -> Result<(), ExtractError> {
        let package = work.join(&self.config.package_file_name);
        std::fs::write(&package, bytes)?;
        self.extractor.extract(&package, work)?;
        let program = work.join(&self.config.installer_program);
        if !program.is_file() {
            return Err(ExtractError::MissingEntry(
                self.config.installer_program.clone(),
            ));
        }
        Ok(())
    }

    /// 重新读取安装记录作为安装是否成功的依据。
    fn verify(&self, exit: InstallerExit) -> InstallOutcome {
        match self.registry.read_installation() {
            Ok(Some(record)) if !record.version.trim().is_empty() => {
                info!("安装完成，当前版本 {}", record.version);
                InstallOutcome::Success {
                    version: record.version.trim().to_string(),
                }
            }
            Ok(_) => InstallOutcome::InstallFailed {
                detail: format!("安装后未找到安装记录（安装程序退出码 {:?}）", exit.code),
            },
            Err(e) => InstallOutcome::InstallFailed {
                detail: format!("读取安装记录失败: {e:#}"),
            },
        }
    }
}
