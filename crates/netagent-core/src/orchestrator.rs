//! 总体编排：资格探测 → 凭据解析 → 安装流水线 → 结果报告。
//!
//! 状态机：
//! - `Start -> ProbeEnvironment`：不满足条件则以 `Ineligible` 结束（无副作用）
//! - `-> ResolveCredentials`：不完整则以 `MissingCredentials` 结束
//! - `-> Pipeline`：以流水线结果结束
//!
//! 所有错误都在此处转换为 [`InstallOutcome`]，不会再向上传播。
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::archive::ArchiveExtractor;
use crate::config::InstallerConfig;
use crate::credentials::PartialCredentials;
use crate::host::{HostEnvironment, InstallationRegistry, PriorInstallationRecord};
use crate::installer::Installer;
use crate::pipeline::{InstallOutcome, InstallPipeline, InstallRequest};
use crate::probe::EnvironmentProbe;
use crate::resolver::CredentialResolver;
use crate::transport::PackageFetcher;

/// 编排所需的全部外部协作者。
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub host: &'a dyn HostEnvironment,
    pub registry: &'a dyn InstallationRegistry,
    pub fetcher: &'a dyn PackageFetcher,
    pub extractor: &'a dyn ArchiveExtractor,
    pub installer: &'a dyn Installer,
}

/// 一次运行的报告。
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub outcome: InstallOutcome,
    /// 运行开始时读取到的已安装版本。
    pub previous_version: Option<String>,
    pub installer_exit_code: Option<i32>,
    /// 安装程序退出码是否属于成功退出码。
    pub installer_exit_accepted: bool,
    /// 临时工作目录删除失败（仅告警，不影响退出码）。
    pub cleanup_failed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
}

impl RunReport {
    fn new(outcome: InstallOutcome, previous: Option<&PriorInstallationRecord>) -> Self {
        Self {
            outcome,
            previous_version: previous.map(|r| r.version.clone()),
            installer_exit_code: None,
            installer_exit_accepted: true,
            cleanup_failed: false,
            finished_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.outcome.exit_code()
    }

    /// 安装程序以非成功退出码结束时的补充说明。
    fn rejected_exit_note(&self) -> Option<String> {
        if self.installer_exit_accepted {
            return None;
        }
        Some(match self.installer_exit_code {
            Some(code) => format!("安装程序退出码 {code} 不属于成功退出码"),
            None => "安装程序被信号终止".to_string(),
        })
    }

    /// 面向用户的单行状态描述。
    pub fn status_line(&self) -> String {
        match &self.outcome {
            InstallOutcome::Ineligible => "[ineligible] 主机不满足安装条件，无需安装".to_string(),
            InstallOutcome::MissingCredentials { missing } => format!(
                "[missing_credentials] 凭据不完整，缺少: {}；请通过 {} 参数提供",
                missing
                    .iter()
                    .map(|f| f.display_name())
                    .collect::<Vec<_>>()
                    .join(", "),
                missing
                    .iter()
                    .map(|f| format!("--{}", f.display_name()))
                    .collect::<Vec<_>>()
                    .join(" / ")
            ),
            InstallOutcome::DownloadFailed { detail } => {
                format!("[download_failed] 下载安装包失败: {detail}")
            }
            InstallOutcome::ExtractFailed { detail } => {
                format!("[extract_failed] 解压安装包失败: {detail}")
            }
            InstallOutcome::InstallFailed { detail } => format!("[install_failed] 安装失败: {detail}"),
            InstallOutcome::Success { version } => {
                let changed = self.previous_version.as_deref() != Some(version.as_str());
                let line = match self.previous_version.as_deref() {
                    Some(prev) if !prev.is_empty() && changed => {
                        format!("[success] 升级成功: {prev} -> {version}")
                    }
                    Some(_) if !self.installer_exit_accepted => {
                        format!("[success] 安装记录未变化，当前版本 {version}")
                    }
                    _ => format!("[success] 安装成功，当前版本 {version}"),
                };
                match self.rejected_exit_note() {
                    Some(note) => format!("{line}（{note}）"),
                    None => line,
                }
            }
        }
    }
}

/// 编排器。
pub struct Orchestrator<'a> {
    config: &'a InstallerConfig,
    parts: Collaborators<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a InstallerConfig, parts: Collaborators<'a>) -> Self {
        Self { config, parts }
    }

    /// 执行一次完整的安装/升级流程。
    ///
    /// 参数：
    /// - `explicit`：命令行显式传入的部分凭据
    ///
    /// 返回值：
    /// - 运行报告；调用方据此输出状态行并设置退出码
    pub fn execute(&self, explicit: &PartialCredentials) -> RunReport {
        let probe = EnvironmentProbe::new(self.parts.host, &self.config.legacy_runtime_markers);
        if !probe.is_eligible() {
            return RunReport::new(InstallOutcome::Ineligible, None);
        }

        let prior = self.read_prior();
        let resolver = CredentialResolver::new(self.config);
        let credentials = match resolver.resolve(explicit, prior.as_ref()) {
            Ok(c) => c,
            Err(e) => {
                warn!("{e}");
                return RunReport::new(
                    InstallOutcome::MissingCredentials { missing: e.missing },
                    prior.as_ref(),
                );
            }
        };
        info!("凭据已就绪: 服务地址 {}, 用户 {}", credentials.api_url(), credentials.user_name());

        let request = InstallRequest::new(credentials, self.config.work_root());
        let pipeline = InstallPipeline::new(
            self.config,
            self.parts.registry,
            self.parts.fetcher,
            self.parts.extractor,
            self.parts.installer,
        );
        let run = pipeline.execute(&request);

        let mut report = RunReport::new(run.outcome, prior.as_ref());
        report.installer_exit_code = run.installer_exit_code;
        report.installer_exit_accepted = run.installer_exit_accepted;
        report.cleanup_failed = !run.cleaned_up;
        report
    }

    /// 读取运行开始时的安装记录；读取失败按未安装处理。
    fn read_prior(&self) -> Option<PriorInstallationRecord> {
        match self.parts.registry.read_installation() {
            Ok(Some(record)) => {
                info!("已安装版本: {}", record.version);
                Some(record)
            }
            Ok(None) => {
                info!("未发现已有安装");
                None
            }
            Err(e) => {
                warn!("读取安装记录失败，按未安装处理: {e:#}");
                None
            }
        }
    }
}
