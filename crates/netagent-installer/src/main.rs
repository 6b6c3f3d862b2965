//! .NET 代理无人值守安装/升级程序。
//!
//! 职责：
//! - 解析命令行参数与可选配置文件，组装宿主/下载/解压/安装程序等协作者
//! - 执行“资格探测 → 凭据解析 → 下载安装流水线”，输出单行状态并设置退出码
//!
//! 退出码：
//! - 0：安装/升级成功，或主机不满足安装条件（无事可做）
//! - 1：启动失败（命令行参数无效、配置文件无法读取/解析等），同样输出 `[startup_error]` 状态行
//! - 2：凭据不完整
//! - 3/4/5：下载失败/解压失败/安装失败
//!
//! 权限要求：
//! - 安装与启动 W3SVC 需要管理员权限
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use netagent_core::archive::ZipExtractor;
use netagent_core::config::InstallerConfig;
use netagent_core::credentials::PartialCredentials;
use netagent_core::installer::ProcessInstaller;
use netagent_core::orchestrator::{Collaborators, Orchestrator};
use netagent_core::transport::HttpFetcher;
use netagent_windows::WindowsHost;
use tracing::{error, info, warn};

/// 命令行参数。
///
/// 说明：
/// - 四个凭据参数均可省略；省略的字段会尝试从已有安装的配置文件中读取
/// - `config` 指向可选的 JSON 配置文件，仅需写出要覆盖的字段
#[derive(Debug, Parser)]
#[command(name = "netagent-installer", version)]
struct Cli {
    /// 服务基础地址。
    #[arg(long)]
    api_url: Option<String>,

    #[arg(long)]
    api_key: Option<String>,

    #[arg(long)]
    service_key: Option<String>,

    #[arg(long)]
    user_name: Option<String>,

    /// 安装器配置文件（JSON）。
    #[arg(long)]
    config: Option<PathBuf>,

    /// 临时工作目录的父目录（默认系统临时目录）。
    #[arg(long)]
    work_root: Option<PathBuf>,

    /// 在状态行之后输出 JSON 格式的运行报告。
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl Cli {
    fn explicit_credentials(&self) -> PartialCredentials {
        PartialCredentials {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            service_key: self.service_key.clone(),
            user_name: self.user_name.clone(),
        }
    }
}

/// 程序入口：日志输出到 stderr，stdout 只保留状态行与可选 JSON 报告。
fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return Ok(startup_failure("命令行参数无效"));
        }
    };
    match load_config(&cli).and_then(|config| run(&cli, &config)) {
        Ok(code) => Ok(code),
        Err(e) => {
            error!("{e:#}");
            Ok(startup_failure(&format!("{e:#}")))
        }
    }
}

/// 启动阶段失败：输出状态行，退出码 1。
fn startup_failure(detail: &str) -> ExitCode {
    println!("[startup_error] 启动失败: {detail}");
    ExitCode::from(1)
}

/// 加载配置：配置文件（可选）+ 命令行覆盖项。
///
/// 异常处理：
/// - 指定的配置文件无法读取或解析时返回错误（此时尚未做任何系统修改）
fn load_config(cli: &Cli) -> Result<InstallerConfig> {
    let mut config = match &cli.config {
        Some(path) => InstallerConfig::load(path)?,
        None => InstallerConfig::default(),
    };
    if let Some(root) = &cli.work_root {
        config.work_root = Some(root.clone());
    }
    Ok(config)
}

fn run(cli: &Cli, config: &InstallerConfig) -> Result<ExitCode> {
    let host = WindowsHost::new(config);
    let fetcher = HttpFetcher::new(config.http_timeout()).context("初始化 HTTP 客户端失败")?;
    let parts = Collaborators {
        host: &host,
        registry: &host,
        fetcher: &fetcher,
        extractor: &ZipExtractor,
        installer: &ProcessInstaller,
    };

    info!("开始执行代理安装流程");
    let report = Orchestrator::new(config, parts).execute(&cli.explicit_credentials());

    println!("{}", report.status_line());
    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("序列化运行报告失败: {e}"),
        }
    }
    Ok(ExitCode::from(report.exit_code()))
}
