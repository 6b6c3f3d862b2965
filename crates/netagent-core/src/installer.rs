//! 外部安装程序调用。
//!
//! 约定：
//! - 安装程序以静默参数同步执行（等待退出）
//! - 退出码只作为参考记录；安装是否成功以安装后重新读取的安装记录为准
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::info;

/// 安装程序退出信号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallerExit {
    /// 进程退出码；被信号终止时为 `None`。
    pub code: Option<i32>,
}

impl InstallerExit {
    /// 退出码是否属于 `ok_codes`。
    pub fn is_success(&self, ok_codes: &[i32]) -> bool {
        self.code.is_some_and(|c| ok_codes.contains(&c))
    }
}

/// 外部安装程序接口。
pub trait Installer {
    /// 执行安装程序并等待其退出。
    ///
    /// 参数：
    /// - `program`：安装程序路径
    /// - `args`：完整参数列表
    /// - `working_dir`：工作目录
    ///
    /// 异常处理：
    /// - 进程无法启动时返回错误
    fn run(&self, program: &Path, args: &[String], working_dir: &Path) -> Result<InstallerExit>;
}

/// 以子进程方式执行安装程序。
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInstaller;

impl Installer for ProcessInstaller {
    fn run(&self, program: &Path, args: &[String], working_dir: &Path) -> Result<InstallerExit> {
        info!("执行安装程序: {}", program.display());
        let status = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .status()
            .with_context(|| format!("启动安装程序失败: {}", program.display()))?;
        Ok(InstallerExit {
            code: status.code(),
        })
    }
}

/// 展开安装程序参数中的 `{config}` 占位符。
pub fn expand_args(template: &[String], config_path: &Path) -> Vec<String> {
    let config = config_path.display().to_string();
    template
        .iter()
        .map(|a| a.replace("{config}", &config))
        .collect()
}
