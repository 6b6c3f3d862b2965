//! 临时工作目录：每次流水线运行独占一个，离开作用域时删除。
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::{debug, warn};

/// 工作目录名前缀。
pub const WORK_DIR_PREFIX: &str = "netagent-install-";

/// 作用域内有效的临时工作目录。
///
/// 删除时机：
/// - 显式调用 [`WorkDir::close`]（可获知删除是否成功）
/// - 或在 `Drop` 时自动删除（覆盖提前返回与 panic 展开）
///
/// 删除失败只输出告警，不影响调用方已确定的结果。
pub struct WorkDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl WorkDir {
    /// 在 `root` 下创建名称唯一的新目录（`root` 不存在时先递归创建）。
    pub fn create(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("创建工作目录父目录失败: {}", root.display()))?;
        let dir = tempfile::Builder::new()
            .prefix(WORK_DIR_PREFIX)
            .tempdir_in(root)
            .with_context(|| format!("创建临时工作目录失败: {}", root.display()))?;
        let path = dir.path().to_path_buf();
        debug!("创建临时工作目录: {}", path.display());
        Ok(Self {
            path,
            dir: Some(dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 立即删除目录。
    ///
    /// 返回值：
    /// - `true`：删除成功
    /// - `false`：删除失败（已输出告警）
    pub fn close(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        let Some(dir) = self.dir.take() else {
            return true;
        };
        match dir.close() {
            Ok(()) => {
                debug!("已删除临时工作目录: {}", self.path.display());
                true
            }
            Err(e) => {
                warn!("删除临时工作目录失败: {}: {e}", self.path.display());
                false
            }
        }
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        self.release();
    }
}
