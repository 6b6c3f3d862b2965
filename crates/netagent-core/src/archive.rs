//! 安装包解压（zip）。
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::fs::File;
use std::path::Path;

use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::ExtractError;

/// 归档解压接口。
pub trait ArchiveExtractor {
    /// 将 `archive` 解压到 `dir`。
    fn extract(&self, archive: &Path, dir: &Path) -> Result<(), ExtractError>;
}

/// 基于 `zip` crate 的实现。
///
/// 条目路径经过 `enclosed_name` 校验，逃逸出目标目录的条目会导致解压失败。
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, dir: &Path) -> Result<(), ExtractError> {
        let file = File::open(archive)?;
        let mut zip = ZipArchive::new(file).map_err(zip_error)?;
        debug!("解压 {} 个条目到 {}", zip.len(), dir.display());
        zip.extract(dir).map_err(zip_error)
    }
}

fn zip_error(e: ZipError) -> ExtractError {
    match e {
        ZipError::Io(io) => ExtractError::Io(io),
        other => ExtractError::Corrupt(other.to_string()),
    }
}
