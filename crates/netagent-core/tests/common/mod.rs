#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{anyhow, Result};
use netagent_core::auth::AuthHeaders;
use netagent_core::config::InstallerConfig;
use netagent_core::error::{InventoryError, TransportError};
use netagent_core::host::{
    ApplicationPoolInfo, HostEnvironment, InstallationRegistry, PriorInstallationRecord,
    ServiceState,
};
use netagent_core::installer::{Installer, InstallerExit};
use netagent_core::transport::PackageFetcher;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn write_file(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().expect("parent"))
        .unwrap_or_else(|e| panic!("create parent for {} failed: {e}", path.display()));
    std::fs::write(path, content).unwrap_or_else(|e| panic!("write {} failed: {e}", path.display()));
}

pub fn dir_entries(path: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(path) {
        Ok(rd) => rd.map(|e| e.expect("dir entry").path()).collect(),
        Err(_) => Vec::new(),
    }
}

pub struct CleanupDir(pub PathBuf);

impl Drop for CleanupDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// 测试用配置：工作目录放在 `work_root` 下。
pub fn test_config(work_root: &Path) -> InstallerConfig {
    InstallerConfig {
        work_root: Some(work_root.to_path_buf()),
        ..InstallerConfig::default()
    }
}

/// 构造一个 zip 安装包。
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(content.as_bytes()).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// 包含安装程序与代理配置的标准安装包。
pub fn agent_package() -> Vec<u8> {
    build_zip(&[
        ("ContrastSetup.exe", "fake installer"),
        ("contrast_security.yaml", "api:\n  url: https://example.invalid\n"),
    ])
}

pub fn pool(name: &str, runtime: &str) -> ApplicationPoolInfo {
    ApplicationPoolInfo {
        name: name.to_string(),
        managed_runtime_version: runtime.to_string(),
    }
}

pub enum PoolsBehavior {
    Pools(Vec<ApplicationPoolInfo>),
    Unavailable,
    QueryFails,
}

/// 可配置的宿主环境。
pub struct FakeHost {
    pub feature_installed: bool,
    /// 依次返回的服务状态；最后一个会被重复返回。
    pub service_states: RefCell<Vec<ServiceState>>,
    pub start_succeeds: bool,
    pub pools: PoolsBehavior,
    pub service_queries: Cell<usize>,
    pub start_calls: Cell<usize>,
    pub pool_queries: Cell<usize>,
}

impl FakeHost {
    pub fn eligible() -> Self {
        Self {
            feature_installed: true,
            service_states: RefCell::new(vec![ServiceState::Running]),
            start_succeeds: true,
            pools: PoolsBehavior::Pools(vec![pool("DefaultAppPool", "v4.0")]),
            service_queries: Cell::new(0),
            start_calls: Cell::new(0),
            pool_queries: Cell::new(0),
        }
    }

    pub fn with_service_states(self, states: Vec<ServiceState>) -> Self {
        *self.service_states.borrow_mut() = states;
        self
    }
}

impl HostEnvironment for FakeHost {
    fn web_server_feature_installed(&self) -> Result<bool> {
        Ok(self.feature_installed)
    }

    fn web_service_state(&self) -> Result<ServiceState> {
        self.service_queries.set(self.service_queries.get() + 1);
        let mut states = self.service_states.borrow_mut();
        if states.len() > 1 {
            Ok(states.remove(0))
        } else {
            states.first().copied().ok_or_else(|| anyhow!("no state"))
        }
    }

    fn start_web_service(&self) -> Result<()> {
        self.start_calls.set(self.start_calls.get() + 1);
        if self.start_succeeds {
            Ok(())
        } else {
            Err(anyhow!("access denied"))
        }
    }

    fn application_pools(&self) -> Result<Vec<ApplicationPoolInfo>, InventoryError> {
        self.pool_queries.set(self.pool_queries.get() + 1);
        match &self.pools {
            PoolsBehavior::Pools(p) => Ok(p.clone()),
            PoolsBehavior::Unavailable => Err(InventoryError::Unavailable("appcmd.exe".into())),
            PoolsBehavior::QueryFails => Err(InventoryError::Query(anyhow!("exit 1"))),
        }
    }
}

pub type SharedRecord = Rc<RefCell<Option<PriorInstallationRecord>>>;

pub fn record(version: &str, install_dir: &Path, data_dir: &Path) -> PriorInstallationRecord {
    PriorInstallationRecord {
        version: version.to_string(),
        install_directory: install_dir.to_path_buf(),
        data_directory: data_dir.to_path_buf(),
    }
}

/// 安装记录（与假安装程序共享）。
pub struct FakeRegistry {
    pub record: SharedRecord,
    pub reads: Cell<usize>,
}

impl FakeRegistry {
    pub fn new(record: Option<PriorInstallationRecord>) -> Self {
        Self {
            record: Rc::new(RefCell::new(record)),
            reads: Cell::new(0),
        }
    }
}

impl InstallationRegistry for FakeRegistry {
    fn read_installation(&self) -> Result<Option<PriorInstallationRecord>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.record.borrow().clone())
    }
}

pub enum FetchBehavior {
    Package(Vec<u8>),
    Status(u16),
    Fail(String),
}

pub struct FakeFetcher {
    pub behavior: FetchBehavior,
    pub requests: RefCell<Vec<(String, AuthHeaders)>>,
}

impl FakeFetcher {
    pub fn new(behavior: FetchBehavior) -> Self {
        Self {
            behavior,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl PackageFetcher for FakeFetcher {
    fn fetch(&self, url: &str, headers: &AuthHeaders) -> Result<Vec<u8>, TransportError> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), headers.clone()));
        match &self.behavior {
            FetchBehavior::Package(bytes) => Ok(bytes.clone()),
            FetchBehavior::Status(status) => Err(TransportError::Status { status: *status }),
            FetchBehavior::Fail(msg) => Err(TransportError::Request(msg.clone())),
        }
    }
}

/// 假安装程序：执行时把 `installs_version` 写入共享安装记录。
pub struct FakeInstaller {
    pub record: SharedRecord,
    pub installs_version: Option<String>,
    pub exit_code: i32,
    pub launch_fails: bool,
    /// 执行时把工作目录替换为同名普通文件，使随后的目录删除失败。
    pub replaces_work_dir: bool,
    pub runs: RefCell<Vec<(PathBuf, Vec<String>)>>,
    /// 执行时工作目录里观察到的文件名。
    pub seen_files: RefCell<Vec<String>>,
}

impl FakeInstaller {
    pub fn new(record: SharedRecord, installs_version: Option<&str>) -> Self {
        Self {
            record,
            installs_version: installs_version.map(str::to_string),
            exit_code: 0,
            launch_fails: false,
            replaces_work_dir: false,
            runs: RefCell::new(Vec::new()),
            seen_files: RefCell::new(Vec::new()),
        }
    }
}

impl Installer for FakeInstaller {
    fn run(&self, program: &Path, args: &[String], working_dir: &Path) -> Result<InstallerExit> {
        if self.launch_fails {
            return Err(anyhow!("启动安装程序失败: {}", program.display()));
        }
        self.runs
            .borrow_mut()
            .push((program.to_path_buf(), args.to_vec()));
        let mut seen: Vec<String> = dir_entries(working_dir)
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        seen.sort();
        *self.seen_files.borrow_mut() = seen;

        if self.replaces_work_dir {
            std::fs::remove_dir_all(working_dir)?;
            std::fs::write(working_dir, "not a directory")?;
        }

        if let Some(version) = &self.installs_version {
            let mut slot = self.record.borrow_mut();
            let (install_dir, data_dir) = match slot.as_ref() {
                Some(r) => (r.install_directory.clone(), r.data_directory.clone()),
                None => (PathBuf::from("C:\\Agent"), PathBuf::from("C:\\ProgramData\\Agent")),
            };
            *slot = Some(PriorInstallationRecord {
                version: version.clone(),
                install_directory: install_dir,
                data_directory: data_dir,
            });
        }
        Ok(InstallerExit {
            code: Some(self.exit_code),
        })
    }
}
