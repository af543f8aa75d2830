use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use partfuse::partfuse_job::{GenerateError, Generator};
use partfuse::partfuse_mesh::{MeshCodec, TriangleMesh};
use uuid::Uuid;

use crate::codec::StlCodec;

/// Generator that runs the pipeline in a `unify` subprocess so a runaway
/// union cannot destabilize the consuming process. The child installs the
/// virtual-memory ceiling on itself before touching the payload.
pub struct SandboxedGenerator {
    exe: PathBuf,
    store_root: PathBuf,
    memory_limit_mb: Option<u64>,
}

impl SandboxedGenerator {
    pub fn new(exe: PathBuf, store_root: PathBuf, memory_limit_mb: Option<u64>) -> Self {
        Self {
            exe,
            store_root,
            memory_limit_mb,
        }
    }
}

impl Generator for SandboxedGenerator {
    fn generate(&mut self, metadata: &serde_json::Value) -> Result<TriangleMesh, GenerateError> {
        let token = Uuid::new_v4();
        let metadata_path = std::env::temp_dir().join(format!("partfuse-{token}.json"));
        let output_path = std::env::temp_dir().join(format!("partfuse-{token}.stl"));

        let result = self.run_unify(metadata, &metadata_path, &output_path);

        let _ = fs::remove_file(&metadata_path);
        let _ = fs::remove_file(&output_path);

        result
    }
}

impl SandboxedGenerator {
    fn run_unify(
        &self,
        metadata: &serde_json::Value,
        metadata_path: &Path,
        output_path: &Path,
    ) -> Result<TriangleMesh, GenerateError> {
        let payload = serde_json::to_vec(metadata).map_err(GenerateError::other)?;
        fs::write(metadata_path, payload).map_err(GenerateError::other)?;

        let mut command = Command::new(&self.exe);
        command
            .arg("unify")
            .arg(metadata_path)
            .arg(output_path)
            .arg("--store-root")
            .arg(&self.store_root);
        if let Some(limit) = self.memory_limit_mb {
            command.arg("--memory-limit-mb").arg(limit.to_string());
        }

        let status = command.status().map_err(GenerateError::other)?;
        if !status.success() {
            if killed_by_resource_limit(&status) {
                return Err(GenerateError::ResourceExceeded);
            }
            return Err(GenerateError::other(format!("unify exited with {status}")));
        }

        let data = fs::read(output_path).map_err(GenerateError::other)?;
        StlCodec.decode(&data).map_err(GenerateError::other)
    }
}

/// An allocator that hits RLIMIT_AS aborts the process, so a signal death is
/// read as the ceiling firing rather than a pipeline bug.
#[cfg(unix)]
fn killed_by_resource_limit(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;

    matches!(status.signal(), Some(libc::SIGABRT) | Some(libc::SIGKILL))
}

#[cfg(not(unix))]
fn killed_by_resource_limit(_status: &ExitStatus) -> bool {
    false
}

/// Caps this process's virtual memory. Exceeding the cap surfaces as an
/// allocation failure and a non-zero exit that the parent maps to a
/// generation failure.
#[cfg(unix)]
pub fn install_memory_ceiling(limit_mb: u64) -> anyhow::Result<()> {
    let limit = libc::rlimit {
        rlim_cur: limit_mb * 1024 * 1024,
        rlim_max: libc::RLIM_INFINITY,
    };

    // SAFETY: setrlimit only reads the limit struct passed by pointer.
    let rc = unsafe { libc::setrlimit(libc::RLIMIT_AS, &limit) };
    if rc != 0 {
        return Err(anyhow::anyhow!(
            "setrlimit failed: {}",
            std::io::Error::last_os_error()
        ));
    }

    log::info!("virtual memory ceiling set to {limit_mb} MB");
    Ok(())
}

#[cfg(not(unix))]
pub fn install_memory_ceiling(limit_mb: u64) -> anyhow::Result<()> {
    log::warn!("memory ceiling of {limit_mb} MB not supported on this platform");
    Ok(())
}
