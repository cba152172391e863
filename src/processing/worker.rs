//! 转换worker
//!
//! 执行单个任务并在worker边界把所有错误（包括panic）转为 `Failure`。
//! 成功后立即在同一任务内清理源文件；清理失败只记日志，不降级结果。

use super::job::ConversionJob;
use super::outcome::{CleanupStatus, ConversionOutcome};
use crate::audio::codec::AudioCodec;
use crate::error::{ConvertError, ConvertResult};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

/// worker行为选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerOptions {
    /// 转换成功后删除源文件
    pub delete_originals: bool,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            delete_originals: true,
        }
    }
}

/// 执行单个任务
///
/// 编解码器写入同目录下的暂存文件，成功后再重命名为目标路径；
/// 失败时只删除暂存文件，已存在的目标文件保持不变。
pub fn run_job(codec: &dyn AudioCodec, job: &ConversionJob, options: WorkerOptions) -> ConversionOutcome {
    let staged = ConversionJob {
        dest_path: staging_path(&job.dest_path),
        ..job.clone()
    };

    let result = convert_guarded(codec, &staged).and_then(|()| commit_output(&staged.dest_path, &job.dest_path));

    match result {
        Ok(()) => {
            let cleanup = if options.delete_originals {
                cleanup_source(&job.source_path)
            } else {
                CleanupStatus::Kept
            };
            ConversionOutcome::success(job.source_path.clone(), job.dest_path.clone(), cleanup)
        }
        Err(e) => {
            log::debug!("任务失败 / job failed: {}: {e}", job.source_path.display());
            discard_partial_output(&staged.dest_path);
            ConversionOutcome::failure(job.source_path.clone(), e.to_string())
        }
    }
}

/// 暂存文件路径：与目标同目录，保留扩展名（ffmpeg按扩展名选择封装格式）
pub fn staging_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".partial-{name}"))
}

/// 暂存文件替换目标文件
fn commit_output(staged: &Path, dest: &Path) -> ConvertResult<()> {
    std::fs::rename(staged, dest).map_err(|e| {
        ConvertError::Encoding(format!(
            "无法写入目标 / cannot move output into place {}: {e}",
            dest.display()
        ))
    })
}

/// 调用编解码器，捕获panic
fn convert_guarded(codec: &dyn AudioCodec, job: &ConversionJob) -> ConvertResult<()> {
    if let Some(parent) = job.dest_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    match catch_unwind(AssertUnwindSafe(|| codec.convert(job))) {
        Ok(result) => result,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(ConvertError::conversion_failed(
                format!("编解码器panic / codec panicked: {detail}"),
                None,
            ))
        }
    }
}

/// 删除源文件
fn cleanup_source(source: &Path) -> CleanupStatus {
    match std::fs::remove_file(source) {
        Ok(()) => CleanupStatus::Deleted,
        Err(e) => {
            let err = ConvertError::Cleanup {
                path: source.to_path_buf(),
                source: e,
            };
            log::warn!("{err}");
            CleanupStatus::Failed(err.to_string())
        }
    }
}

/// 失败任务不留下暂存文件
fn discard_partial_output(staged: &Path) {
    if staged.exists()
        && let Err(e) = std::fs::remove_file(staged)
    {
        log::debug!("无法删除暂存输出 / cannot remove partial output {}: {e}", staged.display());
    }
}
