//! 任务结果与状态机
//!
//! 每个任务：`Pending → Running → {Succeeded, Failed}`，终态不可离开。

use serde::Serialize;
use std::path::{Path, PathBuf};

/// 源文件清理状态（不影响转换结果）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum CleanupStatus {
    /// 源文件已删除
    Deleted,
    /// 配置为保留源文件
    Kept,
    /// 删除失败，源文件仍在
    Failed(String),
}

/// 单个任务的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// 目标文件已写出
    Success {
        source: PathBuf,
        dest: PathBuf,
        cleanup: CleanupStatus,
    },
    /// 转换失败（源文件未被触碰）
    Failure { source: PathBuf, message: String },
}

impl ConversionOutcome {
    pub fn success(source: PathBuf, dest: PathBuf, cleanup: CleanupStatus) -> Self {
        Self::Success {
            source,
            dest,
            cleanup,
        }
    }

    pub fn failure(source: PathBuf, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "未知错误 / unknown error".to_string();
        }
        Self::Failure { source, message }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn source_path(&self) -> &Path {
        match self {
            Self::Success { source, .. } | Self::Failure { source, .. } => source,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failure { message, .. } => Some(message),
            Self::Success { .. } => None,
        }
    }

    /// 成功但清理失败
    pub fn cleanup_failed(&self) -> bool {
        matches!(
            self,
            Self::Success {
                cleanup: CleanupStatus::Failed(_),
                ..
            }
        )
    }

    /// 对应的终态
    pub fn terminal_state(&self) -> JobState {
        if self.is_success() {
            JobState::Succeeded
        } else {
            JobState::Failed
        }
    }
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// 状态机允许的迁移
    pub fn can_transition_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running)
                | (Self::Running, Self::Succeeded)
                | (Self::Running, Self::Failed)
        )
    }
}

/// 任务状态迁移事件（由Dispatcher发出）
#[derive(Debug, Clone)]
pub struct JobEvent {
    /// 提交序号（从0开始）
    pub index: usize,
    /// 本批任务总数
    pub total: usize,
    pub source: PathBuf,
    pub dest: PathBuf,
    pub state: JobState,
    /// 失败原因或清理警告
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine() {
        assert!(JobState::Pending.can_transition_to(JobState::Running));
        assert!(JobState::Running.can_transition_to(JobState::Succeeded));
        assert!(JobState::Running.can_transition_to(JobState::Failed));

        assert!(!JobState::Pending.can_transition_to(JobState::Succeeded));
        assert!(!JobState::Succeeded.can_transition_to(JobState::Running));
        assert!(!JobState::Failed.can_transition_to(JobState::Succeeded));
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Running.is_terminal());
    }

    #[test]
    fn test_failure_message_never_empty() {
        let outcome = ConversionOutcome::failure(PathBuf::from("a.wav"), "  ");
        assert!(!outcome.error_message().unwrap().trim().is_empty());
    }

    #[test]
    fn test_cleanup_failure_still_success() {
        let outcome = ConversionOutcome::success(
            PathBuf::from("a.wav"),
            PathBuf::from("a.mp3"),
            CleanupStatus::Failed("permission denied".into()),
        );
        assert!(outcome.is_success());
        assert!(outcome.cleanup_failed());
        assert_eq!(outcome.terminal_state(), JobState::Succeeded);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = ConversionOutcome::failure(PathBuf::from("bad.wav"), "decode failed");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["message"], "decode failed");
    }
}
