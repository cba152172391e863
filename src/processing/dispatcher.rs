//! 任务分发器
//!
//! 使用显式构建的rayon线程池把任务扇出到固定数量的worker，
//! 阻塞直到全部完成，按提交顺序返回每个任务的结果。

use super::job::ConversionJob;
use super::outcome::{CleanupStatus, ConversionOutcome, JobEvent, JobState};
use super::worker::{WorkerOptions, run_job};
use crate::audio::codec::AudioCodec;
use crate::error::{ConvertError, ConvertResult};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::sync::Arc;

/// 固定大小的worker池
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    size: usize,
}

impl WorkerPool {
    /// 创建指定大小的线程池
    pub fn new(size: usize) -> ConvertResult<Self> {
        if size == 0 {
            return Err(ConvertError::InvalidInput(
                "worker数量必须至少为1 / worker count must be at least 1".to_string(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("convert-worker-{i}"))
            .build()
            .map_err(|e| ConvertError::Resource(format!("线程池创建失败 / thread pool: {e}")))?;

        Ok(Self { pool, size })
    }

    /// 按主机可用核心数创建
    pub fn with_default_size() -> ConvertResult<Self> {
        Self::new(default_worker_count())
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }
}

/// 主机可用并行度（至少为1）
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// 批量任务分发器
pub struct Dispatcher {
    pool: WorkerPool,
    codec: Arc<dyn AudioCodec>,
    options: WorkerOptions,
}

impl Dispatcher {
    pub fn new(pool: WorkerPool, codec: Arc<dyn AudioCodec>, options: WorkerOptions) -> Self {
        Self {
            pool,
            codec,
            options,
        }
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.pool.size()
    }

    /// 执行全部任务，返回按提交顺序排列的结果
    pub fn dispatch(&self, jobs: &[ConversionJob]) -> Vec<ConversionOutcome> {
        self.dispatch_observed(jobs, None)
    }

    /// 执行全部任务，并把每次状态迁移发送到 `events`
    ///
    /// 接收端提前关闭不影响执行。
    pub fn dispatch_observed(
        &self,
        jobs: &[ConversionJob],
        events: Option<&Sender<JobEvent>>,
    ) -> Vec<ConversionOutcome> {
        let total = jobs.len();
        let emit = |index: usize, job: &ConversionJob, state: JobState, message: Option<String>| {
            if let Some(tx) = events {
                let _ = tx.send(JobEvent {
                    index,
                    total,
                    source: job.source_path.clone(),
                    dest: job.dest_path.clone(),
                    state,
                    message,
                });
            }
        };

        for (index, job) in jobs.iter().enumerate() {
            emit(index, job, JobState::Pending, None);
        }

        let codec = self.codec.as_ref();
        let options = self.options;

        // 索引化并行迭代的collect保持提交顺序
        self.pool.pool.install(|| {
            jobs.par_iter()
                .enumerate()
                .map(|(index, job)| {
                    emit(index, job, JobState::Running, None);
                    let outcome = run_job(codec, job, options);

                    let message = match &outcome {
                        ConversionOutcome::Failure { message, .. } => Some(message.clone()),
                        ConversionOutcome::Success {
                            cleanup: CleanupStatus::Failed(msg),
                            ..
                        } => Some(msg.clone()),
                        ConversionOutcome::Success { .. } => None,
                    };
                    emit(index, job, outcome.terminal_state(), message);
                    outcome
                })
                .collect()
        })
    }
}
