//! 批量转换处理模块
//!
//! 任务构建、单任务worker与有界并行分发。

pub mod dispatcher;
pub mod job;
pub mod outcome;
pub mod worker;

pub use dispatcher::{Dispatcher, WorkerPool, default_worker_count};
pub use job::{ConversionJob, EncodeSettings, JobPlan, OutputDirPolicy, build_job, plan_jobs};
pub use outcome::{CleanupStatus, ConversionOutcome, JobEvent, JobState};
pub use worker::{WorkerOptions, run_job};
