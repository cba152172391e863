//! 批量转换入口
//!
//! 扫描 → 规划任务 → 并行分发 → 汇总报告。只有扫描阶段的错误会中止整个批次。

use super::config::ConvertConfig;
use super::report::BatchReport;
use super::scanner::{scan_audio_files, show_scan_results};
use super::utils;
use crate::audio::codec::AudioCodec;
use crate::error::ConvertResult;
use crate::processing::dispatcher::{Dispatcher, WorkerPool, default_worker_count};
use crate::processing::job::plan_jobs;
use crate::processing::outcome::{JobEvent, JobState};
use crate::processing::worker::WorkerOptions;
use chrono::Local;
use crossbeam_channel::Receiver;
use std::path::Path;
use std::sync::Arc;

/// 控制台输出选项
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOptions {
    /// 打印进度行
    pub progress: bool,
    /// 列出扫描到的每个文件
    pub verbose: bool,
}

/// 使用配置中指定的编解码器执行批量转换
pub fn run_batch(config: &ConvertConfig, console: ConsoleOptions) -> ConvertResult<BatchReport> {
    config.validate()?;
    let codec = config.codec.build(config.ffmpeg_path.clone());
    log::debug!("编解码器 / codec: {}", codec.name());
    convert_directory(config, codec, console)
}

/// 批量转换主流程
pub fn convert_directory(
    config: &ConvertConfig,
    codec: Arc<dyn AudioCodec>,
    console: ConsoleOptions,
) -> ConvertResult<BatchReport> {
    config.validate()?;
    let started_at = Local::now();

    // 1. 扫描（唯一的致命路径）
    let sources = scan_audio_files(&config.root_directory, &config.input_extensions)?;
    if console.progress {
        show_scan_results(config, &sources, console.verbose);
    }

    // 2. 规划任务
    let plan = plan_jobs(&sources, &config.encode_settings(), &config.output_policy());
    if !codec.supports_output(&config.output_format) {
        log::warn!(
            "编解码器 {} 可能不支持输出格式 {} / codec may not support output format",
            codec.name(),
            config.output_format
        );
    }

    // 3. 并行分发
    let worker_count = config.worker_count.unwrap_or_else(default_worker_count);
    let pool = WorkerPool::new(worker_count)?;
    let dispatcher = Dispatcher::new(
        pool,
        codec,
        WorkerOptions {
            delete_originals: config.delete_originals,
        },
    );

    if console.progress && !plan.jobs.is_empty() {
        println!(
            "[INFO] 启用并行转换 / parallel conversion: {} workers, {} jobs",
            dispatcher.worker_count(),
            plan.jobs.len()
        );
    }

    let mut outcomes = if console.progress {
        let (tx, rx) = crossbeam_channel::unbounded();
        std::thread::scope(|scope| {
            let root = config.root_directory.as_path();
            scope.spawn(move || print_progress(rx, root));
            let outcomes = dispatcher.dispatch_observed(&plan.jobs, Some(&tx));
            // 关闭通道，结束进度线程
            drop(tx);
            outcomes
        })
    } else {
        dispatcher.dispatch(&plan.jobs)
    };

    // 4. 被拒绝的源文件同样计入结果
    for rejected in &plan.rejected {
        if console.progress {
            println!(
                "[SKIP] {} - {}",
                utils::display_relative(rejected.source_path(), &config.root_directory),
                rejected.error_message().unwrap_or_default()
            );
        }
    }
    outcomes.extend(plan.rejected);

    Ok(BatchReport {
        root: config.root_directory.clone(),
        output_format: config.output_format.clone(),
        worker_count,
        started_at,
        finished_at: Local::now(),
        outcomes,
    })
}

/// 消费状态事件并打印进度行
fn print_progress(rx: Receiver<JobEvent>, root: &Path) {
    let mut finished = 0usize;

    for event in rx.iter() {
        let source = utils::display_relative(&event.source, root);
        match event.state {
            JobState::Pending => {}
            JobState::Running => {
                println!(
                    "[CONVERTING] [{}/{}] {} -> {}",
                    event.index + 1,
                    event.total,
                    source,
                    utils::display_relative(&event.dest, root)
                );
            }
            JobState::Succeeded => {
                finished += 1;
                match &event.message {
                    Some(warning) => println!(
                        "[OK] [{finished}/{}] {source} (源文件未删除 / source kept: {warning})",
                        event.total
                    ),
                    None => println!("[OK] [{finished}/{}] {source}", event.total),
                }
            }
            JobState::Failed => {
                finished += 1;
                let message = event.message.as_deref().unwrap_or_default();
                println!("[FAIL] [{finished}/{}] {source} - {message}", event.total);
            }
        }
    }
}
