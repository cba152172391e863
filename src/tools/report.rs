//! 批量转换报告
//!
//! 汇总所有任务结果：控制台表格（comfy-table）与可选的JSON报告文件。

use crate::error::ConvertResult;
use crate::processing::outcome::ConversionOutcome;
use chrono::{DateTime, Local};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 单次批量运行的结果报告
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// 扫描根目录
    pub root: PathBuf,
    /// 输出格式
    pub output_format: String,
    /// 实际使用的worker数量
    pub worker_count: usize,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// 每个源文件一条结果
    pub outcomes: Vec<ConversionOutcome>,
}

impl BatchReport {
    #[inline]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// 转换成功但源文件未能删除的数量
    pub fn cleanup_failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.cleanup_failed()).count()
    }

    /// 成功转换的源文件列表
    pub fn converted_sources(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(ConversionOutcome::source_path)
            .collect()
    }

    /// 失败的源文件及原因
    pub fn failures(&self) -> Vec<(&Path, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error_message().map(|m| (o.source_path(), m)))
            .collect()
    }

    /// 耗时（秒）
    pub fn elapsed_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// 成功率（百分比）
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            100.0
        } else {
            self.succeeded() as f64 / self.total() as f64 * 100.0
        }
    }

    /// 汇总表格
    pub fn render_summary(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["项目 / Item", "值 / Value"]);

        table.add_row(vec!["根目录 / Root".to_string(), self.root.display().to_string()]);
        table.add_row(vec!["输出格式 / Format".to_string(), self.output_format.clone()]);
        table.add_row(vec!["Workers".to_string(), self.worker_count.to_string()]);
        table.add_row(vec!["总文件数 / Total".to_string(), self.total().to_string()]);
        table.add_row(vec!["成功 / Succeeded".to_string(), self.succeeded().to_string()]);
        table.add_row(vec!["失败 / Failed".to_string(), self.failed().to_string()]);
        table.add_row(vec![
            "清理失败 / Cleanup failures".to_string(),
            self.cleanup_failures().to_string(),
        ]);
        table.add_row(vec![
            "成功率 / Success rate".to_string(),
            format!("{:.1}%", self.success_rate()),
        ]);
        table.add_row(vec![
            "耗时 / Elapsed".to_string(),
            format!("{:.2}s", self.elapsed_seconds()),
        ]);
        table
    }

    /// 打印汇总与成功列表
    pub fn print_summary(&self) {
        println!();
        println!("[SUMMARY] 批量转换完成 / Batch finished");
        println!("{}", self.render_summary());

        let converted = self.converted_sources();
        if !converted.is_empty() {
            println!("[SUMMARY] 已转换文件 / Converted files:");
            for source in converted {
                println!("   {}", source.display());
            }
        }

        let failures = self.failures();
        if !failures.is_empty() {
            println!("[SUMMARY] 失败文件 / Failed files:");
            for (source, message) in failures {
                println!("   {} - {message}", source.display());
            }
        }
    }

    /// 写出JSON报告
    pub fn write_json(&self, path: &Path) -> ConvertResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::outcome::CleanupStatus;

    fn sample_report() -> BatchReport {
        let now = Local::now();
        BatchReport {
            root: PathBuf::from("/music"),
            output_format: "mp3".to_string(),
            worker_count: 4,
            started_at: now,
            finished_at: now + chrono::Duration::milliseconds(1500),
            outcomes: vec![
                ConversionOutcome::success(
                    PathBuf::from("/music/a.wav"),
                    PathBuf::from("/music/a.mp3"),
                    CleanupStatus::Deleted,
                ),
                ConversionOutcome::success(
                    PathBuf::from("/music/b.wav"),
                    PathBuf::from("/music/b.mp3"),
                    CleanupStatus::Failed("permission denied".into()),
                ),
                ConversionOutcome::failure(PathBuf::from("/music/c.wav"), "corrupted"),
            ],
        }
    }

    #[test]
    fn test_counts() {
        let report = sample_report();
        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.cleanup_failures(), 1);
        assert_eq!(
            report.converted_sources(),
            vec![Path::new("/music/a.wav"), Path::new("/music/b.wav")]
        );
        assert!((report.elapsed_seconds() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report_rate() {
        let mut report = sample_report();
        report.outcomes.clear();
        assert_eq!(report.success_rate(), 100.0);
    }

    #[test]
    fn test_summary_table_mentions_counts() {
        let rendered = sample_report().render_summary().to_string();
        assert!(rendered.contains("mp3"));
        assert!(rendered.contains("66.7%"));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        sample_report().write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["outcomes"].as_array().unwrap().len(), 3);
        assert_eq!(value["outcomes"][2]["outcome"], "failure");
    }
}
