//! 警告写入服务 - 业务能力层
//!
//! 只负责"把解析失败的题块写入 warn 文件"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::models::ErrorRecord;

/// 警告写入服务
///
/// 职责：
/// - 将解析失败的题块连同失败原因追加到 warn 文件，供人工订正
/// - 只处理单条错误记录
/// - 不出现 Vec<ErrorRecord>
/// - 不关心流程顺序
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 创建新的警告写入服务
    pub fn new() -> Self {
        Self {
            warn_file_path: "warn.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入一条错误记录
    ///
    /// 题块原文压成单行写入，便于在 warn 文件里逐行检视。
    pub async fn write(&self, doc_name: &str, record: &ErrorRecord) -> Result<()> {
        debug!(
            "写入警告: 文档 {} | 题块 {} | 原因: {}",
            doc_name,
            record.block_index + 1,
            record.reason()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)?;

        let flattened = record.block_text.replace('\n', " / ");
        let warn_msg = format!(
            "文档 {} | 题块 {} | 原因: {} | 原文: {}\n",
            doc_name,
            record.block_index + 1,
            record.reason(),
            flattened
        );

        file.write_all(warn_msg.as_bytes())?;

        Ok(())
    }
}

impl Default for WarnWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn test_write_appends_one_line_per_record() {
        let path = std::env::temp_dir().join("quiz_csv_export_warn_test.txt");
        let _ = std::fs::remove_file(&path);

        let writer = WarnWriter::with_path(path.to_string_lossy().to_string());
        let record = ErrorRecord::new(2, "Only one line", ParseErrorKind::TooFewLines { found: 1 });

        tokio_test::block_on(writer.write("sample.txt", &record)).expect("写入失败");
        tokio_test::block_on(writer.write("sample.txt", &record)).expect("写入失败");

        let content = std::fs::read_to_string(&path).expect("读取失败");
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("文档 sample.txt"));
        assert!(content.contains("题块 3"));
        assert!(content.contains("Only one line"));

        let _ = std::fs::remove_file(&path);
    }
}
