//! 单个文档处理器 - 编排层
//!
//! 负责一个文档从文件到 CSV 的完整过程：
//! 提取文本 → 解析流程 → 应用订正 → 写 warn 文件 → 导出 CSV

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::{PlainTextExtractor, TextExtractor};
use crate::models::{load_corrections_if_present, DocumentFormat, RawDocument};
use crate::services::{CsvWriter, WarnWriter};
use crate::utils::logging::truncate_text;
use crate::workflow::{CorrectionLog, DocumentCtx, ParseFlow, ParseOutcome};

/// 处理单个文档
///
/// # 参数
/// - `extractor`: 文本提取器
/// - `doc_path`: 文档路径
/// - `doc_index`: 文档索引（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 返回是否成功处理（true=已导出，false=跳过）
pub async fn process_document(
    extractor: &PlainTextExtractor,
    doc_path: &Path,
    doc_index: usize,
    config: &Config,
) -> Result<bool> {
    let doc_name = doc_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    // 识别格式；不支持的扩展名在切分开始前即中止，无需回滚
    let format = match DocumentFormat::from_path(doc_path) {
        Some(format) => format,
        None => {
            warn!("[文档 {}] ⚠️ 不支持的文件类型: {}，已跳过", doc_index, doc_name);
            return Ok(false);
        }
    };

    log_document_start(doc_index, &doc_name, format);

    // 提取文本
    let bytes = tokio::fs::read(doc_path)
        .await
        .with_context(|| format!("无法读取文件: {}", doc_path.display()))?;

    let content = match extractor.extract_text(&bytes, format) {
        Ok(text) => text,
        Err(e) => {
            warn!("[文档 {}] ⚠️ 文本提取失败: {}，已跳过", doc_index, e);
            return Ok(false);
        }
    };

    if content.is_empty() {
        warn!("[文档 {}] ⚠️ 提取结果为空，已跳过", doc_index);
        return Ok(false);
    }

    if config.verbose_logging {
        info!(
            "[文档 {}] 文本预览: {}",
            doc_index,
            truncate_text(&content.replace('\n', " / "), 80)
        );
    }

    let doc = RawDocument::new(doc_name.clone(), format, content);
    let ctx = DocumentCtx::new(doc_name.clone(), doc_index, config.parser_variant);

    // 解析
    let flow = ParseFlow::new(config)?;
    let mut outcome = flow.run(&ctx, &doc);

    // 应用同名订正文件（如有）
    let mut correction_log = CorrectionLog::new();
    let corrections_path = doc_path.with_extension("corrections.toml");
    if let Some(file) = load_corrections_if_present(&corrections_path).await? {
        flow.apply_corrections(&ctx, &mut outcome, &file.correction, &mut correction_log);
    }

    // 失败题块写入 warn 文件，供人工订正
    let warn_writer = WarnWriter::with_path(config.warn_file.clone());
    for record in &outcome.errors {
        warn_writer.write(&doc_name, record).await?;
    }
    if !outcome.errors.is_empty() {
        warn!(
            "[文档 {}] ⚠️ {} 个题块待订正，已写入 {}",
            doc_index,
            outcome.errors.len(),
            config.warn_file
        );
    }

    // 导出 CSV
    if outcome.accepted.is_empty() {
        warn!("[文档 {}] ⚠️ 没有解析成功的题目，跳过导出", doc_index);
        return Ok(false);
    }

    tokio::fs::create_dir_all(&config.output_folder)
        .await
        .with_context(|| format!("无法创建导出目录: {}", config.output_folder))?;

    let file_stem = doc_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let csv_path = Path::new(&config.output_folder).join(format!("{}_D2L_quiz.csv", file_stem));

    CsvWriter::new()
        .write_to_file(&csv_path, &outcome.accepted)
        .await?;
    info!("[文档 {}] ✓ CSV 已导出: {}", doc_index, csv_path.display());

    // 订正审计日志（只在发生过订正时写）
    if !correction_log.is_empty() {
        let audit_path =
            Path::new(&config.output_folder).join(format!("{}_corrections.jsonl", file_stem));
        tokio::fs::write(&audit_path, correction_log.to_json_lines()?)
            .await
            .with_context(|| format!("无法写入订正审计: {}", audit_path.display()))?;
        info!(
            "[文档 {}] 订正审计已导出: {}（成功 {}/{}）",
            doc_index,
            audit_path.display(),
            correction_log.accepted_count(),
            correction_log.entries().len()
        );
    }

    log_document_complete(doc_index, &outcome, &correction_log);

    Ok(true)
}

// ========== 日志辅助函数 ==========

fn log_document_start(doc_index: usize, doc_name: &str, format: DocumentFormat) {
    info!("[文档 {}] 开始处理", doc_index);
    info!("[文档 {}] 名称: {}", doc_index, doc_name);
    info!("[文档 {}] 格式: {}", doc_index, format.name());
}

fn log_document_complete(doc_index: usize, outcome: &ParseOutcome, log: &CorrectionLog) {
    info!(
        "[文档 {}] 题块统计: 成功 {}, 失败 {}, 订正成功 {}",
        doc_index,
        outcome.accepted.len(),
        outcome.errors.len(),
        log.accepted_count()
    );
    info!("\n[文档 {}] ✅ 文档处理完成\n", doc_index);
}
