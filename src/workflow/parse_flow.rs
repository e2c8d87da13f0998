//! 文档解析流程 - 流程层
//!
//! 核心职责：定义"一个文档"的完整解析流程
//!
//! 流程顺序：
//! 1. 切分 → 逐题块分类 → 汇总接受集与错误集
//! 2. 残块上报（答案行分隔模式）
//! 3. 人工订正 → 重新解析 → 追加接受集（兜底，只增不删）

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{
    Block, CorrectionEntry, ErrorRecord, ParsedQuestion, ParserVariant, RawDocument, ValidQuestion,
};
use crate::services::{BlockSegmenter, QuestionClassifier};
use crate::utils::logging::truncate_text;
use crate::workflow::correction_log::{CorrectionLog, CorrectionOutcome};
use crate::workflow::document_ctx::DocumentCtx;

/// 单个文档的解析结果
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// 解析成功、进入导出的题目
    pub accepted: Vec<ValidQuestion>,
    /// 解析失败、等待人工订正的题块（从不自动移除）
    pub errors: Vec<ErrorRecord>,
}

/// 文档解析流程
///
/// - 编排完整的切分与分类流程
/// - 决定何时切分、何时分类、何时兜底
/// - 不持有任何文件资源
/// - 只依赖业务能力（services）
pub struct ParseFlow {
    segmenter: BlockSegmenter,
    classifier: QuestionClassifier,
    variant: ParserVariant,
    verbose_logging: bool,
}

impl ParseFlow {
    /// 创建新的解析流程
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_variant(config.parser_variant, config.verbose_logging)
    }

    /// 使用指定变体创建
    pub fn with_variant(variant: ParserVariant, verbose_logging: bool) -> Result<Self> {
        Ok(Self {
            segmenter: BlockSegmenter::new()?,
            classifier: QuestionClassifier::new(variant.stem_style())?,
            variant,
            verbose_logging,
        })
    }

    /// 解析一个文档
    pub fn run(&self, ctx: &DocumentCtx, doc: &RawDocument) -> ParseOutcome {
        let segmentation = self
            .segmenter
            .segment(&doc.content, self.variant.delimiter_mode());
        let total = segmentation.blocks.len();

        info!(
            "[文档 {}] 共切分出 {} 个题块（变体: {}）",
            ctx.doc_index, total, self.variant
        );

        let mut outcome = ParseOutcome::default();

        for block in &segmentation.blocks {
            if self.verbose_logging {
                info!(
                    "[文档 {}] 题块 {}/{}: {}",
                    ctx.doc_index,
                    block.index + 1,
                    total,
                    truncate_text(&block.text().replace('\n', " / "), 80)
                );
            }

            match self.classifier.classify(block) {
                ParsedQuestion::Valid(question) => {
                    info!(
                        "[文档 {}] ✓ 题块 {}/{} 解析为{}（{} 个选项）",
                        ctx.doc_index,
                        block.index + 1,
                        total,
                        question.question_type,
                        question.choice_count()
                    );
                    outcome.accepted.push(question);
                }
                ParsedQuestion::Error(record) => {
                    warn!(
                        "[文档 {}] ⚠️ 题块 {}/{} 解析失败: {}",
                        ctx.doc_index,
                        block.index + 1,
                        total,
                        record.reason()
                    );
                    outcome.errors.push(record);
                }
            }
        }

        // 答案行分隔模式下末尾的残余积累：作为错误记录上报，不静默丢弃
        if let Some(trailing) = segmentation.trailing {
            warn!(
                "[文档 {}] ⚠️ 末尾存在未以答案行结束的残块，已记录待订正",
                ctx.doc_index
            );
            outcome.errors.push(ErrorRecord::new(
                trailing.index,
                trailing.text(),
                crate::error::ParseErrorKind::MissingAnswer,
            ));
        }

        info!(
            "[文档 {}] 解析完成: 成功 {}, 失败 {}",
            ctx.doc_index,
            outcome.accepted.len(),
            outcome.errors.len()
        );

        outcome
    }

    /// 重新解析一段订正后的题块文本
    ///
    /// 订正文本整体视作单个题块，走同一套分类契约。
    pub fn reparse(
        &self,
        ctx: &DocumentCtx,
        block_index: usize,
        corrected_text: &str,
    ) -> ParsedQuestion {
        info!(
            "[文档 {}] 🔁 重新解析题块 {}",
            ctx.doc_index,
            block_index + 1
        );

        let block = Block::from_text(block_index, corrected_text);
        self.classifier.classify(&block)
    }

    /// 应用一批人工订正
    ///
    /// 成功的订正把题目追加进接受集；原始错误记录保留在错误集中，
    /// 由订正日志记录哪些订正成功。
    pub fn apply_corrections(
        &self,
        ctx: &DocumentCtx,
        outcome: &mut ParseOutcome,
        entries: &[CorrectionEntry],
        log: &mut CorrectionLog,
    ) {
        for entry in entries {
            match self.reparse(ctx, entry.block_index, &entry.text) {
                ParsedQuestion::Valid(question) => {
                    info!(
                        "[文档 {}] ✓ 题块 {} 订正成功（{}）",
                        ctx.doc_index,
                        entry.block_index + 1,
                        question.question_type
                    );
                    log.record(
                        entry.block_index,
                        entry.text.clone(),
                        CorrectionOutcome::Accepted {
                            question_type: question.question_type,
                        },
                    );
                    outcome.accepted.push(question);
                }
                ParsedQuestion::Error(record) => {
                    warn!(
                        "[文档 {}] ⚠️ 题块 {} 订正后仍失败: {}",
                        ctx.doc_index,
                        entry.block_index + 1,
                        record.reason()
                    );
                    log.record(
                        entry.block_index,
                        entry.text.clone(),
                        CorrectionOutcome::Rejected {
                            reason: record.kind,
                        },
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::models::DocumentFormat;

    fn ctx(variant: ParserVariant) -> DocumentCtx {
        DocumentCtx::new("test.txt".to_string(), 1, variant)
    }

    fn doc(content: &str) -> RawDocument {
        RawDocument::new("test.txt", DocumentFormat::Txt, content)
    }

    fn flow(variant: ParserVariant) -> ParseFlow {
        ParseFlow::with_variant(variant, false).expect("流程创建失败")
    }

    #[test]
    fn test_run_collects_accepted_and_errors() {
        let text = "Q1?\nBerlin\nParis\nAnswer: B\nlonely\nAnswer: \nQ3?\nTrue\nFalse\nAnswer: A\n";
        let flow = flow(ParserVariant::Classic);
        let outcome = flow.run(&ctx(ParserVariant::Classic), &doc(text));

        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, ParseErrorKind::UnparsableAnswer);
    }

    #[test]
    fn test_run_reports_trailing_block() {
        let text = "Q1?\na\nb\nAnswer: A\nQ2 without terminator\nchoice";
        let flow = flow(ParserVariant::Classic);
        let outcome = flow.run(&ctx(ParserVariant::Classic), &doc(text));

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, ParseErrorKind::MissingAnswer);
        assert_eq!(outcome.errors[0].block_index, 1);
    }

    #[test]
    fn test_correction_appends_without_removing_error() {
        let flow = flow(ParserVariant::Classic);
        let ctx = ctx(ParserVariant::Classic);

        // 单行残块：切分后没有答案行，进入错误集
        let mut outcome = flow.run(&ctx, &doc("no answer at all here"));
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        let original_errors = outcome.errors.len();

        let entries = vec![CorrectionEntry {
            block_index: outcome.errors[0].block_index,
            text: "X\nA\nB\nAnswer: A".to_string(),
        }];
        let mut log = CorrectionLog::new();
        flow.apply_corrections(&ctx, &mut outcome, &entries, &mut log);

        assert_eq!(outcome.accepted.len(), 1);
        // 原始错误记录保留，不自动移除
        assert_eq!(outcome.errors.len(), original_errors);
        assert_eq!(log.accepted_count(), 1);
    }

    #[test]
    fn test_failed_correction_logged_as_rejected() {
        let flow = flow(ParserVariant::Classic);
        let ctx = ctx(ParserVariant::Classic);
        let mut outcome = ParseOutcome::default();

        let entries = vec![CorrectionEntry {
            block_index: 5,
            text: "still broken".to_string(),
        }];
        let mut log = CorrectionLog::new();
        flow.apply_corrections(&ctx, &mut outcome, &entries, &mut log);

        assert!(outcome.accepted.is_empty());
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.accepted_count(), 0);
    }
}
