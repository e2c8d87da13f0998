//! 订正日志
//!
//! 以原始题块标识为键的只增日志：每次人工订正的重新解析都记一条，
//! 无论成败。原始错误记录从不被自动移除，整个订正过程可审计。

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::ParseErrorKind;
use crate::models::QuestionType;

/// 单次订正的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CorrectionOutcome {
    /// 重新解析成功，题目已追加进接受集
    Accepted { question_type: QuestionType },
    /// 重新解析仍然失败
    Rejected { reason: ParseErrorKind },
}

/// 一次订正尝试
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionAttempt {
    /// 原始题块标识
    pub block_index: usize,
    /// 该题块的第几次尝试（从 1 开始）
    pub attempt: usize,
    /// 订正后的题块文本
    pub corrected_text: String,
    pub outcome: CorrectionOutcome,
}

/// 订正日志（只增）
#[derive(Debug, Clone, Default)]
pub struct CorrectionLog {
    entries: Vec<CorrectionAttempt>,
}

impl CorrectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条订正记录，返回该题块的尝试序号
    pub fn record(
        &mut self,
        block_index: usize,
        corrected_text: impl Into<String>,
        outcome: CorrectionOutcome,
    ) -> usize {
        let attempt = self
            .entries
            .iter()
            .filter(|e| e.block_index == block_index)
            .count()
            + 1;

        self.entries.push(CorrectionAttempt {
            block_index,
            attempt,
            corrected_text: corrected_text.into(),
            outcome,
        });

        attempt
    }

    pub fn entries(&self) -> &[CorrectionAttempt] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 订正成功的条数
    pub fn accepted_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, CorrectionOutcome::Accepted { .. }))
            .count()
    }

    /// 导出为 JSON Lines 文本（每条尝试一行）
    pub fn to_json_lines(&self) -> Result<String> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_numbering_per_block() {
        let mut log = CorrectionLog::new();

        let first = log.record(
            3,
            "X\nA\nAnswer: A",
            CorrectionOutcome::Rejected {
                reason: ParseErrorKind::MissingAnswer,
            },
        );
        let second = log.record(
            3,
            "X\nA\nB\nAnswer: A",
            CorrectionOutcome::Accepted {
                question_type: QuestionType::MultipleChoice,
            },
        );
        let other = log.record(
            7,
            "Y\nAnswer: 4",
            CorrectionOutcome::Accepted {
                question_type: QuestionType::FillInBlank,
            },
        );

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(other, 1);
        assert_eq!(log.entries().len(), 3);
        assert_eq!(log.accepted_count(), 2);
    }

    #[test]
    fn test_json_lines_export() {
        let mut log = CorrectionLog::new();
        log.record(
            0,
            "Q\nAnswer: 4",
            CorrectionOutcome::Accepted {
                question_type: QuestionType::FillInBlank,
            },
        );

        let jsonl = log.to_json_lines().expect("导出失败");
        assert_eq!(jsonl.lines().count(), 1);
        assert!(jsonl.contains("\"block_index\":0"));
        assert!(jsonl.contains("Accepted"));
    }
}
