use serde::{Deserialize, Serialize};

use crate::error::ParseErrorKind;
use crate::models::question_type::QuestionType;

/// 满分分值（百分比）
pub const FULL_SCORE: u8 = 100;

/// 题块
///
/// 一道候选题目的有序非空行序列。`index` 是题块在文档中的位置，
/// 也是订正日志引用原始题块的唯一标识。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: usize,
    pub lines: Vec<String>,
}

impl Block {
    pub fn new(index: usize, lines: Vec<String>) -> Self {
        Self { index, lines }
    }

    /// 从原始文本构建题块（去掉空行并修剪两端空白）
    pub fn from_text(index: usize, text: &str) -> Self {
        let lines = text
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self { index, lines }
    }

    /// 还原为按行拼接的文本
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// 提取出的答案值
///
/// 答案行要么给出单个字母（按选项位置计分），要么给出自由文本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerKey {
    /// 单个答案字母（已转为大写）
    Letter(char),
    /// 答案标记之后的自由文本
    Text(String),
}

/// 输出行
///
/// CSV 协作方消费的最小单元。行布局约定：每道题的首行只携带题干
/// （score 与 answer 为空），其后每个选项一行（question 为空）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub question: String,
    pub score: Option<u8>,
    pub answer: String,
}

impl OutputRow {
    /// 题干行
    pub fn stem(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            score: None,
            answer: String::new(),
        }
    }

    /// 选项行（或填空题的答案行）
    pub fn choice(score: u8, answer: impl Into<String>) -> Self {
        Self {
            question: String::new(),
            score: Some(score),
            answer: answer.into(),
        }
    }
}

/// 解析成功的题目
///
/// 不变式：首行为题干行；选择题与判断题在答案命中时恰有一行计 100 分，
/// 填空题恰好产出一条计 100 分的答案行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidQuestion {
    pub question_type: QuestionType,
    pub stem: String,
    pub rows: Vec<OutputRow>,
}

impl ValidQuestion {
    pub fn new(question_type: QuestionType, stem: impl Into<String>, rows: Vec<OutputRow>) -> Self {
        Self {
            question_type,
            stem: stem.into(),
            rows,
        }
    }

    /// 选项行数量（不含题干行）
    pub fn choice_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// 计满分的行数量
    pub fn scored_row_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.score == Some(FULL_SCORE))
            .count()
    }
}

/// 结构校验失败的题块
///
/// 保留原文与可读的失败原因，供人工订正后重新解析；
/// 本身绝不进入导出结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub block_index: usize,
    pub block_text: String,
    pub kind: ParseErrorKind,
}

impl ErrorRecord {
    pub fn new(block_index: usize, block_text: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            block_index,
            block_text: block_text.into(),
            kind,
        }
    }

    /// 人工可读的失败原因
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "题块 #{}: {}", self.block_index + 1, self.kind)
    }
}

/// 单个题块的解析结果
#[derive(Debug, Clone)]
pub enum ParsedQuestion {
    Valid(ValidQuestion),
    Error(ErrorRecord),
}

impl ParsedQuestion {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedQuestion::Valid(_))
    }

    pub fn as_valid(&self) -> Option<&ValidQuestion> {
        match self {
            ParsedQuestion::Valid(q) => Some(q),
            ParsedQuestion::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorRecord> {
        match self {
            ParsedQuestion::Valid(_) => None,
            ParsedQuestion::Error(rec) => Some(rec),
        }
    }
}
