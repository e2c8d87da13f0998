use std::fmt;

use crate::models::document::DocumentFormat;

/// 题块解析错误分类
///
/// 解析错误是数据而不是控制流：一个坏题块只会变成一条 ErrorRecord，
/// 绝不会中断其余题块的处理。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ParseErrorKind {
    /// 题块行数不足
    TooFewLines { found: usize },
    /// 缺少答案声明行
    MissingAnswer,
    /// 答案行存在但无法提取答案值
    UnparsableAnswer,
    /// 题干不符合要求的格式（编号缺失、题块以答案行开头等）
    InvalidQuestionFormat,
    /// 期望选项时选项数量不足
    InsufficientChoices { found: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::TooFewLines { found } => {
                write!(f, "题块行数不足（仅 {} 行）", found)
            }
            ParseErrorKind::MissingAnswer => write!(f, "缺少答案声明行"),
            ParseErrorKind::UnparsableAnswer => write!(f, "无法从答案行提取答案值"),
            ParseErrorKind::InvalidQuestionFormat => write!(f, "题干格式无效"),
            ParseErrorKind::InsufficientChoices { found } => {
                write!(f, "选项数量不足（仅 {} 个）", found)
            }
        }
    }
}

/// 文本提取错误
///
/// 文档解码本身由外部协作方负责，核心只识别"拿不到文本"这一事实。
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// 该格式需要外部解码器，当前提取器无法处理
    #[error("不支持的文档格式: {0}，需要外部解码器")]
    DecoderUnavailable(DocumentFormat),
    /// 文件内容不是合法的 UTF-8 文本
    #[error("文档编码无效（非 UTF-8）: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
}
