//! 文本提取 - 基础设施层
//!
//! 持有"从文件字节拿到规范化文本"这一能力，只暴露能力本身。
//! 文档格式的真正解码（docx/pdf）由外部协作方完成，
//! 核心只约定返回值：按原始顺序、换行拼接的段落文本。

use crate::error::ExtractError;
use crate::models::DocumentFormat;

/// 文本提取能力
///
/// 契约：返回换行拼接的段落文本，段落顺序与原文一致；
/// 除此之外不做任何假设。
pub trait TextExtractor {
    fn extract_text(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractError>;
}

/// 纯文本提取器
///
/// 处理已由外部工具完成解码的 `.txt` 文档：
/// 逐行修剪行尾空白，连续空行压成一个（段落分隔对空行分隔变体有意义），
/// 去掉首尾空行后按换行拼接。
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractError> {
        match format {
            DocumentFormat::Txt => {
                let content = String::from_utf8(bytes.to_vec())?;
                Ok(normalize_lines(&content))
            }
            other => Err(ExtractError::DecoderUnavailable(other)),
        }
    }
}

/// 规范化提取文本
fn normalize_lines(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            // 连续空行压成一个，保留段落边界
            if !previous_blank && !lines.is_empty() {
                lines.push("");
            }
            previous_blank = true;
        } else {
            lines.push(trimmed);
            previous_blank = false;
        }
    }

    // 去掉末尾残留的空行
    while lines.last() == Some(&"") {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_text_normalizes() {
        let raw = b"  Q1?  \nBerlin\r\nParis\n\n\n\nQ2?\nAnswer: 4\n\n";
        let text = PlainTextExtractor::new()
            .extract_text(raw, DocumentFormat::Txt)
            .expect("提取失败");

        assert_eq!(text, "Q1?\nBerlin\nParis\n\nQ2?\nAnswer: 4");
    }

    #[test]
    fn test_paragraph_order_preserved() {
        let raw = b"first\n\nsecond\n\nthird";
        let text = PlainTextExtractor::new()
            .extract_text(raw, DocumentFormat::Txt)
            .expect("提取失败");
        assert_eq!(text, "first\n\nsecond\n\nthird");
    }

    #[test]
    fn test_docx_requires_external_decoder() {
        let err = PlainTextExtractor::new()
            .extract_text(b"PK\x03\x04", DocumentFormat::Docx)
            .expect_err("docx 不应被纯文本提取器处理");
        assert!(matches!(err, ExtractError::DecoderUnavailable(DocumentFormat::Docx)));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = PlainTextExtractor::new()
            .extract_text(&[0xff, 0xfe, 0x00], DocumentFormat::Txt)
            .expect_err("非 UTF-8 内容应报错");
        assert!(matches!(err, ExtractError::InvalidEncoding(_)));
    }
}
