use serde::{Deserialize, Serialize};

/// 文档格式标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// 纯文本（已完成外部提取）
    Txt,
    /// Word 文档（需要外部解码器）
    Docx,
    /// PDF 文档（需要外部解码器）
    Pdf,
}

impl DocumentFormat {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            DocumentFormat::Txt => "纯文本",
            DocumentFormat::Docx => "Word 文档",
            DocumentFormat::Pdf => "PDF 文档",
        }
    }

    /// 获取文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Txt => "txt",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pdf => "pdf",
        }
    }

    /// 从扩展名解析格式（不区分大小写）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Some(DocumentFormat::Txt),
            "docx" => Some(DocumentFormat::Docx),
            "pdf" => Some(DocumentFormat::Pdf),
            _ => None,
        }
    }

    /// 从文件路径解析格式
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 原始文档
///
/// 由外部提取器产出的不可变文本内容，是切块器的唯一输入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub name: String,
    pub format: DocumentFormat,
    pub content: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, format: DocumentFormat, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format,
            content: content.into(),
        }
    }
}
