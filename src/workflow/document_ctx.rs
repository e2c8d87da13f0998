//! 文档处理上下文
//!
//! 封装"我正在用哪个变体处理第几个文档"这一信息，
//! 取代跨交互残留的全局可变状态。

use std::fmt::Display;

use crate::models::ParserVariant;

/// 文档处理上下文
///
/// 包含处理单个文档所需的所有上下文信息，随流程传递，单次解析内有效。
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 文档名称
    pub doc_name: String,

    /// 文档索引（仅用于日志显示）
    pub doc_index: usize,

    /// 本次解析使用的变体
    pub variant: ParserVariant,
}

impl DocumentCtx {
    /// 创建新的文档上下文
    pub fn new(doc_name: String, doc_index: usize, variant: ParserVariant) -> Self {
        Self {
            doc_name,
            doc_index,
            variant,
        }
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文档 {} 变体#{}]",
            self.doc_name,
            self.variant.code()
        )
    }
}
