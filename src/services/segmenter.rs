//! 题块切分服务 - 业务能力层
//!
//! 只负责"把整篇文本切成题块"能力，不关心流程
//!
//! 切分器本身不产生错误：畸形文档只会切出更少或残缺的题块，
//! 残块作为数据返回，由流程层决定如何上报。

use anyhow::Result;
use regex::Regex;

use crate::models::{Block, DelimiterMode};

/// 切分结果
///
/// `trailing` 是答案行分隔模式下末尾未以答案行收束的残余积累，
/// 不计入正常题块。
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub blocks: Vec<Block>,
    pub trailing: Option<Block>,
}

/// 题块切分服务
///
/// 职责：
/// - 把规范化文本切成互不重叠、保持原始顺序的题块
/// - 只做切分，不做题型判断
/// - 不关心流程顺序
pub struct BlockSegmenter {
    answer_marker: Regex,
}

impl BlockSegmenter {
    /// 创建新的切分服务
    pub fn new() -> Result<Self> {
        // 答案声明行：行首 "answer"，可跟冒号或空白，不区分大小写
        let answer_marker = Regex::new(r"(?i)^answer[:\s]?")?;
        Ok(Self { answer_marker })
    }

    /// 按指定分隔策略切分文本
    pub fn segment(&self, text: &str, mode: DelimiterMode) -> Segmentation {
        match mode {
            DelimiterMode::AnswerTerminated => self.segment_answer_terminated(text),
            DelimiterMode::BlankLineSeparated => self.segment_blank_line(text),
        }
    }

    /// 答案行分隔模式
    ///
    /// 逐行积累，遇到答案声明行即收束当前题块（答案行含在块内）。
    fn segment_answer_terminated(&self, text: &str) -> Segmentation {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty());

        let mut blocks = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for line in lines {
            current.push(line.to_string());
            if self.answer_marker.is_match(line) {
                blocks.push(Block::new(blocks.len(), std::mem::take(&mut current)));
            }
        }

        // 末尾残余积累：没有答案行收束，单独返回
        let trailing = if current.is_empty() {
            None
        } else {
            Some(Block::new(blocks.len(), current))
        };

        Segmentation { blocks, trailing }
    }

    /// 空行分隔模式
    ///
    /// 按字面双换行切段，修剪后丢弃空段，每个存活段为一个题块。
    fn segment_blank_line(&self, text: &str) -> Segmentation {
        let blocks = text
            .split("\n\n")
            .map(str::trim)
            .filter(|seg| !seg.is_empty())
            .enumerate()
            .map(|(index, seg)| Block::from_text(index, seg))
            .collect();

        Segmentation {
            blocks,
            trailing: None,
        }
    }
}
