//! # Quiz CSV Export
//!
//! 把松散排版的试题文本转换为 LMS 导入格式 CSV 的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有文件系统资源，只暴露能力
//! - `TextExtractor` - 文本提取能力，解码细节由外部协作方完成
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个题块
//! - `BlockSegmenter` - 题块切分能力（答案行分隔 / 空行分隔）
//! - `QuestionClassifier` - 题型判定与输出行构建能力（纯函数）
//! - `CsvWriter` - 标记行 CSV 导出能力
//! - `WarnWriter` - 写 warn 文件能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文档"的完整解析流程
//! - `DocumentCtx` - 上下文封装（文档名 + 索引 + 变体）
//! - `ParseFlow` - 流程编排（segment → classify → 订正兜底）
//! - `CorrectionLog` - 只增订正日志
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文档处理器，管理资源和并发
//! - `orchestrator/document_processor` - 单个文档处理器，提取、解析、导出
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ExtractError, ParseErrorKind};
pub use infrastructure::{PlainTextExtractor, TextExtractor};
pub use models::{
    Block, DelimiterMode, DocumentFormat, ErrorRecord, OutputRow, ParsedQuestion, ParserVariant,
    QuestionType, RawDocument, StemStyle, ValidQuestion,
};
pub use orchestrator::{process_document, App};
pub use services::{BlockSegmenter, CsvWriter, QuestionClassifier, WarnWriter};
pub use workflow::{CorrectionLog, DocumentCtx, ParseFlow, ParseOutcome};
