//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度。
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行、统计）
//! - 扫描输入目录（Vec<文档路径>）
//! - 控制并发数量（Semaphore）
//!
//! ### `document_processor` - 单个文档处理器
//! - 提取单个文档的文本
//! - 运行解析流程并应用订正
//! - 导出 CSV、写 warn 文件
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，document_processor 管单个
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做题块级判断

pub mod batch_processor;
pub mod document_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use document_processor::process_document;
