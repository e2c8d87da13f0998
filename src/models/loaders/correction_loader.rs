use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// 单条订正：原始题块标识 + 订正后的题块文本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionEntry {
    pub block_index: usize,
    pub text: String,
}

/// 订正文件
///
/// 与文档同名的 `<名称>.corrections.toml`，由人工编辑，
/// 每个 `[[correction]]` 表对应一次重新解析。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionFile {
    #[serde(default)]
    pub correction: Vec<CorrectionEntry>,
}

/// 从 TOML 文件加载订正条目
pub async fn load_corrections(path: &Path) -> Result<CorrectionFile> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取订正文件: {}", path.display()))?;

    let file: CorrectionFile = toml::from_str(&content)
        .with_context(|| format!("无法解析订正文件: {}", path.display()))?;

    Ok(file)
}

/// 加载订正文件（不存在时返回 None）
pub async fn load_corrections_if_present(path: &Path) -> Result<Option<CorrectionFile>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = load_corrections(path).await?;
    tracing::info!(
        "已加载订正文件 {}（{} 条订正）",
        path.file_name().unwrap_or_default().to_string_lossy(),
        file.correction.len()
    );

    Ok(Some(file))
}
