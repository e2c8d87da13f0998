//! CSV 导出服务 - 业务能力层
//!
//! 只负责"把已接受的题目序列化为导入格式 CSV"能力，不关心流程
//!
//! 文件格式（标记行布局）：每道题之前一条 `//…` 注释行标明题型，
//! 随后依次为 `NewQuestion`、`QuestionText`、逐选项行，
//! 每道题之后一个空行；所有字段一律加引号。

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::models::{QuestionType, ValidQuestion};

/// CSV 导出服务
///
/// 职责：
/// - 把 ValidQuestion 序列渲染为标记行 CSV
/// - 整个行集构建完成后才落盘，写入对核心而言是原子的
/// - 不出现 ErrorRecord
pub struct CsvWriter;

impl CsvWriter {
    /// 创建新的导出服务
    pub fn new() -> Self {
        Self
    }

    /// 构建标记行集
    pub fn build_rows(&self, questions: &[ValidQuestion]) -> Vec<Vec<String>> {
        let mut rows = Vec::new();

        for question in questions {
            rows.push(vec![question.question_type.comment_header().to_string()]);
            rows.push(vec![
                "NewQuestion".to_string(),
                question.question_type.tag().to_string(),
            ]);
            rows.push(vec!["QuestionText".to_string(), question.stem.clone()]);

            // 首行是题干行，其后才是选项行
            for row in question.rows.iter().skip(1) {
                let score = row.score.map(|s| s.to_string()).unwrap_or_default();
                match question.question_type {
                    QuestionType::MultipleChoice => rows.push(vec![
                        "Option".to_string(),
                        score,
                        row.answer.clone(),
                    ]),
                    QuestionType::TrueFalse => rows.push(vec![row.answer.clone(), score]),
                    QuestionType::FillInBlank => rows.push(vec![
                        "Answer".to_string(),
                        score,
                        row.answer.clone(),
                    ]),
                }
            }

            // 题目之间以空行分隔
            rows.push(Vec::new());
        }

        rows
    }

    /// 序列化为 CSV 文本（所有字段加引号，内部引号成对转义）
    pub fn serialize(&self, rows: &[Vec<String>]) -> String {
        let mut out = String::new();
        for row in rows {
            let line = row
                .iter()
                .map(|field| quote(field))
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// 渲染完整 CSV 文本
    pub fn render(&self, questions: &[ValidQuestion]) -> String {
        self.serialize(&self.build_rows(questions))
    }

    /// 渲染并写入文件
    pub async fn write_to_file(&self, path: &Path, questions: &[ValidQuestion]) -> Result<()> {
        let content = self.render(questions);
        debug!(
            "写入 CSV: {} （{} 道题，{} 字节）",
            path.display(),
            questions.len(),
            content.len()
        );

        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("无法写入 CSV 文件: {}", path.display()))?;

        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutputRow;

    fn mc_question() -> ValidQuestion {
        ValidQuestion::new(
            QuestionType::MultipleChoice,
            "What is the capital of France?",
            vec![
                OutputRow::stem("What is the capital of France?"),
                OutputRow::choice(0, "Berlin"),
                OutputRow::choice(100, "Paris"),
            ],
        )
    }

    #[test]
    fn test_marker_rows_for_multiple_choice() {
        let rows = CsvWriter::new().build_rows(&[mc_question()]);

        assert_eq!(rows[0], vec!["//MULTIPLE CHOICE QUESTION TYPE"]);
        assert_eq!(rows[1], vec!["NewQuestion", "MC"]);
        assert_eq!(rows[2], vec!["QuestionText", "What is the capital of France?"]);
        assert_eq!(rows[3], vec!["Option", "0", "Berlin"]);
        assert_eq!(rows[4], vec!["Option", "100", "Paris"]);
        assert!(rows[5].is_empty());
    }

    #[test]
    fn test_marker_rows_for_true_false() {
        let question = ValidQuestion::new(
            QuestionType::TrueFalse,
            "The sky is blue.",
            vec![
                OutputRow::stem("The sky is blue."),
                OutputRow::choice(100, "True"),
                OutputRow::choice(0, "False"),
            ],
        );
        let rows = CsvWriter::new().build_rows(&[question]);

        assert_eq!(rows[1], vec!["NewQuestion", "TF"]);
        assert_eq!(rows[3], vec!["True", "100"]);
        assert_eq!(rows[4], vec!["False", "0"]);
    }

    #[test]
    fn test_marker_rows_for_fill_in_blank() {
        let question = ValidQuestion::new(
            QuestionType::FillInBlank,
            "2+2=?",
            vec![OutputRow::stem("2+2=?"), OutputRow::choice(100, "4")],
        );
        let rows = CsvWriter::new().build_rows(&[question]);

        assert_eq!(rows[0], vec!["//SHORT ANSWER QUESTION TYPE"]);
        assert_eq!(rows[1], vec!["NewQuestion", "SA"]);
        assert_eq!(rows[3], vec!["Answer", "100", "4"]);
    }

    #[test]
    fn test_all_fields_quoted() {
        let csv = CsvWriter::new().render(&[mc_question()]);
        let first_data_line = csv.lines().nth(1).expect("应有 NewQuestion 行");
        assert_eq!(first_data_line, "\"NewQuestion\",\"MC\"");
    }

    #[test]
    fn test_embedded_quotes_escaped() {
        let question = ValidQuestion::new(
            QuestionType::FillInBlank,
            "Say \"hello\"?",
            vec![OutputRow::stem("Say \"hello\"?"), OutputRow::choice(100, "hi")],
        );
        let csv = CsvWriter::new().render(&[question]);
        assert!(csv.contains("\"QuestionText\",\"Say \"\"hello\"\"?\""));
    }

    #[test]
    fn test_blank_row_between_questions() {
        let csv = CsvWriter::new().render(&[mc_question(), mc_question()]);
        let lines: Vec<&str> = csv.lines().collect();
        // 每道题 5 行内容 + 1 个空行
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "\"//MULTIPLE CHOICE QUESTION TYPE\"");
    }
}
