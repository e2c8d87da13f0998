//! 题块分类服务 - 业务能力层
//!
//! 只负责"单个题块 → 结构化题目"能力，不关心流程
//!
//! 分类是纯函数：输入一个题块，输出解析成功的题目或一条错误记录，
//! 没有任何副作用。题型在构建输出行之前显式判定，
//! 每种题型的行构建各自独立。

use anyhow::Result;
use regex::Regex;

use crate::error::ParseErrorKind;
use crate::models::{
    AnswerKey, Block, ErrorRecord, OutputRow, ParsedQuestion, QuestionType, StemStyle,
    ValidQuestion, FULL_SCORE,
};

/// 选项的内部表示
///
/// `text` 是用于题型判断与答案比对的核心文本，
/// `display` 是写入输出行的展示文本（编号题干样式下带 "X) " 标注）。
#[derive(Debug, Clone)]
struct Choice {
    text: String,
    display: String,
}

/// 按选项位置生成顺序标签 A、B、C、…
fn position_label(index: usize) -> char {
    (b'A' + (index as u8).min(25)) as char
}

/// 题块分类服务
///
/// 职责：
/// - 判定单个题块的题型（选择 / 判断 / 填空）
/// - 提取题干、选项与正确答案标记
/// - 产出带计分的输出行组
/// - 只处理单个题块，不出现 Vec<Block>
/// - 不关心流程顺序
pub struct QuestionClassifier {
    stem_style: StemStyle,
    answer_marker: Regex,
    answer_letter: Regex,
    marker_prefix: Regex,
    numbered_stem: Regex,
    choice_label: Regex,
}

impl QuestionClassifier {
    /// 创建新的分类服务
    pub fn new(stem_style: StemStyle) -> Result<Self> {
        Ok(Self {
            stem_style,
            // 答案声明行：行首 "answer"，可跟冒号或空白
            answer_marker: Regex::new(r"(?i)^answer[:\s]?")?,
            // 答案字母：标记之后紧跟单个 A-D，整行到此为止
            answer_letter: Regex::new(r"(?i)^answer[:\s]*([a-d])\s*$")?,
            marker_prefix: Regex::new(r"(?i)^answer[:\s]*")?,
            // 编号题干："1. "、"1) "、"1- "
            numbered_stem: Regex::new(r"^(\d+)\s*[.)-]\s*(\S.*)$")?,
            // 选项标注："A. "、"b) "、"C- "
            choice_label: Regex::new(r"^([A-Za-z])[.)-]\s*(.*)$")?,
        })
    }

    /// 分类单个题块
    pub fn classify(&self, block: &Block) -> ParsedQuestion {
        match self.classify_inner(block) {
            Ok(question) => ParsedQuestion::Valid(question),
            Err(kind) => ParsedQuestion::Error(ErrorRecord::new(block.index, block.text(), kind)),
        }
    }

    fn classify_inner(&self, block: &Block) -> std::result::Result<ValidQuestion, ParseErrorKind> {
        let lines = &block.lines;

        // 最少需要题干行 + 答案行
        if lines.len() < 2 {
            return Err(ParseErrorKind::TooFewLines { found: lines.len() });
        }

        // 定位首个答案声明行
        let answer_idx = lines
            .iter()
            .position(|l| self.answer_marker.is_match(l))
            .ok_or(ParseErrorKind::MissingAnswer)?;

        // 题块以答案行开头：没有题干可言
        if answer_idx == 0 {
            return Err(ParseErrorKind::InvalidQuestionFormat);
        }

        let answer_line = &lines[answer_idx];
        let stem = self.extract_stem(&lines[0])?;

        // 选项 = 题干与答案行之间的全部行
        let choices = self.collect_choices(&lines[1..answer_idx]);

        let question_type = Self::classify_type(&choices);

        // 编号题干样式更严格：选择题至少两个选项
        if question_type == QuestionType::MultipleChoice
            && self.stem_style == StemStyle::Numbered
            && choices.len() < 2
        {
            return Err(ParseErrorKind::InsufficientChoices {
                found: choices.len(),
            });
        }

        match question_type {
            QuestionType::MultipleChoice => self.build_multiple_choice(stem, &choices, answer_line),
            QuestionType::TrueFalse => self.build_true_false(stem, &choices, answer_line),
            QuestionType::FillInBlank => self.build_fill_in_blank(stem, answer_line),
        }
    }

    /// 提取题干
    fn extract_stem(&self, first_line: &str) -> std::result::Result<String, ParseErrorKind> {
        match self.stem_style {
            StemStyle::Plain => Ok(first_line.to_string()),
            StemStyle::Numbered => {
                let caps = self
                    .numbered_stem
                    .captures(first_line)
                    .ok_or(ParseErrorKind::InvalidQuestionFormat)?;
                Ok(caps[2].trim().to_string())
            }
        }
    }

    /// 收集选项
    fn collect_choices(&self, lines: &[String]) -> Vec<Choice> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| match self.stem_style {
                StemStyle::Plain => Choice {
                    text: line.clone(),
                    display: line.clone(),
                },
                StemStyle::Numbered => {
                    if let Some(caps) = self.choice_label.captures(line) {
                        // 原行已带标注，保留原文
                        Choice {
                            text: caps[2].trim().to_string(),
                            display: line.clone(),
                        }
                    } else {
                        // 按位置补上标注
                        Choice {
                            text: line.clone(),
                            display: format!("{}) {}", position_label(i), line),
                        }
                    }
                }
            })
            .collect()
    }

    /// 判定题型
    ///
    /// 恰好两个选项且文本集合为 {true, false}（不分大小写、不论顺序）
    /// 是判断题；有选项是选择题；没有选项是填空题。
    fn classify_type(choices: &[Choice]) -> QuestionType {
        if choices.len() == 2 && Self::is_true_false_pair(&choices[0], &choices[1]) {
            QuestionType::TrueFalse
        } else if !choices.is_empty() {
            QuestionType::MultipleChoice
        } else {
            QuestionType::FillInBlank
        }
    }

    fn is_true_false_pair(a: &Choice, b: &Choice) -> bool {
        let a = a.text.to_lowercase();
        let b = b.text.to_lowercase();
        (a == "true" && b == "false") || (a == "false" && b == "true")
    }

    /// 提取答案值：优先单个字母，否则取标记之后的自由文本
    fn extract_answer_key(&self, answer_line: &str) -> Option<AnswerKey> {
        if let Some(caps) = self.answer_letter.captures(answer_line) {
            let letter = caps[1].chars().next()?.to_ascii_uppercase();
            return Some(AnswerKey::Letter(letter));
        }

        let rest = self.strip_marker(answer_line);
        if rest.is_empty() {
            None
        } else {
            Some(AnswerKey::Text(rest))
        }
    }

    fn strip_marker(&self, answer_line: &str) -> String {
        self.marker_prefix
            .replace(answer_line, "")
            .trim()
            .to_string()
    }

    // ========== 按题型构建输出行 ==========

    /// 选择题：按位置赋标签 A、B、C…，与答案字母一致的选项计满分
    ///
    /// 答案字母超出选项数量时没有任何选项命中，全部计 0 分。
    fn build_multiple_choice(
        &self,
        stem: String,
        choices: &[Choice],
        answer_line: &str,
    ) -> std::result::Result<ValidQuestion, ParseErrorKind> {
        let letter = match self.extract_answer_key(answer_line) {
            Some(AnswerKey::Letter(c)) => c,
            _ => return Err(ParseErrorKind::UnparsableAnswer),
        };

        let mut rows = vec![OutputRow::stem(stem.clone())];
        for (i, choice) in choices.iter().enumerate() {
            let score = if position_label(i) == letter {
                FULL_SCORE
            } else {
                0
            };
            rows.push(OutputRow::choice(score, choice.display.clone()));
        }

        Ok(ValidQuestion::new(QuestionType::MultipleChoice, stem, rows))
    }

    /// 判断题：答案字母按位置对应选项，自由文本按选项文本比对（不分大小写）
    fn build_true_false(
        &self,
        stem: String,
        choices: &[Choice],
        answer_line: &str,
    ) -> std::result::Result<ValidQuestion, ParseErrorKind> {
        let key = self
            .extract_answer_key(answer_line)
            .ok_or(ParseErrorKind::UnparsableAnswer)?;

        let correct = match &key {
            AnswerKey::Letter(c) => {
                let idx = (*c as u8 - b'A') as usize;
                if idx < choices.len() {
                    Some(idx)
                } else {
                    None
                }
            }
            AnswerKey::Text(t) => choices.iter().position(|ch| ch.text.eq_ignore_ascii_case(t)),
        };

        let mut rows = vec![OutputRow::stem(stem.clone())];
        for (i, choice) in choices.iter().enumerate() {
            let score = if correct == Some(i) { FULL_SCORE } else { 0 };
            // 判断题不加序号标注，按原列出文本输出
            rows.push(OutputRow::choice(score, choice.text.clone()));
        }

        Ok(ValidQuestion::new(QuestionType::TrueFalse, stem, rows))
    }

    /// 填空题：恰好一条计满分的答案行，没有干扰项
    fn build_fill_in_blank(
        &self,
        stem: String,
        answer_line: &str,
    ) -> std::result::Result<ValidQuestion, ParseErrorKind> {
        let value = self.strip_marker(answer_line);
        if value.is_empty() {
            return Err(ParseErrorKind::UnparsableAnswer);
        }

        let rows = vec![OutputRow::stem(stem.clone()), OutputRow::choice(FULL_SCORE, value)];
        Ok(ValidQuestion::new(QuestionType::FillInBlank, stem, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> QuestionClassifier {
        QuestionClassifier::new(StemStyle::Plain).expect("分类器创建失败")
    }

    fn numbered() -> QuestionClassifier {
        QuestionClassifier::new(StemStyle::Numbered).expect("分类器创建失败")
    }

    fn block(lines: &[&str]) -> Block {
        Block::new(0, lines.iter().map(|l| l.to_string()).collect())
    }

    fn expect_valid(parsed: ParsedQuestion) -> ValidQuestion {
        match parsed {
            ParsedQuestion::Valid(q) => q,
            ParsedQuestion::Error(rec) => panic!("应解析成功，实际失败: {}", rec),
        }
    }

    fn expect_error(parsed: ParsedQuestion) -> ErrorRecord {
        match parsed {
            ParsedQuestion::Error(rec) => rec,
            ParsedQuestion::Valid(q) => panic!("应解析失败，实际成功: {:?}", q.question_type),
        }
    }

    #[test]
    fn test_multiple_choice_scores_by_letter() {
        let q = expect_valid(plain().classify(&block(&[
            "What is the capital of France?",
            "Berlin",
            "Madrid",
            "Paris",
            "Rome",
            "Answer: C",
        ])));

        assert_eq!(q.question_type, QuestionType::MultipleChoice);
        assert_eq!(q.stem, "What is the capital of France?");
        assert_eq!(q.rows.len(), 5);
        assert_eq!(q.rows[0], OutputRow::stem("What is the capital of France?"));

        let scores: Vec<u8> = q.rows[1..].iter().filter_map(|r| r.score).collect();
        assert_eq!(scores, vec![0, 0, 100, 0]);
        assert_eq!(q.rows[3].answer, "Paris");
    }

    #[test]
    fn test_row_count_equals_stem_plus_choices() {
        let q = expect_valid(plain().classify(&block(&["Q?", "a", "b", "c", "Answer: A"])));
        assert_eq!(q.rows.len(), 1 + q.choice_count());
        assert_eq!(q.choice_count(), 3);
    }

    #[test]
    fn test_true_false_by_positional_letter() {
        let q = expect_valid(plain().classify(&block(&[
            "The sky is blue.",
            "True",
            "False",
            "Answer: A",
        ])));

        assert_eq!(q.question_type, QuestionType::TrueFalse);
        assert_eq!(q.rows[1], OutputRow::choice(100, "True"));
        assert_eq!(q.rows[2], OutputRow::choice(0, "False"));
    }

    #[test]
    fn test_true_false_order_independent() {
        let forward = expect_valid(plain().classify(&block(&["S.", "True", "False", "Answer: A"])));
        let reversed = expect_valid(plain().classify(&block(&["S.", "False", "True", "Answer: A"])));

        assert_eq!(forward.question_type, QuestionType::TrueFalse);
        assert_eq!(reversed.question_type, QuestionType::TrueFalse);
        // A 永远对应先列出的选项
        assert_eq!(reversed.rows[1], OutputRow::choice(100, "False"));
    }

    #[test]
    fn test_true_false_by_text_answer() {
        let q = expect_valid(plain().classify(&block(&["S.", "True", "False", "Answer: false"])));
        assert_eq!(q.rows[1].score, Some(0));
        assert_eq!(q.rows[2].score, Some(100));
    }

    #[test]
    fn test_fill_in_blank_two_lines() {
        let q = expect_valid(plain().classify(&block(&["2+2=?", "Answer: 4"])));

        assert_eq!(q.question_type, QuestionType::FillInBlank);
        assert_eq!(q.rows.len(), 2);
        assert_eq!(q.rows[1], OutputRow::choice(100, "4"));
        assert_eq!(q.scored_row_count(), 1);
    }

    #[test]
    fn test_exactly_one_scored_row_for_valid_answer() {
        let q = expect_valid(plain().classify(&block(&["Q?", "x", "y", "z", "Answer: B"])));
        assert_eq!(q.scored_row_count(), 1);
    }

    #[test]
    fn test_unknown_letter_scores_nothing() {
        // 答案字母超出选项数量：静默接受，所有选项计 0 分
        let q = expect_valid(plain().classify(&block(&["Q?", "x", "y", "Answer: D"])));
        assert_eq!(q.question_type, QuestionType::MultipleChoice);
        assert_eq!(q.scored_row_count(), 0);
    }

    #[test]
    fn test_too_few_lines() {
        let rec = expect_error(plain().classify(&block(&["Only one line"])));
        assert_eq!(rec.kind, ParseErrorKind::TooFewLines { found: 1 });
        assert_eq!(rec.block_text, "Only one line");
    }

    #[test]
    fn test_missing_answer_line() {
        let rec = expect_error(plain().classify(&block(&["Q?", "a", "b"])));
        assert_eq!(rec.kind, ParseErrorKind::MissingAnswer);
    }

    #[test]
    fn test_unparsable_mc_answer() {
        // 选择题要求单个答案字母
        let rec = expect_error(plain().classify(&block(&["Q?", "a", "b", "Answer: Paris"])));
        assert_eq!(rec.kind, ParseErrorKind::UnparsableAnswer);

        let rec = expect_error(plain().classify(&block(&["Q?", "a", "b", "Answer:"])));
        assert_eq!(rec.kind, ParseErrorKind::UnparsableAnswer);
    }

    #[test]
    fn test_block_starting_with_answer_line() {
        let rec = expect_error(plain().classify(&block(&["Answer: A", "leftover"])));
        assert_eq!(rec.kind, ParseErrorKind::InvalidQuestionFormat);
    }

    #[test]
    fn test_numbered_stem_delimiters() {
        for first in ["1. What is X?", "1) What is X?", "1- What is X?", "12.What is X?"] {
            let q = expect_valid(numbered().classify(&block(&[first, "a", "b", "Answer: A"])));
            assert_eq!(q.stem, "What is X?", "题干提取失败: {}", first);
        }
    }

    #[test]
    fn test_numbered_rejects_plain_stem() {
        let rec = expect_error(numbered().classify(&block(&["What is X?", "a", "b", "Answer: A"])));
        assert_eq!(rec.kind, ParseErrorKind::InvalidQuestionFormat);
    }

    #[test]
    fn test_numbered_synthesizes_choice_labels() {
        let q = expect_valid(numbered().classify(&block(&[
            "3. Pick one.",
            "alpha",
            "B) beta",
            "Answer: B",
        ])));

        // 未标注的选项补上位置标签，已标注的保留原文
        assert_eq!(q.rows[1].answer, "A) alpha");
        assert_eq!(q.rows[2].answer, "B) beta");
        assert_eq!(q.rows[2].score, Some(100));
    }

    #[test]
    fn test_numbered_requires_two_choices() {
        let rec = expect_error(numbered().classify(&block(&["1. Q?", "only", "Answer: A"])));
        assert_eq!(rec.kind, ParseErrorKind::InsufficientChoices { found: 1 });
    }

    #[test]
    fn test_numbered_fill_in_blank_allowed() {
        let q = expect_valid(numbered().classify(&block(&["7. 2+2=?", "Answer: 4"])));
        assert_eq!(q.question_type, QuestionType::FillInBlank);
        assert_eq!(q.stem, "2+2=?");
    }
}
