/// 题型枚举
///
/// 题型在构建输出行之前显式判定，行构建逻辑按题型各自独立。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum QuestionType {
    /// 选择题
    MultipleChoice,
    /// 判断题
    TrueFalse,
    /// 填空题
    FillInBlank,
}

impl QuestionType {
    /// 获取导出文件中的题型标记
    pub fn tag(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MC",
            QuestionType::TrueFalse => "TF",
            QuestionType::FillInBlank => "SA",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "选择题",
            QuestionType::TrueFalse => "判断题",
            QuestionType::FillInBlank => "填空题",
        }
    }

    /// 获取 CSV 导出中每道题前的注释行文本
    pub fn comment_header(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "//MULTIPLE CHOICE QUESTION TYPE",
            QuestionType::TrueFalse => "//TRUE/FALSE QUESTION TYPE",
            QuestionType::FillInBlank => "//SHORT ANSWER QUESTION TYPE",
        }
    }

    /// 从题型标记解析题型
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "MC" => Some(QuestionType::MultipleChoice),
            "TF" => Some(QuestionType::TrueFalse),
            "SA" => Some(QuestionType::FillInBlank),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
