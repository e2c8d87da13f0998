/// 题块分隔策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DelimiterMode {
    /// 以答案行作为题块结束标记
    AnswerTerminated,
    /// 以空行分隔题块
    BlankLineSeparated,
}

/// 题干样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StemStyle {
    /// 题块首行整行作为题干
    Plain,
    /// 题干必须带数字编号（如 "1. "、"1) "、"1- "）
    Numbered,
}

/// 解析器变体枚举
///
/// 每个变体固定一组（分隔策略，题干样式）。调用方在单次解析前选定变体，
/// 解析过程中不再切换。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ParserVariant {
    /// 答案行分隔 + 整行题干
    Classic = 1,
    /// 空行分隔 + 整行题干
    BlankLine = 2,
    /// 空行分隔 + 编号题干（严格：选择题至少两个选项）
    Numbered = 3,
}

impl ParserVariant {
    /// 获取变体代码
    pub fn code(self) -> u8 {
        self as u8
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            ParserVariant::Classic => "答案行分隔",
            ParserVariant::BlankLine => "空行分隔",
            ParserVariant::Numbered => "编号题干",
        }
    }

    /// 该变体使用的分隔策略
    pub fn delimiter_mode(self) -> DelimiterMode {
        match self {
            ParserVariant::Classic => DelimiterMode::AnswerTerminated,
            ParserVariant::BlankLine | ParserVariant::Numbered => {
                DelimiterMode::BlankLineSeparated
            }
        }
    }

    /// 该变体使用的题干样式
    pub fn stem_style(self) -> StemStyle {
        match self {
            ParserVariant::Classic | ParserVariant::BlankLine => StemStyle::Plain,
            ParserVariant::Numbered => StemStyle::Numbered,
        }
    }

    /// 从代码解析变体
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ParserVariant::Classic),
            2 => Some(ParserVariant::BlankLine),
            3 => Some(ParserVariant::Numbered),
            _ => None,
        }
    }

    /// 尝试从字符串解析变体（精确匹配）
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "classic" | "answer" => Some(ParserVariant::Classic),
            "blank" | "blank_line" => Some(ParserVariant::BlankLine),
            "numbered" => Some(ParserVariant::Numbered),
            _ => None,
        }
    }

    /// 智能查找变体（支持模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        // 先尝试精确匹配
        let s_lower = s.trim().to_lowercase();
        if let Some(variant) = Self::from_str(&s_lower) {
            return Some(variant);
        }

        // 模糊匹配
        if s_lower.contains("number") || s_lower.contains("编号") {
            return Some(ParserVariant::Numbered);
        }
        if s_lower.contains("blank") || s_lower.contains("空行") {
            return Some(ParserVariant::BlankLine);
        }
        if s_lower.contains("answer") || s_lower.contains("答案") {
            return Some(ParserVariant::Classic);
        }

        None
    }
}

impl std::fmt::Display for ParserVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
