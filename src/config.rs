use crate::models::ParserVariant;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的文档数量
    pub max_concurrent_docs: usize,
    /// 待处理文档存放目录
    pub input_folder: String,
    /// CSV 导出目录
    pub output_folder: String,
    /// 本次运行使用的解析器变体
    pub parser_variant: ParserVariant,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 解析失败题块的警告文件
    pub warn_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_docs: 4,
            input_folder: "quiz_docs".to_string(),
            output_folder: "output_csv".to_string(),
            parser_variant: ParserVariant::Classic,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_docs: std::env::var("MAX_CONCURRENT_DOCS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_docs),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            parser_variant: std::env::var("PARSER_VARIANT").ok().and_then(|v| ParserVariant::find(&v)).unwrap_or(default.parser_variant),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(default.warn_file),
        }
    }
}
