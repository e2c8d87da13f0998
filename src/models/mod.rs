pub mod document;
pub mod loaders;
pub mod question;
pub mod question_type;
pub mod variant;

pub use document::{DocumentFormat, RawDocument};
pub use loaders::{load_corrections, load_corrections_if_present, CorrectionEntry, CorrectionFile};
pub use question::{
    AnswerKey, Block, ErrorRecord, OutputRow, ParsedQuestion, ValidQuestion, FULL_SCORE,
};
pub use question_type::QuestionType;
pub use variant::{DelimiterMode, ParserVariant, StemStyle};
