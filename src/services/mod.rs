pub mod classifier;
pub mod csv_writer;
pub mod segmenter;
pub mod warn_writer;

pub use classifier::QuestionClassifier;
pub use csv_writer::CsvWriter;
pub use segmenter::{BlockSegmenter, Segmentation};
pub use warn_writer::WarnWriter;
