pub mod correction_loader;

pub use correction_loader::{
    load_corrections, load_corrections_if_present, CorrectionEntry, CorrectionFile,
};
