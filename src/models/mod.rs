pub mod document;
pub mod record;

pub use document::UploadedDocument;
pub use record::AnalysisRecord;
