//! Patent domain: ideas, generated documents and their repository contract.

pub mod model;
pub mod repository;

pub use model::{
    DataFileInfo, DocumentIdGenerator, DocumentPatch, DocumentStatus, PatentDocument,
    PatentIdea, PatentStatistics, SortOrder, StoreSnapshot, count_successful_ideas,
    render_text_export, valid_ideas,
};
pub use repository::PatentRepository;
