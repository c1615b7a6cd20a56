pub mod config_service;
pub mod json_patent_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::{API_KEY_ENV, ConfigService};
pub use crate::json_patent_repository::JsonPatentRepository;
pub use crate::paths::{PathError, PatentsmithPaths};
