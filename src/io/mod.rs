// src/io/mod.rs - JSON-lines sources and the part-file sink
pub mod reader;
pub mod writer;

pub use reader::{
    read_affiliations, read_document_projects, read_json_lines, read_organizations,
    read_project_organizations, DocumentMetadata,
};
pub use writer::{part_file_name, write_matches};
