pub mod bucket;
pub mod dictionary;
pub mod error;
pub mod io;
pub mod matching;
pub mod models;
pub mod normalize;
pub mod relations;
pub mod utils;

pub use error::{MatchingError, Result};
