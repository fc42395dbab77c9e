use serde::{Deserialize, Serialize};

use crate::book::Book;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "fullName")]
    pub name: String,
    pub books: Option<Vec<Book>>,
    #[serde(skip)]
    pub cache_key: String,
}
