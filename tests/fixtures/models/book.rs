use serde::{Deserialize, Serialize};

use crate::author::Author;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub pages: u32,
    pub price: f64,
    pub author: Author,
    pub tags: Vec<String>,
    pub related: Vec<Book>,
    pub status: Status,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Status {
    Available,
    OutOfStock,
}
