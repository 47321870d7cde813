use garde::Validate;
use serde::{Deserialize, Serialize};

/// One row of the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Assigned by storage on insert
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    /// Publication date as free text, e.g. `1/1/2019`
    pub date: String,
    pub rating: i32,
    /// Circulation status label, e.g. `CheckedOut`
    pub status: String,
}

impl Book {
    pub fn from_new(id: i64, new_book: &NewBook) -> Self {
        Self {
            id,
            title: new_book.title.clone(),
            author: new_book.author.clone(),
            publisher: new_book.publisher.clone(),
            date: new_book.date.clone(),
            rating: new_book.rating,
            status: new_book.status.clone(),
        }
    }
}

/// Payload for creating a book. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBook {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(length(min = 1))]
    pub author: String,
    #[garde(length(min = 1))]
    pub publisher: String,
    #[garde(length(min = 1))]
    pub date: String,
    #[serde(default)]
    #[garde(skip)]
    pub rating: i32,
    #[garde(length(min = 1))]
    pub status: String,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookPatch {
    #[garde(length(min = 1))]
    pub title: Option<String>,
    #[garde(length(min = 1))]
    pub author: Option<String>,
    #[garde(length(min = 1))]
    pub publisher: Option<String>,
    #[garde(length(min = 1))]
    pub date: Option<String>,
    #[garde(skip)]
    pub rating: Option<i32>,
    #[garde(length(min = 1))]
    pub status: Option<String>,
}

impl BookPatch {
    /// Overlay the provided fields onto `current`. The id is never touched.
    pub fn apply(self, current: &Book) -> Book {
        Book {
            id: current.id,
            title: self.title.unwrap_or_else(|| current.title.clone()),
            author: self.author.unwrap_or_else(|| current.author.clone()),
            publisher: self.publisher.unwrap_or_else(|| current.publisher.clone()),
            date: self.date.unwrap_or_else(|| current.date.clone()),
            rating: self.rating.unwrap_or(current.rating),
            status: self.status.unwrap_or_else(|| current.status.clone()),
        }
    }
}

/// `?start=&count=` window over the id-ordered listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct Page {
    #[garde(range(min = 0))]
    pub start: Option<i64>,
    #[garde(range(min = 0))]
    pub count: Option<i64>,
}

impl Page {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: i64, count: i64) -> Self {
        Self {
            start: Some(start),
            count: Some(count),
        }
    }

    pub fn offset(&self) -> usize {
        self.start.map_or(0, |start| start.max(0) as usize)
    }

    /// `None` means no upper bound
    pub fn limit(&self) -> Option<usize> {
        self.count.map(|count| count.max(0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Book {
        Book {
            id: 7,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            publisher: "Chilton".to_string(),
            date: "8/1/1965".to_string(),
            rating: 5,
            status: "Available".to_string(),
        }
    }

    #[test]
    fn patch_overlays_only_provided_fields() {
        let patch: BookPatch =
            serde_json::from_str(r#"{"title":"Dune Messiah","price":11.22}"#).unwrap();

        let merged = patch.apply(&stored());

        assert_eq!(merged.id, 7);
        assert_eq!(merged.title, "Dune Messiah");
        assert_eq!(merged.author, "Frank Herbert");
        assert_eq!(merged.rating, 5);
        assert_eq!(merged.status, "Available");
    }

    #[test]
    fn empty_patch_is_identity() {
        assert_eq!(BookPatch::default().apply(&stored()), stored());
    }

    #[test]
    fn new_book_rating_defaults_to_zero_and_id_is_ignored() {
        let new_book: NewBook = serde_json::from_str(
            r#"{"id":99,"title":"t","author":"a","publisher":"p","date":"d","status":"s"}"#,
        )
        .unwrap();

        assert_eq!(new_book.rating, 0);
        assert_eq!(Book::from_new(1, &new_book).id, 1);
    }

    #[test]
    fn new_book_rejects_empty_text() {
        let new_book = NewBook {
            title: String::new(),
            author: "a".to_string(),
            publisher: "p".to_string(),
            date: "d".to_string(),
            rating: 0,
            status: "s".to_string(),
        };

        let report = new_book.validate().unwrap_err();
        let fields: Vec<String> = report.iter().map(|(path, _)| path.to_string()).collect();
        assert_eq!(fields, vec!["title".to_string()]);
    }

    #[test]
    fn patch_rejects_empty_provided_text() {
        let patch = BookPatch {
            status: Some(String::new()),
            ..BookPatch::default()
        };
        assert!(patch.validate().is_err());
        assert!(BookPatch::default().validate().is_ok());
    }

    #[test]
    fn page_rejects_negative_bounds() {
        assert!(Page::new(-1, 10).validate().is_err());
        assert!(Page::new(0, 10).validate().is_ok());
        assert_eq!(Page::all().limit(), None);
        assert_eq!(Page::new(2, 3).offset(), 2);
    }
}
