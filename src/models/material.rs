//! Material (circulating catalog entry) model and related types

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

/// Category of a material. The loan duration of each category lives in
/// [`crate::services::policy::LoanPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaterialCategory {
    Book,
    Journal,
    Magazine,
    Thesis,
    /// Tag read from storage that the catalog does not know; kept verbatim
    Other(String),
}

impl MaterialCategory {
    /// Tag used in the backing store
    pub fn as_tag(&self) -> &str {
        match self {
            MaterialCategory::Book => "BOOK",
            MaterialCategory::Journal => "JOURNAL",
            MaterialCategory::Magazine => "MAGAZINE",
            MaterialCategory::Thesis => "THESIS",
            MaterialCategory::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MaterialCategory::Other(_))
    }

    /// Lenient parse of a stored tag; an unrecognized tag is kept as `Other`
    pub fn from_tag(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "BOOK" => MaterialCategory::Book,
            "JOURNAL" => MaterialCategory::Journal,
            "MAGAZINE" => MaterialCategory::Magazine,
            "THESIS" | "THESISBOOK" => MaterialCategory::Thesis,
            _ => MaterialCategory::Other(s.trim().to_string()),
        }
    }
}

impl std::str::FromStr for MaterialCategory {
    type Err = String;

    /// Strict parse for user input: only the four known categories
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match MaterialCategory::from_tag(s) {
            MaterialCategory::Other(tag) => Err(format!(
                "Invalid category: {} (expected book, journal, magazine or thesis)",
                tag
            )),
            known => Ok(known),
        }
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

impl Serialize for MaterialCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for MaterialCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(MaterialCategory::from_tag(&tag))
    }
}

/// Circulating material with its copy counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub category: MaterialCategory,
    pub id: String,
    pub title: String,
    /// Author or publisher, empty when unknown
    pub author: String,
    pub year_published: i32,
    pub total_copies: u32,
    pub borrowed_copies: u32,
}

impl Material {
    pub fn available_copies(&self) -> u32 {
        self.total_copies.saturating_sub(self.borrowed_copies)
    }

    /// Check out one copy. Counter stays within `[0, total_copies]`.
    pub fn checkout_copy(&mut self) {
        self.borrowed_copies = self.borrowed_copies.saturating_add(1).min(self.total_copies);
    }

    /// Credit one copy back. A double return cannot push the counter below zero.
    pub fn return_copy(&mut self) {
        self.borrowed_copies = self.borrowed_copies.saturating_sub(1);
    }

    pub fn display_title(&self) -> String {
        if self.author.is_empty() {
            self.title.clone()
        } else {
            format!("{} by {}", self.title, self.author)
        }
    }

    /// Same work: title and author match case-insensitively
    pub fn same_work(&self, title: &str, author: &str) -> bool {
        self.title.trim().eq_ignore_ascii_case(title.trim())
            && self.author.trim().eq_ignore_ascii_case(author.trim())
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] ID: {} | {} | Year: {} | Copies: {} (Available: {})",
            self.category,
            self.id,
            self.display_title(),
            self.year_published,
            self.total_copies,
            self.available_copies()
        )
    }
}

/// Add material request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaterial {
    #[validate(length(min = 1, message = "Material ID must not be empty"))]
    pub id: String,
    pub category: MaterialCategory,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub author: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Year must be between 0 and 9999"))]
    pub year_published: i32,
    pub total_copies: u32,
}

impl CreateMaterial {
    pub fn into_material(self) -> Material {
        Material {
            category: self.category,
            id: self.id.trim().to_string(),
            title: self.title.trim().to_string(),
            author: self.author.map(|a| a.trim().to_string()).unwrap_or_default(),
            year_published: self.year_published,
            total_copies: self.total_copies,
            borrowed_copies: 0,
        }
    }
}

/// Edit material request; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMaterial {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub author: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Year must be between 0 and 9999"))]
    pub year_published: Option<i32>,
    pub total_copies: Option<u32>,
}

impl UpdateMaterial {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.year_published.is_none()
            && self.total_copies.is_none()
    }
}
