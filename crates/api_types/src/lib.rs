use serde::{Deserialize, Serialize};

/// Identifier assigned by the feed when a category is created.
pub type CategoryId = i64;
/// Identifier assigned by the company registry.
pub type CompanyId = i64;
/// Identifier assigned by the feed when a slider is created.
pub type SliderId = i64;

/// Activity tag carried by every category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Water,
    Land,
}

impl Activity {
    /// Returns the canonical tag string used by the feed.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Land => "land",
        }
    }
}

pub mod category {
    use super::*;

    /// A category as returned by the feed.
    ///
    /// Some feed endpoints still name the identifier `category_id`; the alias
    /// accepts both spellings.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        #[serde(alias = "category_id")]
        pub id: CategoryId,
        pub name: String,
        pub description: Option<String>,
        /// Display order, lowest first.
        #[serde(default)]
        pub order: u32,
        pub activity: Activity,
    }

    /// Request body for creating a category.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub description: Option<String>,
        pub order: u32,
        pub activity: Activity,
    }

    /// Request body for updating a category. Full replacement; the feed keeps
    /// the identifier.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: String,
        pub description: Option<String>,
        pub order: u32,
        pub activity: Activity,
    }
}

pub mod company {
    use super::*;

    /// A company as returned by the registry.
    ///
    /// Companies are owned by a separate subsystem: the console reads them and
    /// edits the category link relation, nothing else.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Company {
        #[serde(alias = "company_id")]
        pub id: CompanyId,
        pub name: String,
        pub description: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub address: Option<String>,
        #[serde(default)]
        pub is_active: bool,
    }
}

pub mod slider {
    use super::*;

    /// A promotional slider as returned by the feed.
    ///
    /// `image` is the public URL of the uploaded asset. Create/update payloads
    /// are multipart (the image travels as a file part) and live with the HTTP
    /// client rather than here.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Slider {
        #[serde(alias = "slider_id")]
        pub id: SliderId,
        pub title: String,
        pub description: Option<String>,
        pub link: Option<String>,
        pub image: Option<String>,
    }
}
