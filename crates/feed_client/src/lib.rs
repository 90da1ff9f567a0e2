//! HTTP client for the riviera feed API.
//!
//! The feed owns sliders, categories, companies, and the category ↔ company
//! link relation. This crate is the only place that knows the feed speaks
//! HTTP: it maps status codes onto [`ClientError`], reads the feed's
//! `{"detail": ...}` error bodies, and absorbs the feed's habit of answering
//! list endpoints with either a bare JSON array or `{"data": [...]}` so that
//! nothing downstream ever sees the difference.
//!
//! Endpoints are relative to the configured base URL:
//! `companies`, `categories`, `categories/{id}/companies`,
//! `categories/{id}/companies/{company_id}` (POST to link, DELETE to unlink),
//! `sliders`, `sliders/{id}`. Slider create/update are multipart because the
//! image travels as a file part.

use std::path::PathBuf;

use reqwest::{Response, StatusCode, Url, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use api_types::{
    CategoryId, CompanyId, SliderId,
    category::{Category, CategoryNew, CategoryUpdate},
    company::Company,
    slider::Slider,
};
use relations::{Directory, DirectoryError};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    BaseUrl(String),
    #[error("feed unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("feed error: {0}")]
    Server(String),
    #[error("could not read image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Error body the feed attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// List endpoints answer with a bare array on the current feed and with a
/// `data` wrapper on the legacy one. Callers always get the plain sequence.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    fn into_inner(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Wrapped { data } => data,
        }
    }
}

/// Multipart payload for slider create/update.
///
/// The image is uploaded from a local file. Create requires one; update keeps
/// the slider's current image when `image` is `None`.
#[derive(Debug, Clone, Default)]
pub struct SliderForm {
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub image: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct FeedClient {
    base_url: Url,
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::BaseUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::BaseUrl(err.to_string()))
    }

    async fn failure(res: Response) -> ClientError {
        let status = res.status();
        let detail = res
            .json::<ErrorBody>()
            .await
            .map(|body| body.detail)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(detail),
            StatusCode::CONFLICT => ClientError::Conflict(detail),
            StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(detail),
            _ => ClientError::Server(detail),
        }
    }

    async fn accept(res: Response) -> Result<(), ClientError> {
        if res.status().is_success() {
            Ok(())
        } else {
            Err(Self::failure(res).await)
        }
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let res = self.http.get(self.endpoint(path)?).send().await?;
        if res.status().is_success() {
            return Ok(res.json::<ListEnvelope<T>>().await?.into_inner());
        }
        Err(Self::failure(res).await)
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        let res = self.http.post(self.endpoint(path)?).json(body).send().await?;
        Self::accept(res).await
    }

    async fn put_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        let res = self.http.put(self.endpoint(path)?).json(body).send().await?;
        Self::accept(res).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let res = self.http.delete(self.endpoint(path)?).send().await?;
        Self::accept(res).await
    }

    // Companies (read-only: the registry subsystem owns them).

    pub async fn list_companies(&self) -> Result<Vec<Company>, ClientError> {
        self.get_list("companies").await
    }

    pub async fn list_category_companies(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Company>, ClientError> {
        self.get_list(&format!("categories/{category}/companies"))
            .await
    }

    // Link relation.

    pub async fn link_company(
        &self,
        company: CompanyId,
        category: CategoryId,
    ) -> Result<(), ClientError> {
        tracing::debug!(company, category, "creating link");
        let res = self
            .http
            .post(self.endpoint(&format!("categories/{category}/companies/{company}"))?)
            .send()
            .await?;
        Self::accept(res).await
    }

    pub async fn unlink_company(
        &self,
        company: CompanyId,
        category: CategoryId,
    ) -> Result<(), ClientError> {
        tracing::debug!(company, category, "removing link");
        self.delete(&format!("categories/{category}/companies/{company}"))
            .await
    }

    // Categories.

    pub async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get_list("categories").await
    }

    pub async fn create_category(&self, category: &CategoryNew) -> Result<(), ClientError> {
        self.post_json("categories", category).await
    }

    pub async fn update_category(
        &self,
        id: CategoryId,
        update: &CategoryUpdate,
    ) -> Result<(), ClientError> {
        self.put_json(&format!("categories/{id}"), update).await
    }

    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ClientError> {
        self.delete(&format!("categories/{id}")).await
    }

    // Sliders.

    pub async fn list_sliders(&self) -> Result<Vec<Slider>, ClientError> {
        self.get_list("sliders").await
    }

    pub async fn create_slider(&self, slider: &SliderForm) -> Result<(), ClientError> {
        if slider.image.is_none() {
            return Err(ClientError::Validation(
                "an image file is required to create a slider".to_string(),
            ));
        }
        let form = Self::slider_parts(slider).await?;
        let res = self
            .http
            .post(self.endpoint("sliders")?)
            .multipart(form)
            .send()
            .await?;
        Self::accept(res).await
    }

    pub async fn update_slider(&self, id: SliderId, slider: &SliderForm) -> Result<(), ClientError> {
        let form = Self::slider_parts(slider).await?;
        let res = self
            .http
            .put(self.endpoint(&format!("sliders/{id}"))?)
            .multipart(form)
            .send()
            .await?;
        Self::accept(res).await
    }

    pub async fn delete_slider(&self, id: SliderId) -> Result<(), ClientError> {
        self.delete(&format!("sliders/{id}")).await
    }

    async fn slider_parts(slider: &SliderForm) -> Result<multipart::Form, ClientError> {
        let mut form = multipart::Form::new()
            .text("title", slider.title.clone())
            .text("description", slider.description.clone());
        if let Some(link) = &slider.link {
            form = form.text("link", link.clone());
        }
        if let Some(path) = &slider.image {
            let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Image {
                path: path.clone(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            form = form.part("image", multipart::Part::bytes(bytes).file_name(file_name));
        }
        Ok(form)
    }
}

/// The manager sees the feed through the [`Directory`] contract; transport
/// problems become `Unreachable`, everything the feed said no to becomes
/// `Rejected` with the feed's own words.
fn directory_error(err: ClientError) -> DirectoryError {
    match err {
        ClientError::Transport(err) => DirectoryError::Unreachable(err.to_string()),
        ClientError::BaseUrl(message) => DirectoryError::Unreachable(message),
        ClientError::NotFound(detail)
        | ClientError::Conflict(detail)
        | ClientError::Validation(detail)
        | ClientError::Server(detail) => DirectoryError::Rejected {
            detail: Some(detail),
        },
        err @ ClientError::Image { .. } => DirectoryError::Rejected {
            detail: Some(err.to_string()),
        },
    }
}

impl Directory for FeedClient {
    async fn companies(&self) -> Result<Vec<Company>, DirectoryError> {
        self.list_companies().await.map_err(directory_error)
    }

    async fn companies_for_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Company>, DirectoryError> {
        self.list_category_companies(category)
            .await
            .map_err(directory_error)
    }

    async fn create_link(
        &self,
        company: CompanyId,
        category: CategoryId,
    ) -> Result<(), DirectoryError> {
        self.link_company(company, category)
            .await
            .map_err(directory_error)
    }

    async fn delete_link(
        &self,
        company: CompanyId,
        category: CategoryId,
    ) -> Result<(), DirectoryError> {
        self.unlink_company(company, category)
            .await
            .map_err(directory_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_lists_deserialize() {
        let raw = r#"[{"id": 1, "name": "Marlin Tours", "is_active": true}]"#;
        let companies: ListEnvelope<Company> = serde_json::from_str(raw).unwrap();
        assert_eq!(companies.into_inner()[0].id, 1);
    }

    #[test]
    fn wrapped_lists_deserialize() {
        let raw = r#"{"data": [{"company_id": 2, "name": "Dune Rides"}]}"#;
        let companies: ListEnvelope<Company> = serde_json::from_str(raw).unwrap();
        let companies = companies.into_inner();
        assert_eq!(companies[0].id, 2);
        assert!(!companies[0].is_active);
    }

    #[test]
    fn legacy_id_spellings_are_accepted() {
        let raw = r#"{"category_id": 7, "name": "Snorkeling", "activity": "water"}"#;
        let category: Category = serde_json::from_str(raw).unwrap();
        assert_eq!(category.id, 7);
        assert_eq!(category.order, 0);
    }

    #[test]
    fn error_bodies_use_the_detail_field() {
        let raw = r#"{"detail": "already linked"}"#;
        let body: ErrorBody = serde_json::from_str(raw).unwrap();
        assert_eq!(body.detail, "already linked");
    }
}
