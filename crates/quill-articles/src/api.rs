//! Client side of the article endpoints.

use std::time::Duration;

use quill_common::{ApiConfig, ApiError, QuillError};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Deserializer, Serialize};
use smol_str::{SmolStr, ToSmolStr};
use tracing::{debug, warn};
use url::Url;

use crate::draft::{ArticleDraft, ArticleStatus, ImageAttachment};

/// A selectable article category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "id_string")]
    pub id: SmolStr,
    #[serde(alias = "label")]
    pub name: SmolStr,
}

/// Record returned by a successful creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedArticle {
    pub id: SmolStr,
}

/// Everything sent to the creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    pub category: String,
    pub short_description: String,
    pub content: String,
    pub status: ArticleStatus,
    pub featured: bool,
    pub tags: Vec<String>,
    #[serde(skip)]
    pub image: Option<ImageAttachment>,
}

impl CreateArticleRequest {
    /// Package `draft`, deriving tags from its raw tag input.
    pub fn from_draft(draft: &ArticleDraft) -> Self {
        Self {
            title: draft.title.clone(),
            category: draft.category.clone(),
            short_description: draft.short_description.clone(),
            content: draft.content.clone(),
            status: draft.status,
            featured: draft.featured,
            tags: draft.derived_tags(),
            image: draft.image.clone(),
        }
    }

    /// Text parts in the order they are sent. `tags` travels as a JSON array.
    pub fn text_parts(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("category", self.category.clone()),
            ("shortDescription", self.short_description.clone()),
            ("content", self.content.clone()),
            ("status", self.status.as_str().to_owned()),
            ("featured", self.featured.to_string()),
            ("tags", serde_json::Value::from(self.tags.clone()).to_string()),
        ]
    }

    pub fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.text_parts() {
            form = form.text(name, value);
        }
        if let Some(image) = self.image {
            let part = Part::bytes(image.data.to_vec())
                .file_name(image.name)
                .mime_str(&image.mime_type)?;
            form = form.part("image", part);
        }
        Ok(form)
    }
}

/// The external operations the form depends on.
///
/// `create_article` distinguishes an application-level refusal (`Ok(None)`)
/// from a failure to complete the call at all (`Err`).
#[allow(async_fn_in_trait)]
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait ArticleApi {
    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn create_article(
        &self,
        request: CreateArticleRequest,
    ) -> Result<Option<CreatedArticle>, ApiError>;
}

/// [`ArticleApi`] over HTTP.
///
/// - `GET {base}/categories`
/// - `POST {base}/articles` as `multipart/form-data`
#[derive(Debug, Clone)]
pub struct HttpArticleApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpArticleApi {
    pub fn new(config: &ApiConfig) -> Result<Self, QuillError> {
        let base = config.url()?;
        let client = build_client(config.timeout()).map_err(ApiError::from)?;
        Ok(Self::with_client(client, base))
    }

    /// `base` should end in `/`; endpoints are joined beneath it.
    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|e| ApiError::InvalidUrl {
            url: format!("{}{}", self.base, path),
            message: e.to_string(),
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

#[cfg(target_arch = "wasm32")]
fn build_client(_timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    Ok(reqwest::Client::new())
}

impl ArticleApi for HttpArticleApi {
    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint("categories")?;
        debug!(%url, "fetching categories");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(ApiError::Status { status, body });
        }
        decode_categories(&body)
    }

    async fn create_article(
        &self,
        request: CreateArticleRequest,
    ) -> Result<Option<CreatedArticle>, ApiError> {
        let url = self.endpoint("articles")?;
        debug!(%url, title = %request.title, "creating article");
        let form = request.into_form()?;
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        interpret_creation(status, &body)
    }
}

pub fn decode_categories(body: &str) -> Result<Vec<Category>, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

/// Map a creation response onto the `ArticleApi` contract.
///
/// A 2xx body carrying an `id` is a created record. A 2xx body without one
/// (`null`, `false`, empty) and the 400/409/422 refusals are `None`. Any other
/// status is an error.
pub fn interpret_creation(status: u16, body: &str) -> Result<Option<CreatedArticle>, ApiError> {
    match status {
        200..=299 => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let value: serde_json::Value =
                serde_json::from_str(trimmed).map_err(|e| ApiError::Decode {
                    message: e.to_string(),
                })?;
            Ok(created_from_value(&value))
        }
        400 | 409 | 422 => {
            warn!(status, body, "article creation refused");
            Ok(None)
        }
        _ => Err(ApiError::Status {
            status,
            body: body.to_owned(),
        }),
    }
}

fn created_from_value(value: &serde_json::Value) -> Option<CreatedArticle> {
    let record = value.get("data").unwrap_or(value);
    let id = match record.get("id")? {
        serde_json::Value::String(s) if !s.is_empty() => s.to_smolstr(),
        serde_json::Value::Number(n) => n.to_smolstr(),
        _ => return None,
    };
    Some(CreatedArticle { id })
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SmolStr, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(SmolStr),
        Number(serde_json::Number),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Text(s) => s,
        Repr::Number(n) => n.to_smolstr(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_derives_tags() {
        let draft = ArticleDraft {
            title: "Title".into(),
            tag_input: "rust, web ,, cli".into(),
            ..ArticleDraft::default()
        };
        let request = CreateArticleRequest::from_draft(&draft);
        assert_eq!(request.tags, vec!["rust", "web", "cli"]);

        let parts = request.text_parts();
        let names: Vec<_> = parts.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "title",
                "category",
                "shortDescription",
                "content",
                "status",
                "featured",
                "tags"
            ]
        );
        assert_eq!(parts[4].1, "draft");
        assert_eq!(parts[5].1, "false");
        assert_eq!(parts[6].1, r#"["rust","web","cli"]"#);
    }

    #[test]
    fn test_interpret_creation() {
        assert_eq!(
            interpret_creation(201, r#"{"id": 42, "title": "x"}"#).unwrap(),
            Some(CreatedArticle { id: "42".into() })
        );
        assert_eq!(
            interpret_creation(200, r#"{"data": {"id": "a1"}}"#).unwrap(),
            Some(CreatedArticle { id: "a1".into() })
        );
        assert_eq!(interpret_creation(200, "null").unwrap(), None);
        assert_eq!(interpret_creation(200, "false").unwrap(), None);
        assert_eq!(interpret_creation(204, "").unwrap(), None);
        assert_eq!(interpret_creation(422, "{}").unwrap(), None);

        assert!(matches!(
            interpret_creation(500, "boom"),
            Err(ApiError::Status { status: 500, .. })
        ));
        assert!(matches!(
            interpret_creation(200, "<html>"),
            Err(ApiError::Decode { .. })
        ));
    }

    #[test]
    fn test_decode_categories() {
        let categories =
            decode_categories(r#"[{"id": 1, "name": "News"}, {"id": "events", "label": "Events"}]"#)
                .unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].id, "1");
        assert_eq!(categories[1].name, "Events");
        assert!(decode_categories("{}").is_err());
    }

    #[test]
    fn test_endpoints_join_under_base() {
        let api = HttpArticleApi::new(&ApiConfig {
            base_url: "https://admin.example.org/api".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            api.endpoint("articles").unwrap().as_str(),
            "https://admin.example.org/api/articles"
        );
    }
}
