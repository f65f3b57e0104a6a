use serde::{Deserialize, Serialize};

/// A single news search result. Every field is optional on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source_name: Option<String>,
}

impl Article {
    /// Only articles with a non-blank title and url are shown to the user.
    pub fn is_displayable(&self) -> bool {
        fn present(field: &Option<String>) -> bool {
            field.as_deref().is_some_and(|v| !v.trim().is_empty())
        }
        present(&self.title) && present(&self.url)
    }
}

/// Result of one search attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Success(Vec<Article>),
    Failure(String),
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success(_))
    }

    pub fn articles(&self) -> &[Article] {
        match self {
            SearchOutcome::Success(articles) => articles,
            SearchOutcome::Failure(_) => &[],
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            SearchOutcome::Success(_) => None,
            SearchOutcome::Failure(message) => Some(message),
        }
    }
}

// =============================================================================
// Wire format of the `/everything` endpoint
// =============================================================================

#[derive(Deserialize, Debug, Default)]
pub struct EverythingResponse {
    #[serde(default)]
    pub articles: Option<Vec<ArticleDto>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ArticleDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<SourceDto>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SourceDto {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<ArticleDto> for Article {
    fn from(dto: ArticleDto) -> Self {
        Article {
            title: dto.title,
            description: dto.description,
            url: dto.url,
            source_name: dto.source.and_then(|s| s.name),
        }
    }
}

/// Error body NewsAPI sends alongside non-2xx statuses.
#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
