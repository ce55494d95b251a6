// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Idiomas com rótulos de mês traduzidos
const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "pt"];
const DEFAULT_LANGUAGE: &str = "en";

// Idioma preferido do cliente, já reduzido ao código primário ("pt-BR" -> "pt")
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    pub fn from_header(raw: Option<&str>) -> Self {
        let lang = raw
            .map(accept_language::parse)
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.split('-').next().unwrap_or(&tag).to_lowercase())
            .find(|lang| SUPPORTED_LANGUAGES.contains(&lang.as_str()))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Locale(lang)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok());

        Ok(Locale::from_header(raw))
    }
}
