use serde::{Deserialize, Serialize};

use super::repo::ProjectRow;
use crate::error::AppError;

/// Prefix of the public project id, e.g. `p12`.
pub const DISPLAY_ID_PREFIX: char = 'p';

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub img: String, // cover, first of `images`
    pub images: Vec<String>,
}

impl From<ProjectRow> for ProjectResponse {
    fn from(r: ProjectRow) -> Self {
        Self {
            id: format!("{DISPLAY_ID_PREFIX}{}", r.id),
            img: r.images.first().cloned().unwrap_or_default(),
            title: r.title,
            desc: r.description,
            images: r.images,
        }
    }
}

/// Accepts `12` or a display id such as `p12`.
pub fn parse_project_id(raw: &str) -> Result<i64, AppError> {
    let raw = raw.trim();
    let digits = match raw.chars().next() {
        Some(c) if raw.len() > 1 && !c.is_ascii_digit() => &raw[c.len_utf8()..],
        _ => raw,
    };
    digits
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::validation("Invalid project id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn row(images: Vec<&str>) -> ProjectRow {
        ProjectRow {
            id: 12,
            title: "Portfolio".into(),
            description: "site".into(),
            images: images.into_iter().map(String::from).collect(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn parses_plain_and_prefixed_ids() {
        assert_eq!(parse_project_id("12").unwrap(), 12);
        assert_eq!(parse_project_id("p12").unwrap(), 12);
        assert_eq!(parse_project_id("#7").unwrap(), 7);
    }

    #[test]
    fn rejects_garbage_ids() {
        assert!(parse_project_id("").is_err());
        assert!(parse_project_id("p").is_err());
        assert!(parse_project_id("pp12").is_err());
        assert!(parse_project_id("abc").is_err());
        assert!(parse_project_id("0").is_err());
    }

    #[test]
    fn response_uses_first_image_as_cover() {
        let r = ProjectResponse::from(row(vec!["a.png", "b.png"]));
        assert_eq!(r.id, "p12");
        assert_eq!(r.img, "a.png");
        assert_eq!(r.images, vec!["a.png", "b.png"]);
    }

    #[test]
    fn response_without_images_has_empty_cover() {
        let r = ProjectResponse::from(row(vec![]));
        assert_eq!(r.img, "");
        assert!(r.images.is_empty());
    }
}
