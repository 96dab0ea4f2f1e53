// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response types for the Notion pages API.

use serde::{Deserialize, Serialize};

/// Request body for POST /v1/pages.
#[derive(Debug, Serialize)]
pub struct CreatePageRequest {
    pub parent: Parent,
    pub properties: PageProperties,
}

impl CreatePageRequest {
    /// Builds a page request with the given title in the target database.
    pub fn new(database_id: &str, title: &str) -> Self {
        Self {
            parent: Parent {
                database_id: database_id.to_string(),
            },
            properties: PageProperties {
                name: TitleProperty {
                    title: vec![RichText {
                        text: TextContent {
                            content: title.to_string(),
                        },
                    }],
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Parent {
    pub database_id: String,
}

#[derive(Debug, Serialize)]
pub struct PageProperties {
    #[serde(rename = "Name")]
    pub name: TitleProperty,
}

#[derive(Debug, Serialize)]
pub struct TitleProperty {
    pub title: Vec<RichText>,
}

#[derive(Debug, Serialize)]
pub struct RichText {
    pub text: TextContent,
}

#[derive(Debug, Serialize)]
pub struct TextContent {
    pub content: String,
}

/// Success response body for POST /v1/pages. Only the id is used.
#[derive(Debug, Deserialize)]
pub struct CreatePageResponse {
    pub id: String,
}

/// Error response body returned by the Notion API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
}
