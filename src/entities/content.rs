//! Static content page records (certification explanations, about page).

use serde::{Deserialize, Serialize};

/// Subtitle and paragraph inside a content section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Item heading
    pub subtitle: String,
    /// Paragraph text
    pub text: String,
}

/// Titled group of content items
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    /// Section heading
    pub title: String,
    /// Items in display order
    pub content: Vec<ContentItem>,
}

/// Full static content page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPage {
    /// Page title
    pub title: String,
    /// Sections in display order
    pub sections: Vec<ContentSection>,
}
