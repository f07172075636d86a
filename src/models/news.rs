//! News article model.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A published news article. Seeded once, never edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    /// Paragraphs separated by a blank line.
    pub content: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub category: String,
}

impl NewsArticle {
    /// Split `content` into its paragraphs.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Sort articles most recent first.
pub fn sort_newest_first(articles: &mut [NewsArticle]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

const DRELLO_TITLE: &str = "Drello - Our Task Management Platform Officially Launches";
const DRELLO_EXCERPT: &str = "After months of development, we're excited to announce the official launch of Drello, our flagship task management and productivity platform.";
const DRELLO_CONTENT: &str = "We are thrilled to announce the official launch of Drello, Tyora's first flagship product. Drello is a comprehensive task management and productivity platform designed to help individuals and teams organize their work efficiently.\n\nBuilt with modern web technologies and a focus on user experience, Drello offers intuitive project organization, collaborative features, and powerful productivity tools. This launch marks a significant milestone for Tyora as we begin our journey to build Africa's tech future.\n\nDrello is now available for beta testing, and we're actively gathering feedback from early users to improve the platform further.";

const AXIOM_TITLE: &str = "Axiom AI Model Development Underway";
const AXIOM_EXCERPT: &str = "We're working on Axiom, our proprietary AI model that will power intelligent features across our product ecosystem.";
const AXIOM_CONTENT: &str = "Development of Axiom, Tyora's proprietary AI model, is well underway. This artificial intelligence system will serve as the foundation for intelligent features across our entire product ecosystem.\n\nAxiom is being designed with a focus on practical applications that can benefit African businesses and students. The model will initially focus on natural language processing and task automation capabilities.\n\nWhile still in development, early prototypes show promising results. We expect to begin alpha testing in the coming months as we work towards integrating AI capabilities into our existing and future products.";

fn drello(id: &str) -> NewsArticle {
    NewsArticle {
        id: id.to_string(),
        title: DRELLO_TITLE.to_string(),
        excerpt: DRELLO_EXCERPT.to_string(),
        content: DRELLO_CONTENT.to_string(),
        author: "Fagite Emmanuel Olamide".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 12, 15, 10, 0, 0).unwrap(),
        category: "Product Launch".to_string(),
    }
}

fn axiom(id: &str) -> NewsArticle {
    NewsArticle {
        id: id.to_string(),
        title: AXIOM_TITLE.to_string(),
        excerpt: AXIOM_EXCERPT.to_string(),
        content: AXIOM_CONTENT.to_string(),
        author: "Tyora Development Team".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 12, 1, 14, 30, 0).unwrap(),
        category: "Development".to_string(),
    }
}

/// The two articles written by the initialization routine. Ids are fixed.
pub fn seed_articles() -> Vec<NewsArticle> {
    vec![drello("news_drello_launch"), axiom("news_axiom_development")]
}

/// Articles shown by clients when the backend cannot be reached.
pub fn fallback_articles() -> Vec<NewsArticle> {
    vec![drello("fallback_drello"), axiom("fallback_axiom")]
}
