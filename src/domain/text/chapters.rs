use crate::error::{AppError, AppResult};
use scraper::{Html, Selector};

pub const DEFAULT_CHAPTER_TAG: &str = "chapter";
pub const DEFAULT_TITLE_TAG: &str = "h1";

/// A chapter cut out of an HTML e-book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// 1-based position in the document
    pub index: usize,
    pub title: String,
    pub body: String,
}

impl Chapter {
    /// File contents: the book title on the first line, then the chapter text
    pub fn to_text(&self) -> String {
        format!("{}\n{}", self.title, self.body)
    }

    pub fn file_name(&self) -> String {
        format!("chapter_{}.txt", self.index)
    }
}

/// Split an e-book into chapters.
///
/// The title is the text of the first `title_tag` element. Every `div` whose
/// `id` contains `chapter_tag` becomes one chapter, in document order.
pub fn split_chapters(html: &str, chapter_tag: &str, title_tag: &str) -> AppResult<Vec<Chapter>> {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse(title_tag).map_err(|e| {
        AppError::InvalidInput(format!("Invalid title tag '{}': {:?}", title_tag, e))
    })?;
    let div_selector = Selector::parse("div[id]")
        .map_err(|e| AppError::Internal(format!("div selector: {:?}", e)))?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<Vec<_>>().join("\n"))
        .unwrap_or_default();

    let chapters = document
        .select(&div_selector)
        .filter(|div| {
            div.value()
                .attr("id")
                .is_some_and(|id| id.contains(chapter_tag))
        })
        .enumerate()
        .map(|(i, div)| Chapter {
            index: i + 1,
            title: title.clone(),
            body: div.text().collect::<String>(),
        })
        .collect();

    Ok(chapters)
}
