use std::fmt;

use url::Url;

/// Written at the start of a chapter file whose fetch failed.
pub static FAILURE_MARKER: &str = "[novel-fetch] chapter failed: ";

/// Failure message used when the content element vanished after the wait succeeded.
pub static CONTENT_NOT_FOUND: &str = "chapter content not found";

/// One entry of the listing page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRef {
    /// 1-based index among the matched listing entries.
    pub position: usize,
    pub title: String,
    pub url: Url,
}

impl ChapterRef {
    pub fn new(position: usize, title: impl Into<String>, url: Url) -> Self {
        Self {
            position,
            title: title.into(),
            url,
        }
    }

    /// `<sanitized title>_<position>.txt`; the position keeps equal titles apart.
    pub fn filename(&self) -> String {
        format!("{}_{}.txt", sanitize_title(&self.title), self.position)
    }
}

impl fmt::Display for ChapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.position, self.title)
    }
}

pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterResult {
    pub chapter: ChapterRef,
    pub outcome: Outcome,
}

impl ChapterResult {
    pub fn success(chapter: ChapterRef, text: String) -> Self {
        Self {
            chapter,
            outcome: Outcome::Success(text),
        }
    }

    pub fn failure(chapter: ChapterRef, message: impl Into<String>) -> Self {
        Self {
            chapter,
            outcome: Outcome::Failure(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// File body: the text itself, or the failure marker followed by the message.
    pub fn contents(&self) -> String {
        match &self.outcome {
            Outcome::Success(text) => text.clone(),
            Outcome::Failure(message) => format!("{}{}", FAILURE_MARKER, message),
        }
    }
}
