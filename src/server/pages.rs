//! HTML pages.
//!
//! Templates live in `templates/` and are compiled into the binary by askama.
//! Every page extends `layout.html`; interpolated values are HTML-escaped.

use askama::Template;
use axum::response::Html;

use crate::emotion::TextPrediction;
use crate::error::Result;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage;

#[derive(Template)]
#[template(path = "face-emotion.html")]
pub struct FaceEmotionPage;

/// Entries are read from the browser's local storage by the page script.
#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryPage;

/// The text form, followed by the prediction for `user_input` once there is one.
#[derive(Template)]
#[template(path = "text-emotion.html")]
pub struct TextEmotionPage<'a> {
    pub user_input: &'a str,
    pub prediction: Option<&'a TextPrediction>,
}

pub fn html(page: &impl Template) -> Result<Html<String>> {
    Ok(Html(page.render()?))
}
