//! Markdown to HTML
//!
//! GitHub-flavoured options (tables, strikethrough, task lists, footnotes).
//! Tables are wrapped in a `div.table-wrap` so wide ones scroll sideways.
//! Raw HTML in the source is emitted as escaped text, never as markup.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

const TABLE_OPEN: &str = "<div class=\"table-wrap\">";
const TABLE_CLOSE: &str = "</div>\n";

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

pub fn render_markdown(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, options()).flat_map(|event| match event {
        Event::Start(Tag::Table(_)) => {
            vec![Event::Html(CowStr::Borrowed(TABLE_OPEN)), event]
        }
        Event::End(TagEnd::Table) => {
            vec![event, Event::Html(CowStr::Borrowed(TABLE_CLOSE))]
        }
        Event::Html(raw) | Event::InlineHtml(raw) => vec![Event::Text(raw)],
        other => vec![other],
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}
