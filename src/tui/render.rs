//! Post formatting for the three display layouts.

use crate::board::Post;
use crate::resolve::DisplayPrefs;
use crate::tui::settings;
use crossterm::style::Stylize;
use scraper::{Html, Node};

/// Format one post for display. The result has no trailing newline.
///
/// `multilines` wins over `showtime`; with neither set the post is a single
/// `NO : BODY` line.
pub fn render_post(post: &Post, prefs: &DisplayPrefs, color: bool) -> String {
    if prefs.multilines {
        render_multiline(post, color)
    } else if prefs.showtime {
        let time = time_of_day(&post.date).unwrap_or("--:--:--");
        let stamp = if color {
            format!("[{time}]").with(settings::COLOR_POST_TIME).to_string()
        } else {
            format!("[{time}]")
        };
        format!(
            "{} {stamp}{}{}",
            number(post.no, color),
            settings::INLINE_SEPARATOR,
            body_text(&post.body, "")
        )
    } else {
        format!(
            "{}{}{}",
            number(post.no, color),
            settings::INLINE_SEPARATOR,
            body_text(&post.body, "")
        )
    }
}

fn render_multiline(post: &Post, color: bool) -> String {
    let mut header = number(post.no, color);
    header.push_str(settings::HEADER_SEPARATOR);
    if color {
        header.push_str(&post.name.as_str().bold().to_string());
    } else {
        header.push_str(&post.name);
    }
    if !post.mail.is_empty() {
        let mail = format!("({})", post.mail);
        if color {
            header.push_str(&mail.with(settings::COLOR_POST_MAIL).to_string());
        } else {
            header.push_str(&mail);
        }
    }
    header.push_str(settings::HEADER_SEPARATOR);
    header.push_str(&post.date);
    if let Some(id) = &post.poster_id {
        header.push_str(settings::POSTER_ID_PREFIX);
        header.push_str(id);
    }

    let body = body_text(&post.body, "\n");
    let mut out = header;
    for line in body.lines() {
        out.push('\n');
        out.push_str(settings::BODY_INDENT);
        out.push_str(line.trim());
    }
    out
}

fn number(no: u32, color: bool) -> String {
    if color {
        no.to_string()
            .with(settings::COLOR_POST_NUMBER)
            .bold()
            .to_string()
    } else {
        no.to_string()
    }
}

/// Flatten an HTML body to text, replacing each `<br>` with `line_break`.
fn body_text(html: &str, line_break: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if element.name() == "br" => out.push_str(line_break),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// `HH:MM:SS` from a board date such as `2024/01/01(月) 12:34:56.78`.
fn time_of_day(date: &str) -> Option<&str> {
    let token = date.split_whitespace().find(|token| token.contains(':'))?;
    Some(token.split('.').next().unwrap_or(token))
}
