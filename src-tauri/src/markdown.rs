//! Model output is markdown; the UI shows it as sanitized HTML

use pulldown_cmark::{html, Options, Parser};
use std::collections::HashSet;

/// Render GitHub-flavoured markdown and strip anything unsafe
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let allowed_schemes: HashSet<&str> = ["http", "https", "mailto"].into_iter().collect();

    ammonia::Builder::default()
        .url_schemes(allowed_schemes)
        .clean(&html_output)
        .to_string()
}
