use crate::error::CompressError;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupOptions {
    pub remove_comments: bool,
    pub remove_intertag_spaces: bool,
    pub remove_multi_spaces: bool,
    pub preserve_line_breaks: bool,
    pub remove_quotes: bool,
    /// Recognize HTML raw-text elements.
    pub html: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawElement {
    Script,
    Style,
    Pre,
    Textarea,
}

impl RawElement {
    fn from_tag_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "script" => Some(RawElement::Script),
            "style" => Some(RawElement::Style),
            "pre" => Some(RawElement::Pre),
            "textarea" => Some(RawElement::Textarea),
            _ => None,
        }
    }

    fn tag_name(self) -> &'static str {
        match self {
            RawElement::Script => "script",
            RawElement::Style => "style",
            RawElement::Pre => "pre",
            RawElement::Textarea => "textarea",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Tag(&'a str),
    Comment(&'a str),
    Verbatim(&'a str),
    Raw {
        element: RawElement,
        open_tag: &'a str,
        body: &'a str,
    },
}

/// Minifies `input`. `embedded` receives each raw element with its opening
/// tag and body and returns a replacement body, or `None` to keep it.
pub fn minify_markup<F>(
    input: &str,
    options: &MarkupOptions,
    mut embedded: F,
) -> Result<String, CompressError>
where
    F: FnMut(RawElement, &str, &str) -> Result<Option<String>, CompressError>,
{
    let mut out = String::with_capacity(input.len());
    let mut pending = String::new();
    let mut after_markup = false;

    for token in tokenize(input, options.html) {
        match token {
            Token::Text(text) => pending.push_str(text),
            Token::Comment(comment) if options.remove_comments && !is_kept_comment(comment) => {}
            markup => {
                flush_text(&mut out, &mut pending, after_markup, true, options);
                after_markup = true;
                match markup {
                    Token::Tag(tag) => out.push_str(&rewrite_tag(tag, options.remove_quotes)),
                    Token::Comment(s) | Token::Verbatim(s) => out.push_str(s),
                    Token::Raw {
                        element,
                        open_tag,
                        body,
                    } => match embedded(element, open_tag, body)? {
                        Some(replacement) => out.push_str(&replacement),
                        None => out.push_str(body),
                    },
                    Token::Text(_) => unreachable!("text is buffered above"),
                }
            }
        }
    }
    flush_text(&mut out, &mut pending, after_markup, false, options);

    Ok(out.trim().to_string())
}

fn flush_text(
    out: &mut String,
    pending: &mut String,
    after_markup: bool,
    before_markup: bool,
    options: &MarkupOptions,
) {
    if pending.is_empty() {
        return;
    }
    let intertag = after_markup && before_markup && pending.trim().is_empty();
    if intertag && options.remove_intertag_spaces {
        if options.preserve_line_breaks && pending.contains('\n') {
            out.push('\n');
        }
    } else if options.remove_multi_spaces {
        collapse_whitespace(out, pending, options.preserve_line_breaks);
    } else {
        out.push_str(pending);
    }
    pending.clear();
}

// Each whitespace run becomes one space, or one newline when the run held a
// line break and line breaks are kept.
fn collapse_whitespace(out: &mut String, text: &str, keep_line_breaks: bool) {
    let mut run: Option<bool> = None;
    for c in text.chars() {
        if c.is_whitespace() {
            let newline = c == '\n' || c == '\r';
            run = Some(run.unwrap_or(false) || newline);
            continue;
        }
        if let Some(had_newline) = run.take() {
            out.push(if keep_line_breaks && had_newline { '\n' } else { ' ' });
        }
        out.push(c);
    }
    if let Some(had_newline) = run {
        out.push(if keep_line_breaks && had_newline { '\n' } else { ' ' });
    }
}

fn is_kept_comment(comment: &str) -> bool {
    comment.starts_with("<!--[if")
        || comment.starts_with("<!--<![endif]")
        || comment.starts_with("<!--#")
}

fn tokenize(input: &str, html: bool) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while let Some(rel) = input[pos..].find('<') {
        let lt = pos + rel;
        let rest = &input[lt..];
        let (end, token) = if rest.starts_with("<!--") {
            let end = if rest[4..].starts_with('>') {
                lt + 5
            } else if rest[4..].starts_with("->") {
                lt + 6
            } else {
                rest[4..].find("-->").map_or(input.len(), |i| lt + 4 + i + 3)
            };
            (end, Token::Comment(&input[lt..end]))
        } else if rest.starts_with("<![CDATA[") {
            let end = rest.find("]]>").map_or(input.len(), |i| lt + i + 3);
            (end, Token::Verbatim(&input[lt..end]))
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>').map_or(input.len(), |i| lt + i + 1);
            (end, Token::Verbatim(&input[lt..end]))
        } else if starts_tag(rest) {
            match tag_end(rest) {
                Some(len) => (lt + len, Token::Tag(&input[lt..lt + len])),
                None => {
                    pos = lt + 1;
                    continue;
                }
            }
        } else {
            pos = lt + 1;
            continue;
        };

        if text_start < lt {
            tokens.push(Token::Text(&input[text_start..lt]));
        }
        let raw = match &token {
            Token::Tag(tag) if html => opening_raw_element(tag).map(|element| (element, *tag)),
            _ => None,
        };
        tokens.push(token);
        pos = end;
        text_start = end;

        if let Some((element, open_tag)) = raw {
            let needle = format!("</{}", element.tag_name());
            let body_end = input[pos..]
                .to_ascii_lowercase()
                .find(&needle)
                .map_or(input.len(), |i| pos + i);
            tokens.push(Token::Raw {
                element,
                open_tag,
                body: &input[pos..body_end],
            });
            pos = body_end;
            text_start = body_end;
        }
    }
    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

fn starts_tag(rest: &str) -> bool {
    let b = rest.as_bytes();
    match b.get(1) {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some(b'/') => b.get(2).is_some_and(u8::is_ascii_alphabetic),
        _ => false,
    }
}

// Length of the tag starting at `rest[0] == '<'`, honoring quoted values.
fn tag_end(rest: &str) -> Option<usize> {
    let mut quote = None;
    for (i, b) in rest.bytes().enumerate().skip(1) {
        match (quote, b) {
            (None, b'>') => return Some(i + 1),
            (None, b'"' | b'\'') => quote = Some(b),
            (Some(q), _) if q == b => quote = None,
            _ => {}
        }
    }
    None
}

fn tag_name(tag: &str) -> &str {
    let name = tag.trim_start_matches('<');
    let end = name
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '_'))
        .unwrap_or(name.len());
    &name[..end]
}

fn opening_raw_element(tag: &str) -> Option<RawElement> {
    if tag.starts_with("</") || tag.ends_with("/>") {
        return None;
    }
    RawElement::from_tag_name(tag_name(tag))
}

/// Value of attribute `name` in an opening tag, without its quotes.
pub fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lower = tag.to_ascii_lowercase();
    let mut from = 0;
    while let Some(rel) = lower[from..].find(name) {
        let at = from + rel;
        from = at + name.len();
        let preceded = lower[..at].ends_with(|c: char| c.is_whitespace());
        let rest = lower[from..].trim_start();
        if !preceded || !rest.starts_with('=') {
            continue;
        }
        let value_start = tag.len() - rest.len() + 1;
        let value = tag[value_start..].trim_start();
        return Some(match value.chars().next() {
            Some(q @ ('"' | '\'')) => value[1..].split(q).next().unwrap_or(""),
            _ => value
                .split(|c: char| c.is_whitespace() || c == '>')
                .next()
                .unwrap_or(""),
        });
    }
    None
}

fn unquotable(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

// Collapses whitespace inside a tag, drops it around `=` and before the
// closing `>` or `/>`, and optionally unquotes simple attribute values.
fn rewrite_tag(tag: &str, remove_quotes: bool) -> String {
    let mut out = String::with_capacity(tag.len());
    let mut pending_space = false;
    let mut after_unquoted = false;
    let mut i = 0;

    while i < tag.len() {
        let c = tag[i..].chars().next().unwrap_or_default();
        let width = c.len_utf8().max(1);
        if c.is_whitespace() {
            pending_space = true;
            i += width;
            continue;
        }
        let closing = c == '>' || (c == '/' && tag[i + 1..].starts_with('>'));
        if pending_space && !closing && c != '=' && !out.ends_with('=') {
            out.push(' ');
        } else if c == '/' && closing && after_unquoted {
            out.push(' ');
        }
        pending_space = false;
        after_unquoted = false;

        if c == '"' || c == '\'' {
            let close = tag[i + 1..].find(c).map(|j| i + 1 + j);
            let end = close.map_or(tag.len(), |j| j + 1);
            let inner = &tag[i + 1..close.unwrap_or(tag.len())];
            if remove_quotes && close.is_some() && out.ends_with('=') && unquotable(inner) {
                out.push_str(inner);
                after_unquoted = true;
            } else {
                out.push_str(&tag[i..end]);
            }
            i = end;
            continue;
        }
        out.push(c);
        i += width;
    }
    out
}
