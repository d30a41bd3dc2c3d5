//! Column-based line breaking for minified CSS and JavaScript.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Css,
    JavaScript,
}

impl Syntax {
    fn boundary(self) -> u8 {
        match self {
            Syntax::Css => b'}',
            Syntax::JavaScript => b';',
        }
    }
}

pub fn break_lines(code: &str, column: usize, syntax: Syntax) -> String {
    let bytes = code.as_bytes();
    let boundary = syntax.boundary();
    let mut out = String::with_capacity(code.len() + code.len() / column.max(1));
    let mut copied = 0;
    let mut line_start = 0;

    for (offset, byte) in CodeBytes::new(code, syntax) {
        if byte == b'\n' {
            line_start = offset + 1;
        } else if byte == boundary && offset + 1 - line_start > column {
            if bytes.get(offset + 1) == Some(&b'\n') {
                continue;
            }
            out.push_str(&code[copied..=offset]);
            out.push('\n');
            copied = offset + 1;
            line_start = offset + 1;
        }
    }
    out.push_str(&code[copied..]);
    out
}

/// Iterator over the bytes of `source` that are code: literals and comments
/// are skipped over, everything else is yielded with its offset.
pub(crate) struct CodeBytes<'a> {
    src: &'a [u8],
    pos: usize,
    syntax: Syntax,
    last_significant: Option<usize>,
}

impl<'a> CodeBytes<'a> {
    pub(crate) fn new(source: &'a str, syntax: Syntax) -> Self {
        CodeBytes {
            src: source.as_bytes(),
            pos: 0,
            syntax,
            last_significant: None,
        }
    }

    // Whether a `/` at the current position opens a regex literal rather than
    // being a division, judged from the previous significant token.
    fn regex_allowed(&self) -> bool {
        const KEYWORDS: [&[u8]; 10] = [
            b"return", b"typeof", b"case", b"do", b"else", b"in", b"new", b"delete", b"void",
            b"throw",
        ];
        let Some(end) = self.last_significant else {
            return true;
        };
        let prev = self.src[end];
        if is_ident_byte(prev) {
            let start = self.src[..end]
                .iter()
                .rposition(|&b| !is_ident_byte(b))
                .map_or(0, |i| i + 1);
            return KEYWORDS.contains(&&self.src[start..=end]);
        }
        b"(,=:[!&|?{};+-*%<>~^".contains(&prev)
    }
}

impl Iterator for CodeBytes<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<(usize, u8)> {
        let js = self.syntax == Syntax::JavaScript;
        while self.pos < self.src.len() {
            let start = self.pos;
            let byte = self.src[start];
            let next = self.src.get(start + 1).copied();
            match byte {
                b'"' | b'\'' => self.pos = skip_quoted(self.src, start),
                b'`' if js => self.pos = skip_quoted(self.src, start),
                b'/' if next == Some(b'*') => {
                    self.pos = find(self.src, start + 2, b"*/").map_or(self.src.len(), |i| i + 2);
                    continue;
                }
                b'/' if js && next == Some(b'/') => {
                    self.pos = find(self.src, start, b"\n").unwrap_or(self.src.len());
                    continue;
                }
                b'/' if js && self.regex_allowed() => self.pos = skip_regex(self.src, start),
                _ => {
                    self.pos += 1;
                    if !byte.is_ascii_whitespace() {
                        self.last_significant = Some(start);
                    }
                    return Some((start, byte));
                }
            }
            self.last_significant = Some(self.pos - 1);
        }
        None
    }
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn find(src: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    src.get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

// Returns the offset just past the closing quote. An unterminated string or
// template stops at the end of input; a plain string also stops at a newline.
fn skip_quoted(src: &[u8], start: usize) -> usize {
    let quote = src[start];
    let mut i = start + 1;
    while i < src.len() {
        match src[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            b'\n' if quote != b'`' => return i,
            _ => i += 1,
        }
    }
    src.len()
}

fn skip_regex(src: &[u8], start: usize) -> usize {
    let mut in_class = false;
    let mut i = start + 1;
    while i < src.len() {
        match src[i] {
            b'\\' => i += 2,
            b'[' => {
                in_class = true;
                i += 1;
            }
            b']' => {
                in_class = false;
                i += 1;
            }
            b'/' if !in_class => return i + 1,
            b'\n' => return i,
            _ => i += 1,
        }
    }
    src.len()
}
