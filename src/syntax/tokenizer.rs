//! Lightweight code-snippet tokenizer for syntax coloring.
//!
//! Six scanners run over the full text in a fixed order (line comment, keyword, quoted string,
//! number, operator, call-position identifier). Each scanner reproduces the matching rules of
//! the editor's original JavaScript patterns, including `\b` word boundaries over ASCII word
//! characters. When spans from different scanners overlap, the earlier scanner owns every
//! byte it claimed; a later span keeps only the bytes nobody owned yet. Bytes no scanner claims
//! become [`TokenRole::Plain`].

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenRole {
    Plain,
    Comment,
    Keyword,
    String,
    Number,
    Operator,
    Function,
}

impl TokenRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenRole::Plain => "plain",
            TokenRole::Comment => "comment",
            TokenRole::Keyword => "keyword",
            TokenRole::String => "string",
            TokenRole::Number => "number",
            TokenRole::Operator => "operator",
            TokenRole::Function => "function",
        }
    }
}

/// Byte range into the tokenized text (or into one line, for [`tokenize_lines`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub text: &'a str,
    pub role: TokenRole,
    pub span: Span,
}

const KEYWORDS: [&str; 16] = [
    "while", "for", "if", "else", "function", "const", "let", "var", "return", "class", "extends",
    "import", "export", "try", "catch", "finally",
];

const OPERATORS: &[u8] = b"+-*/%=<>!&|{}()[];,.:";

type Scanner = fn(&[u8]) -> Vec<Span>;

/// Scanners in precedence order.
const SCANNERS: [(TokenRole, Scanner); 6] = [
    (TokenRole::Comment, scan_comments),
    (TokenRole::Keyword, scan_keywords),
    (TokenRole::String, scan_strings),
    (TokenRole::Number, scan_numbers),
    (TokenRole::Operator, scan_operators),
    (TokenRole::Function, scan_calls),
];

/// Classify `text` into an ordered, gap-free sequence of tokens covering every byte.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();

    // Owner of each byte: (scanner index, span index within that scanner).
    let mut owner: Vec<Option<(usize, usize)>> = vec![None; bytes.len()];
    for (si, (_, scan)) in SCANNERS.iter().enumerate() {
        for (pi, span) in scan(bytes).into_iter().enumerate() {
            for slot in &mut owner[span.start..span.end] {
                if slot.is_none() {
                    *slot = Some((si, pi));
                }
            }
        }
    }

    let mut out = Vec::new();
    let mut start = 0usize;
    while start < bytes.len() {
        let id = owner[start];
        let mut end = start + 1;
        while end < bytes.len() && owner[end] == id {
            end += 1;
        }
        let role = id.map_or(TokenRole::Plain, |(si, _)| SCANNERS[si].0);
        out.push(Token {
            text: &text[start..end],
            role,
            span: Span { start, end },
        });
        start = end;
    }
    out
}

/// Tokenize the whole text, then cut the tokens at line breaks.
///
/// Returns one entry per `\n`-separated line (a trailing `\r` is dropped from the line). Spans
/// are relative to the start of their line, and no token crosses a line boundary, so callers
/// can draw line by line.
pub fn tokenize_lines(text: &str) -> Vec<Vec<Token<'_>>> {
    let tokens = tokenize(text);
    let mut lines = Vec::new();
    let mut k = 0usize;
    let mut line_start = 0usize;

    for raw in text.split('\n') {
        let raw_end = line_start + raw.len();
        let line_end = if raw.ends_with('\r') {
            raw_end - 1
        } else {
            raw_end
        };

        let mut line = Vec::new();
        while k < tokens.len() && tokens[k].span.end <= line_start {
            k += 1;
        }
        let mut j = k;
        while j < tokens.len() && tokens[j].span.start < line_end {
            let t = tokens[j];
            let a = t.span.start.max(line_start);
            let b = t.span.end.min(line_end);
            if a < b {
                line.push(Token {
                    text: &text[a..b],
                    role: t.role,
                    span: Span {
                        start: a - line_start,
                        end: b - line_start,
                    },
                });
            }
            j += 1;
        }
        lines.push(line);
        line_start = raw_end + 1;
    }
    lines
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `\b` at `i`: exactly one side of the position is a word character.
fn word_boundary(bytes: &[u8], i: usize) -> bool {
    let before = i > 0 && is_word(bytes[i - 1]);
    let after = i < bytes.len() && is_word(bytes[i]);
    before != after
}

fn is_line_terminator(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Length of the UTF-8 sequence introduced by lead byte `b`.
fn utf8_len(b: u8) -> usize {
    match b {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        _ => 4,
    }
}

fn scan_comments(bytes: &[u8]) -> Vec<Span> {
    let mut out = Vec::new();
    let mut i = 0usize;
    while i + 1 < bytes.len() {
        if bytes[i] == b'/' && bytes[i + 1] == b'/' {
            let mut end = i + 2;
            while end < bytes.len() && !is_line_terminator(bytes[end]) {
                end += 1;
            }
            out.push(Span { start: i, end });
            i = end;
        } else {
            i += 1;
        }
    }
    out
}

fn scan_keywords(bytes: &[u8]) -> Vec<Span> {
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if !is_word(bytes[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && is_word(bytes[i]) {
            i += 1;
        }
        let word = &bytes[start..i];
        if KEYWORDS.iter().any(|k| k.as_bytes() == word) {
            out.push(Span { start, end: i });
        }
    }
    out
}

fn scan_strings(bytes: &[u8]) -> Vec<Span> {
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        let q = bytes[i];
        if q != b'\'' && q != b'"' {
            i += 1;
            continue;
        }
        match string_end(bytes, i + 1, q) {
            Some(end) => {
                out.push(Span { start: i, end });
                i = end;
            }
            None => i += 1,
        }
    }
    out
}

/// End (exclusive) of a string body starting at `j` and closed by `quote`.
///
/// Raw line breaks are allowed inside the body; a backslash escapes any character except a
/// line break.
fn string_end(bytes: &[u8], mut j: usize, quote: u8) -> Option<usize> {
    while j < bytes.len() {
        let c = bytes[j];
        if c == quote {
            return Some(j + 1);
        }
        if c == b'\\' {
            let next = *bytes.get(j + 1)?;
            if is_line_terminator(next) {
                return None;
            }
            j += 1 + utf8_len(next);
        } else {
            j += utf8_len(c);
        }
    }
    None
}

fn scan_numbers(bytes: &[u8]) -> Vec<Span> {
    let digits_end = |mut k: usize| {
        while k < bytes.len() && bytes[k].is_ascii_digit() {
            k += 1;
        }
        k
    };
    let boundary_after = |k: usize| k == bytes.len() || !is_word(bytes[k]);

    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() || (i > 0 && is_word(bytes[i - 1])) {
            i += 1;
            continue;
        }
        let int_end = digits_end(i);
        let has_fraction = int_end + 1 < bytes.len()
            && bytes[int_end] == b'.'
            && bytes[int_end + 1].is_ascii_digit();
        let frac_end = has_fraction.then(|| digits_end(int_end + 1));

        let end = match frac_end {
            Some(f) if boundary_after(f) => Some(f),
            _ if boundary_after(int_end) => Some(int_end),
            _ => None,
        };
        match end {
            Some(end) => {
                out.push(Span { start: i, end });
                i = end;
            }
            None => i += 1,
        }
    }
    out
}

fn scan_operators(bytes: &[u8]) -> Vec<Span> {
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| OPERATORS.contains(b))
        .map(|(i, _)| Span {
            start: i,
            end: i + 1,
        })
        .collect()
}

fn scan_calls(bytes: &[u8]) -> Vec<Span> {
    let ident_start = |b: u8| b.is_ascii_alphabetic() || b == b'_' || b == b'$';
    let ident_continue = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$';

    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if !ident_start(bytes[i]) || !word_boundary(bytes, i) {
            i += 1;
            continue;
        }
        let mut end = i + 1;
        while end < bytes.len() && ident_continue(bytes[end]) {
            end += 1;
        }
        if bytes.get(end) == Some(&b'(') {
            out.push(Span { start: i, end });
            i = end;
        } else {
            i += 1;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/syntax/tokenizer.rs"]
mod tests;
