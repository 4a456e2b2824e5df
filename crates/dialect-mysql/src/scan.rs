//! Quote- and parenthesis-aware scanning over MySQL DDL fragments.
//!
//! Quoted runs (`'…'`, `"…"`, `` `…` ``) are opaque: delimiters inside them
//! never split. Backslash escapes apply inside string literals, and doubled
//! quote characters stay inside the literal.

#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanned {
    pub(crate) index: usize,
    pub(crate) byte: u8,
    /// Nesting level of the byte; a parenthesis reports the level it opens or closes.
    pub(crate) depth: usize,
    pub(crate) quoted: bool,
}

impl Scanned {
    fn is_top_level(self) -> bool {
        self.depth == 0 && !self.quoted
    }
}

pub(crate) struct Scanner<'a> {
    bytes: &'a [u8],
    index: usize,
    quote: Option<u8>,
    depth: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            index: 0,
            quote: None,
            depth: 0,
        }
    }

    fn quoted(&self, index: usize, byte: u8) -> Scanned {
        Scanned {
            index,
            byte,
            depth: self.depth,
            quoted: true,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        let index = self.index;
        let byte = *self.bytes.get(index)?;
        self.index += 1;

        if let Some(quote) = self.quote {
            if byte == b'\\' && quote != b'`' {
                self.index = (self.index + 1).min(self.bytes.len());
            } else if byte == quote {
                if self.bytes.get(self.index) == Some(&quote) {
                    self.index += 1;
                } else {
                    self.quote = None;
                }
            }
            return Some(self.quoted(index, byte));
        }

        let scanned = match byte {
            b'\'' | b'"' | b'`' => {
                self.quote = Some(byte);
                self.quoted(index, byte)
            }
            b'(' => {
                let scanned = Scanned {
                    index,
                    byte,
                    depth: self.depth,
                    quoted: false,
                };
                self.depth += 1;
                scanned
            }
            b')' => {
                self.depth = self.depth.saturating_sub(1);
                Scanned {
                    index,
                    byte,
                    depth: self.depth,
                    quoted: false,
                }
            }
            _ => Scanned {
                index,
                byte,
                depth: self.depth,
                quoted: false,
            },
        };
        Some(scanned)
    }
}

/// Splits on `delimiter` only where it sits outside quotes and parentheses.
pub(crate) fn split_top_level(text: &str, delimiter: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for scanned in Scanner::new(text) {
        if scanned.byte == delimiter && scanned.is_top_level() {
            parts.push(&text[start..scanned.index]);
            start = scanned.index + 1;
        }
    }
    parts.push(&text[start..]);

    parts
}

/// Splits on runs of whitespace outside quotes and parentheses, so a quoted
/// literal or a parenthesised argument list stays one word.
pub(crate) fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = None;

    for scanned in Scanner::new(text) {
        let boundary = scanned.byte.is_ascii_whitespace() && scanned.is_top_level();
        match (boundary, start) {
            (true, Some(word_start)) => {
                words.push(&text[word_start..scanned.index]);
                start = None;
            }
            (false, None) => start = Some(scanned.index),
            _ => {}
        }
    }
    if let Some(word_start) = start {
        words.push(&text[word_start..]);
    }

    words
}

/// Index of the `)` closing the `(` at `open`, if the text is balanced.
pub(crate) fn matching_close(text: &str, open: usize) -> Option<usize> {
    let tail = text.get(open..)?;
    if !tail.starts_with('(') {
        return None;
    }

    Scanner::new(tail)
        .skip(1)
        .find(|scanned| scanned.byte == b')' && scanned.is_top_level())
        .map(|scanned| open + scanned.index)
}

/// Whether `keyword` occurs as a whole word outside quoted text.
pub(crate) fn contains_unquoted_keyword(text: &str, keyword: &str) -> bool {
    let mut masked = Vec::with_capacity(text.len());
    for scanned in Scanner::new(text) {
        masked.push(if scanned.quoted { b' ' } else { scanned.byte });
    }
    let masked = String::from_utf8_lossy(&masked).to_ascii_uppercase();
    let keyword = keyword.to_ascii_uppercase();

    masked.match_indices(keyword.as_str()).any(|(index, _)| {
        let before = masked[..index].bytes().next_back();
        let after = masked[index + keyword.len()..].bytes().next();
        !before.is_some_and(is_identifier_byte) && !after.is_some_and(is_identifier_byte)
    })
}

/// The leading run of identifier characters of `word`, upper-cased.
pub(crate) fn leading_keyword(word: &str) -> String {
    word.bytes()
        .take_while(|byte| is_identifier_byte(*byte))
        .map(|byte| byte.to_ascii_uppercase() as char)
        .collect()
}

pub(crate) fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}
