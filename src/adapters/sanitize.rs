//! Log redaction for clinical values.
//!
//! The core never logs patient answers, but error messages and third-party
//! output can still carry them. Everything written by the subscriber passes
//! through [`SanitizingMakeWriter`], which masks:
//! - `name=value` / `name: value` pairs for the thirteen feature names
//! - bracketed numeric rows that look like an encoded feature vector
//! - e-mail addresses
//!
//! Input larger than `HEARTCHECK_SANITIZE_MAX_BYTES` (default 16 KiB) is
//! truncated before scanning.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::FEATURE_NAMES;

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

fn rules() -> &'static [Rule] {
    RULES.get_or_init(|| {
        let names = FEATURE_NAMES.join("|");
        let assignment = String::from(r"(?i)\b(")
            + &names
            + r#")\b(\s*[:=]\s*)(?:"[^"\n]*"|[^\s,;)}\]]+)"#;
        let patterns = [
            // Keeps the key, masks the value.
            (assignment, "${1}${2}[REDACTED]"),
            // Five or more comma-separated numbers between brackets.
            (
                r"\[\s*-?\d+(?:\.\d+)?(?:\s*,\s*-?\d+(?:\.\d+)?){4,}\s*\]".to_string(),
                "[REDACTED-VECTOR]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b"
                    .to_string(),
                "[REDACTED-EMAIL]",
            ),
        ];

        patterns
            .into_iter()
            .filter_map(|(pattern, replacement)| match Regex::new(&pattern) {
                Ok(regex) => Some(Rule { regex, replacement }),
                Err(e) => {
                    // Not routed through tracing: we are inside the writer.
                    eprintln!("heartcheck: skipping invalid redaction rule: {e}");
                    None
                }
            })
            .collect()
    })
}

fn max_sanitize_bytes() -> usize {
    std::env::var("HEARTCHECK_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Mask clinical values in a string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut out: Cow<'_, str> = Cow::Borrowed(prefix);
    for rule in rules() {
        if rule.regex.is_match(&out) {
            out = Cow::Owned(rule.regex.replace_all(&out, rule.replacement).into_owned());
        }
    }

    let mut out = out.into_owned();
    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// A `tracing_subscriber` writer factory that sanitizes each formatted line
/// before handing it to the wrapped sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    pending: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(sanitize(&text).as_bytes())
    }

    fn drain_complete_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);

        // A newline-free flood would otherwise grow without bound.
        if self.pending.len() > max_sanitize_bytes().saturating_mul(2) {
            let pending = std::mem::take(&mut self.pending);
            self.emit(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.drain_complete_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.drain_complete_lines()?;
        if !self.pending.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            self.emit(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            pending: Vec::new(),
        }
    }
}
