//! Built-in block re-indenter for Ruby-like source
//!
//! Not a Ruby parser. It tracks block depth from keywords at the start of a
//! line or on the right of an assignment, trailing `do` / `{`, and closing
//! `end` / `}`, then re-emits every line at two spaces per level. Comments are
//! ignored when classifying a line. Unbalanced blocks are reported as errors so the
//! playground has a meaningful failure path without an external engine.
//!
//! The engine is exposed through the same C calling convention as external
//! engines ([`format`] / [`free_string`] / [`last_error`]) and reached via
//! [`ABI`].

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use super::EngineAbi;

const INDENT: &str = "  ";

/// Keywords that open a block when they start a line
const OPENERS: &[&str] = &[
    "class", "module", "def", "if", "unless", "while", "until", "case", "begin", "for",
];

/// Keywords that open a block when they are the value of an assignment
const VALUE_OPENERS: &[&str] = &["if", "unless", "case", "begin", "while", "until"];

/// Method-definition prefixes (`private def x`)
const DEF_MODIFIERS: &[&str] = &[
    "private",
    "protected",
    "public",
    "module_function",
    "private_class_method",
    "public_class_method",
];

/// Keywords that sit one level out inside an open block
const MIDDLES: &[&str] = &["else", "elsif", "when", "in", "rescue", "ensure"];

/// The built-in engine's entry points
pub const ABI: EngineAbi = EngineAbi {
    format,
    free_string,
    last_error: Some(last_error),
};

thread_local! {
    /// Reason for the last NULL returned by [`format`] on this thread
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Re-indent `source`, or explain why its block structure is unbalanced
pub fn reindent(source: &str) -> Result<String, String> {
    let mut output = String::with_capacity(source.len());
    // Line numbers (1-based) and keywords of the currently open blocks
    let mut open: Vec<(usize, String)> = Vec::new();
    let mut pending_blank = false;

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            pending_blank = !output.is_empty();
            continue;
        }

        let shape = LineShape::of(line);

        if shape.closes && open.pop().is_none() {
            return Err(format!(
                "Unexpected `{}` on line {}",
                shape.first_token, line_no
            ));
        }

        let depth = if shape.middle {
            open.len().saturating_sub(1)
        } else {
            open.len()
        };

        if pending_blank {
            output.push('\n');
            pending_blank = false;
        }
        for _ in 0..depth {
            output.push_str(INDENT);
        }
        output.push_str(line);
        output.push('\n');

        if let Some(keyword) = shape.opens {
            open.push((line_no, keyword.to_string()));
        }
    }

    if let Some((line_no, keyword)) = open.last() {
        return Err(format!(
            "Unterminated `{}` block opened on line {}",
            keyword, line_no
        ));
    }

    Ok(output)
}

/// Block effect of a single trimmed, non-empty line
#[derive(Debug, Default, PartialEq, Eq)]
struct LineShape<'a> {
    first_token: &'a str,
    /// Keyword (or `do` / `{`) of the block this line opens
    opens: Option<&'a str>,
    closes: bool,
    middle: bool,
}

impl<'a> LineShape<'a> {
    fn of(line: &'a str) -> Self {
        let code = strip_comment(line).trim_end();
        if code.is_empty() {
            return Self {
                first_token: "#",
                ..Self::default()
            };
        }

        let word = leading_word(code);
        let first_token = if word.is_empty() {
            &code[..code.chars().next().map_or(0, char::len_utf8)]
        } else {
            word
        };

        let closes = word == "end" || code.starts_with('}');
        let middle = MIDDLES.contains(&word);

        let opens = keyword_opener(code, word)
            .or_else(|| trailing_opener(code))
            .filter(|_| !closes_itself(code));

        Self {
            first_token,
            opens,
            closes,
            middle,
        }
    }
}

/// Opener keyword at the start of the line, after a `def` modifier, or as
/// the value of an assignment (`x = if cond`)
fn keyword_opener<'a>(code: &'a str, word: &'a str) -> Option<&'a str> {
    if OPENERS.contains(&word) {
        return (!is_endless_def(word, code)).then_some(word);
    }
    if DEF_MODIFIERS.contains(&word) {
        let rest = code[word.len()..].trim_start();
        let inner = leading_word(rest);
        return (inner == "def" && !is_endless_def(inner, rest)).then_some(inner);
    }
    let value = assigned_value(code)?;
    let inner = leading_word(value);
    VALUE_OPENERS.contains(&inner).then_some(inner)
}

/// Right-hand side of the first assignment outside string literals
fn assigned_value(code: &str) -> Option<&str> {
    let bytes = code.as_bytes();
    unquoted(code)
        .filter(|&(_, b)| b == b'=')
        .find(|&(i, _)| {
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            !matches!(before, Some(b'=') | Some(b'!') | Some(b'<') | Some(b'>'))
                && !matches!(after, Some(b'=') | Some(b'~') | Some(b'>'))
        })
        .map(|(i, _)| code[i + 1..].trim_start())
}

/// Byte offsets and bytes of `line` that sit outside string literals
fn unquoted(line: &str) -> impl Iterator<Item = (usize, u8)> + '_ {
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    line.bytes().enumerate().filter(move |&(_, b)| {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            return false;
        }
        if b == b'"' || b == b'\'' {
            quote = Some(b);
            return false;
        }
        true
    })
}

/// The line without a trailing `# comment`
fn strip_comment(line: &str) -> &str {
    match unquoted(line).find(|&(_, b)| b == b'#') {
        Some((i, _)) => &line[..i],
        None => line,
    }
}

/// The identifier at the start of the line, if any
fn leading_word(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(line.len(), |(i, _)| i);
    let word = &line[..end];
    // `if?`, `end!` and `end:` are method names or symbols, not keywords
    match line[end..].chars().next() {
        Some('?') | Some('!') | Some(':') if !line[end..].starts_with("::") => "",
        _ => word,
    }
}

/// `def name = expr` and `def name(args) = expr` have no `end`
fn is_endless_def(word: &str, line: &str) -> bool {
    if word != "def" {
        return false;
    }
    let chars: Vec<char> = line.chars().collect();
    let mut parens = 0usize;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            '#' if parens == 0 => return false,
            '=' if parens == 0 => {
                let before = i.checked_sub(1).map(|j| chars[j]);
                let after = chars.get(i + 1).copied();
                if matches!(before, Some(' ') | Some(')'))
                    && !matches!(after, Some('=') | Some('~') | Some('>'))
                {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Trailing `do`, `do |args|`, `{` or `{ |args|`
fn trailing_opener(code: &str) -> Option<&'static str> {
    let trimmed = strip_block_params(code);
    if trimmed == "do" || trimmed.ends_with(" do") {
        Some("do")
    } else if trimmed.ends_with('{') {
        Some("{")
    } else {
        None
    }
}

/// Remove a trailing `|args|` so the opener before it is visible
fn strip_block_params(line: &str) -> &str {
    if !line.ends_with('|') {
        return line;
    }
    let body = &line[..line.len() - 1];
    match body.rfind('|') {
        Some(start) => line[..start].trim_end(),
        None => line,
    }
}

/// A block that opens and closes on the same line (`def x; end`, `{ |a| a }`)
fn closes_itself(line: &str) -> bool {
    let code = line.trim_end();
    if code.ends_with("; end") || code.ends_with(";end") || code.ends_with(" end") {
        return leading_word(code) != "end";
    }
    false
}

/// Format a NUL-terminated source string.
///
/// Returns a newly allocated string, or NULL when the source is not valid
/// UTF-8 or its blocks are unbalanced; [`last_error`] then says why. Non-NULL
/// results must be released with [`free_string`].
///
/// # Safety
/// `source` must be NULL or a valid pointer to a NUL-terminated string.
pub unsafe extern "C" fn format(source: *const c_char) -> *mut c_char {
    set_last_error(None);
    if source.is_null() {
        return fail("No source given".to_string());
    }

    let text = match CStr::from_ptr(source).to_str() {
        Ok(text) => text,
        Err(e) => return fail(format!("Source is not UTF-8: {}", e)),
    };

    match reindent(text) {
        Ok(formatted) => match CString::new(formatted) {
            Ok(c_str) => c_str.into_raw(),
            Err(e) => fail(format!("Output contains a NUL byte at offset {}", e.nul_position())),
        },
        Err(reason) => fail(reason),
    }
}

/// Reason for the last NULL returned by [`format`] on the calling thread.
///
/// The string stays valid until the next call to [`format`] on that thread
/// and must not be freed. Returns NULL after a successful call.
///
/// # Safety
/// The returned pointer must not be used after the next call to [`format`].
pub unsafe extern "C" fn last_error() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |reason| reason.as_ptr())
    })
}

fn fail(reason: String) -> *mut c_char {
    tracing::debug!("reindent failed: {}", reason);
    set_last_error(CString::new(reason).ok());
    std::ptr::null_mut()
}

fn set_last_error(reason: Option<CString>) {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = reason);
}

/// Release a string returned by [`format`].
///
/// # Safety
/// `s` must be NULL or a pointer returned by [`format`] that was not freed yet.
pub unsafe extern "C" fn free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
