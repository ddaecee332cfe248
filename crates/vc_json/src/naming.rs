//! Member-name conversion.

use core::fmt;

// -----------------------------------------------------------------------------
// NamingPolicy

/// How member names (or dictionary keys) are converted before writing.
///
/// Names are split into words at `_`, `-`, whitespace and case changes,
/// so `userName`, `user_name` and `UserName` convert alike.
///
/// # Examples
///
/// ```
/// use vc_json::NamingPolicy;
///
/// let mut buf = String::new();
/// assert_eq!(NamingPolicy::CamelCase.apply("user_name", &mut buf), "userName");
/// assert_eq!(NamingPolicy::SnakeCase.apply("HTTPServer", &mut buf), "http_server");
/// assert_eq!(NamingPolicy::Identity.apply("keep_me", &mut buf), "keep_me");
/// ```
#[derive(Clone, Copy, Default)]
pub enum NamingPolicy {
    #[default]
    Identity,
    CamelCase,
    PascalCase,
    SnakeCase,
    KebabCase,
    ScreamingSnakeCase,
    /// Writes the converted form of the first argument into the buffer.
    Custom(fn(&str, &mut String)),
}

impl NamingPolicy {
    /// Converts `name`, using `buf` as storage when the result differs.
    pub fn apply<'a>(&self, name: &'a str, buf: &'a mut String) -> &'a str {
        buf.clear();
        match self {
            Self::Identity => return name,
            Self::CamelCase => for_each_word(name, |index, word| {
                if index == 0 {
                    push_lower(buf, word);
                } else {
                    push_capitalized(buf, word);
                }
            }),
            Self::PascalCase => for_each_word(name, |_, word| push_capitalized(buf, word)),
            Self::SnakeCase => join_words(name, buf, '_', push_lower),
            Self::KebabCase => join_words(name, buf, '-', push_lower),
            Self::ScreamingSnakeCase => join_words(name, buf, '_', push_upper),
            Self::Custom(convert) => convert(name, buf),
        }
        buf.as_str()
    }

    #[inline]
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

impl fmt::Debug for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::CamelCase => f.write_str("CamelCase"),
            Self::PascalCase => f.write_str("PascalCase"),
            Self::SnakeCase => f.write_str("SnakeCase"),
            Self::KebabCase => f.write_str("KebabCase"),
            Self::ScreamingSnakeCase => f.write_str("ScreamingSnakeCase"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Word splitting

fn is_separator(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// Calls `f(index, word)` for each word of `name`.
///
/// A word ends before an uppercase letter that follows a lowercase letter
/// or digit, and before the last capital of an acronym followed by
/// lowercase (`HTTPServer` -> `HTTP`, `Server`).
fn for_each_word(name: &str, mut f: impl FnMut(usize, &str)) {
    let mut index = 0;
    let mut start: Option<usize> = None;
    let mut prev: Option<char> = None;
    let mut chars = name.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if is_separator(c) {
            if let Some(s) = start.take() {
                f(index, &name[s..i]);
                index += 1;
            }
            prev = None;
            continue;
        }

        match (start, prev) {
            (Some(s), Some(p)) => {
                let next_is_lower = chars.peek().is_some_and(|&(_, n)| n.is_lowercase());
                let boundary = ((p.is_lowercase() || p.is_ascii_digit()) && c.is_uppercase())
                    || (p.is_uppercase() && c.is_uppercase() && next_is_lower);
                if boundary {
                    f(index, &name[s..i]);
                    index += 1;
                    start = Some(i);
                }
            }
            _ => start = Some(i),
        }
        prev = Some(c);
    }

    if let Some(s) = start {
        f(index, &name[s..]);
    }
}

fn join_words(name: &str, buf: &mut String, sep: char, push: fn(&mut String, &str)) {
    for_each_word(name, |index, word| {
        if index > 0 {
            buf.push(sep);
        }
        push(buf, word);
    });
}

fn push_lower(buf: &mut String, word: &str) {
    buf.extend(word.chars().flat_map(char::to_lowercase));
}

fn push_upper(buf: &mut String, word: &str) {
    buf.extend(word.chars().flat_map(char::to_uppercase));
}

fn push_capitalized(buf: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.extend(chars.flat_map(char::to_lowercase));
    }
}

#[cfg(test)]
mod tests {
    use super::NamingPolicy;

    fn convert(policy: NamingPolicy, name: &str) -> String {
        let mut buf = String::new();
        policy.apply(name, &mut buf).to_owned()
    }

    #[test]
    fn camel_and_pascal() {
        assert_eq!(convert(NamingPolicy::CamelCase, "first_name"), "firstName");
        assert_eq!(convert(NamingPolicy::CamelCase, "FirstName"), "firstName");
        assert_eq!(convert(NamingPolicy::CamelCase, "id"), "id");
        assert_eq!(convert(NamingPolicy::PascalCase, "user_id"), "UserId");
        assert_eq!(convert(NamingPolicy::PascalCase, "parseURL"), "ParseUrl");
    }

    #[test]
    fn separated_forms() {
        assert_eq!(convert(NamingPolicy::SnakeCase, "userName"), "user_name");
        assert_eq!(convert(NamingPolicy::SnakeCase, "version2Name"), "version2_name");
        assert_eq!(convert(NamingPolicy::KebabCase, "max_retry_count"), "max-retry-count");
        assert_eq!(convert(NamingPolicy::ScreamingSnakeCase, "maxDepth"), "MAX_DEPTH");
        assert_eq!(convert(NamingPolicy::SnakeCase, "__private"), "private");
    }

    #[test]
    fn custom_policy() {
        fn shout(name: &str, buf: &mut String) {
            buf.push_str(name);
            buf.push('!');
        }
        assert_eq!(convert(NamingPolicy::Custom(shout), "hey"), "hey!");
    }
}
