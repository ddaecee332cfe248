use crate::NamingPolicy;

// -----------------------------------------------------------------------------
// Indentation

/// One level of pretty-printing indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indentation {
    Spaces(u8),
    Tabs,
}

impl Indentation {
    #[inline]
    pub const fn spaces(count: u8) -> Self {
        Self::Spaces(count)
    }

    #[inline]
    pub const fn tabs() -> Self {
        Self::Tabs
    }

    pub(crate) fn write_level(self, out: &mut Vec<u8>, depth: usize) {
        match self {
            Self::Spaces(count) => {
                out.resize(out.len() + depth * count as usize, b' ');
            }
            Self::Tabs => {
                out.resize(out.len() + depth, b'\t');
            }
        }
    }
}

impl Default for Indentation {
    #[inline]
    fn default() -> Self {
        Self::Spaces(2)
    }
}

// -----------------------------------------------------------------------------
// Policies

/// What to do with `NaN` and infinities, which JSON cannot express.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FloatPolicy {
    /// Fail with [`SerializeError::NonFiniteNumber`](crate::SerializeError::NonFiniteNumber).
    #[default]
    Error,
    /// Write `null`.
    Null,
    /// Write `"NaN"`, `"Infinity"` or `"-Infinity"`.
    Quoted,
}

/// Which characters of a string are escaped.
///
/// `"`, `\` and control characters are always escaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapePolicy {
    #[default]
    Minimal,
    /// Escapes every non-ASCII character as `\uXXXX`.
    Ascii,
    /// Escapes `<`, `>`, `&` and `'` for embedding in HTML.
    HtmlSafe,
}

// -----------------------------------------------------------------------------
// SerializerOptions

/// Options of one serializer, read-only while a value is written.
///
/// # Examples
///
/// ```
/// use vc_json::{Indentation, NamingPolicy, SerializerOptions};
///
/// let options = SerializerOptions::default()
///     .with_naming_policy(NamingPolicy::CamelCase)
///     .with_omit_null_members(true)
///     .with_indentation(Indentation::spaces(4));
///
/// assert_eq!(options.max_depth(), 64);
/// assert!(options.omit_null_members);
/// ```
#[derive(Debug, Clone)]
pub struct SerializerOptions {
    pub naming_policy: NamingPolicy,
    pub dictionary_key_policy: NamingPolicy,
    pub omit_null_members: bool,
    /// `None` writes compact output.
    pub indentation: Option<Indentation>,
    /// Maximum container nesting, `0` selects [`Self::DEFAULT_MAX_DEPTH`].
    pub max_depth: usize,
    /// Pending byte count after which the output is flushed.
    pub flush_threshold: usize,
    pub float_policy: FloatPolicy,
    pub escape_policy: EscapePolicy,
}

impl SerializerOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    pub const DEFAULT_FLUSH_THRESHOLD: usize = 16 * 1024;

    pub const fn new() -> Self {
        Self {
            naming_policy: NamingPolicy::Identity,
            dictionary_key_policy: NamingPolicy::Identity,
            omit_null_members: false,
            indentation: None,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            flush_threshold: Self::DEFAULT_FLUSH_THRESHOLD,
            float_policy: FloatPolicy::Error,
            escape_policy: EscapePolicy::Minimal,
        }
    }

    /// Default options with two-space indentation.
    pub const fn pretty() -> Self {
        let mut options = Self::new();
        options.indentation = Some(Indentation::Spaces(2));
        options
    }

    /// Returns the effective depth ceiling.
    #[inline]
    pub const fn max_depth(&self) -> usize {
        if self.max_depth == 0 {
            Self::DEFAULT_MAX_DEPTH
        } else {
            self.max_depth
        }
    }

    pub const fn with_naming_policy(mut self, policy: NamingPolicy) -> Self {
        self.naming_policy = policy;
        self
    }

    pub const fn with_dictionary_key_policy(mut self, policy: NamingPolicy) -> Self {
        self.dictionary_key_policy = policy;
        self
    }

    pub const fn with_omit_null_members(mut self, omit: bool) -> Self {
        self.omit_null_members = omit;
        self
    }

    pub const fn with_indentation(mut self, indentation: Indentation) -> Self {
        self.indentation = Some(indentation);
        self
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// A threshold of `0` flushes after every step.
    pub const fn with_flush_threshold(mut self, bytes: usize) -> Self {
        self.flush_threshold = bytes;
        self
    }

    pub const fn with_float_policy(mut self, policy: FloatPolicy) -> Self {
        self.float_policy = policy;
        self
    }

    pub const fn with_escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.escape_policy = policy;
        self
    }
}

impl Default for SerializerOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
