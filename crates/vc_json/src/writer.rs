use crate::options::{EscapePolicy, FloatPolicy, Indentation};
use crate::sink::{ByteSink, SinkStatus};
use crate::{SerializeError, SerializerOptions, SinkError};

// -----------------------------------------------------------------------------
// WriterOptions

/// The subset of [`SerializerOptions`] that affects token output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterOptions {
    pub indentation: Option<Indentation>,
    pub float_policy: FloatPolicy,
    pub escape_policy: EscapePolicy,
}

impl From<&SerializerOptions> for WriterOptions {
    #[inline]
    fn from(options: &SerializerOptions) -> Self {
        Self {
            indentation: options.indentation,
            float_policy: options.float_policy,
            escape_policy: options.escape_policy,
        }
    }
}

// -----------------------------------------------------------------------------
// TokenWriter

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    kind: ScopeKind,
    len: usize,
}

/// Low-level JSON token emitter.
///
/// Tokens accumulate in a pending buffer until [`flush`](Self::flush)
/// commits them to the sink. Commas, colons and indentation are placed
/// automatically from the open containers.
///
/// # Panics
///
/// Structural misuse is a programming error and panics: a value inside an
/// object without a preceding name, a name outside an object, an end token
/// that does not match the open container, a second root value, or a final
/// flush before the document is complete.
///
/// # Examples
///
/// ```
/// use vc_json::TokenWriter;
///
/// let mut writer = TokenWriter::new(Vec::new());
/// writer.begin_object();
/// writer.write_name("tags");
/// writer.begin_array();
/// writer.write_str("a\"b");
/// writer.write_u64(7);
/// writer.end_array();
/// writer.end_object();
/// writer.flush(true).unwrap();
///
/// assert_eq!(writer.into_sink(), br#"{"tags":["a\"b",7]}"#);
/// ```
pub struct TokenWriter<S> {
    sink: S,
    pending: Vec<u8>,
    committed: usize,
    scopes: Vec<Scope>,
    after_name: bool,
    has_root: bool,
    options: WriterOptions,
}

impl<S: ByteSink> TokenWriter<S> {
    #[inline]
    pub fn new(sink: S) -> Self {
        Self::with_options(sink, WriterOptions::default())
    }

    pub fn with_options(sink: S, options: WriterOptions) -> Self {
        Self {
            sink,
            pending: Vec::new(),
            committed: 0,
            scopes: Vec::new(),
            after_name: false,
            has_root: false,
            options,
        }
    }

    /// Number of open containers.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bytes written but not yet committed to the sink.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Bytes committed to the sink so far.
    #[inline]
    pub fn committed_len(&self) -> usize {
        self.committed
    }

    /// Returns `true` once a root value is written and every container closed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.has_root && self.scopes.is_empty()
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Returns the sink, dropping uncommitted bytes.
    #[inline]
    pub fn into_sink(self) -> S {
        self.sink
    }

    // -------------------------------------------------------------------------
    // Containers

    pub fn begin_object(&mut self) {
        self.before_value();
        self.pending.push(b'{');
        self.scopes.push(Scope {
            kind: ScopeKind::Object,
            len: 0,
        });
    }

    pub fn end_object(&mut self) {
        self.end_scope(ScopeKind::Object, b'}');
    }

    pub fn begin_array(&mut self) {
        self.before_value();
        self.pending.push(b'[');
        self.scopes.push(Scope {
            kind: ScopeKind::Array,
            len: 0,
        });
    }

    pub fn end_array(&mut self) {
        self.end_scope(ScopeKind::Array, b']');
    }

    fn end_scope(&mut self, kind: ScopeKind, byte: u8) {
        assert!(!self.after_name, "member name is missing its value");
        let scope = match self.scopes.pop() {
            Some(scope) if scope.kind == kind => scope,
            other => panic!("cannot close {kind:?}, open container is {other:?}"),
        };
        if scope.len > 0 {
            self.newline();
        }
        self.pending.push(byte);
    }

    /// Writes an object member name, the next token is its value.
    pub fn write_name(&mut self, name: &str) {
        let first = match self.scopes.last_mut() {
            Some(scope) if scope.kind == ScopeKind::Object && !self.after_name => {
                scope.len += 1;
                scope.len == 1
            }
            _ => panic!("member name `{name}` written outside an object or twice"),
        };
        if !first {
            self.pending.push(b',');
        }
        self.newline();
        self.write_quoted(name);
        self.pending.push(b':');
        if self.options.indentation.is_some() {
            self.pending.push(b' ');
        }
        self.after_name = true;
    }

    // -------------------------------------------------------------------------
    // Scalars

    pub fn write_null(&mut self) {
        self.before_value();
        self.pending.extend_from_slice(b"null");
    }

    pub fn write_bool(&mut self, value: bool) {
        self.before_value();
        let token: &[u8] = if value { b"true" } else { b"false" };
        self.pending.extend_from_slice(token);
    }

    pub fn write_str(&mut self, value: &str) {
        self.before_value();
        self.write_quoted(value);
    }

    pub fn write_char(&mut self, value: char) {
        let mut buf = [0_u8; 4];
        self.write_str(value.encode_utf8(&mut buf));
    }

    pub fn write_i64(&mut self, value: i64) {
        self.before_value();
        let mut buf = itoa::Buffer::new();
        self.pending.extend_from_slice(buf.format(value).as_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.before_value();
        let mut buf = itoa::Buffer::new();
        self.pending.extend_from_slice(buf.format(value).as_bytes());
    }

    pub fn write_i128(&mut self, value: i128) {
        self.before_value();
        let mut buf = itoa::Buffer::new();
        self.pending.extend_from_slice(buf.format(value).as_bytes());
    }

    pub fn write_u128(&mut self, value: u128) {
        self.before_value();
        let mut buf = itoa::Buffer::new();
        self.pending.extend_from_slice(buf.format(value).as_bytes());
    }

    /// Writes the shortest representation that reads back as `value`.
    ///
    /// Non-finite values follow [`FloatPolicy`]; on error nothing is written.
    pub fn write_f64(&mut self, value: f64) -> Result<(), SerializeError> {
        if !value.is_finite() {
            return self.write_non_finite(value);
        }
        self.before_value();
        let mut buf = ryu::Buffer::new();
        self.pending
            .extend_from_slice(buf.format_finite(value).as_bytes());
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), SerializeError> {
        if !value.is_finite() {
            return self.write_non_finite(f64::from(value));
        }
        self.before_value();
        let mut buf = ryu::Buffer::new();
        self.pending
            .extend_from_slice(buf.format_finite(value).as_bytes());
        Ok(())
    }

    #[cold]
    fn write_non_finite(&mut self, value: f64) -> Result<(), SerializeError> {
        match self.options.float_policy {
            FloatPolicy::Error => return Err(SerializeError::NonFiniteNumber { value }),
            FloatPolicy::Null => self.write_null(),
            FloatPolicy::Quoted => self.write_str(if value.is_nan() {
                "NaN"
            } else if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            }),
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Output

    /// Commits pending bytes to the sink.
    ///
    /// The sink itself is flushed when it asks for it, and always on the
    /// final flush.
    ///
    /// # Panics
    ///
    /// A final flush panics if the document is not complete.
    pub fn flush(&mut self, is_final: bool) -> Result<(), SinkError> {
        if is_final {
            assert!(self.is_complete(), "final flush of an incomplete document");
        }
        let mut flush_sink = is_final;
        if !self.pending.is_empty() {
            let status = self.sink.commit(&self.pending)?;
            self.committed += self.pending.len();
            self.pending.clear();
            flush_sink |= status == SinkStatus::NeedsFlush;
        }
        if flush_sink {
            self.sink.flush()?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Helpers

    fn before_value(&mut self) {
        let Some(scope) = self.scopes.last_mut() else {
            assert!(!self.has_root, "a JSON document holds a single root value");
            self.has_root = true;
            return;
        };
        match scope.kind {
            ScopeKind::Object => {
                assert!(self.after_name, "object value written without a member name");
                self.after_name = false;
            }
            ScopeKind::Array => {
                scope.len += 1;
                if scope.len > 1 {
                    self.pending.push(b',');
                }
                self.newline();
            }
        }
    }

    fn newline(&mut self) {
        if let Some(indentation) = self.options.indentation {
            self.pending.push(b'\n');
            indentation.write_level(&mut self.pending, self.scopes.len());
        }
    }

    fn write_quoted(&mut self, value: &str) {
        let policy = self.options.escape_policy;
        let bytes = value.as_bytes();
        let out = &mut self.pending;

        out.push(b'"');
        let mut start = 0;
        for (index, c) in value.char_indices() {
            if !needs_escape(c, policy) {
                continue;
            }
            out.extend_from_slice(&bytes[start..index]);
            write_escape(out, c);
            start = index + c.len_utf8();
        }
        out.extend_from_slice(&bytes[start..]);
        out.push(b'"');
    }
}

// -----------------------------------------------------------------------------
// Escaping

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

#[inline]
fn needs_escape(c: char, policy: EscapePolicy) -> bool {
    match c {
        '"' | '\\' | '\0'..='\u{1F}' => true,
        _ => match policy {
            EscapePolicy::Minimal => false,
            EscapePolicy::Ascii => !c.is_ascii(),
            EscapePolicy::HtmlSafe => matches!(c, '<' | '>' | '&' | '\''),
        },
    }
}

fn write_escape(out: &mut Vec<u8>, c: char) {
    let short: &[u8] = match c {
        '"' => b"\\\"",
        '\\' => b"\\\\",
        '\u{08}' => b"\\b",
        '\u{0C}' => b"\\f",
        '\n' => b"\\n",
        '\r' => b"\\r",
        '\t' => b"\\t",
        _ => {
            let mut units = [0_u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.extend_from_slice(b"\\u");
                for shift in [12, 8, 4, 0] {
                    out.push(HEX_DIGITS[usize::from((*unit >> shift) & 0xF)]);
                }
            }
            return;
        }
    };
    out.extend_from_slice(short);
}
