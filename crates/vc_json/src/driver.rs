use alloc::sync::Arc;
use std::io;

use vc_shape::info::ShapeInfo;
use vc_shape::{ScalarRef, Shape, ShapeRef};

use crate::resolver::{self, Resolved};
use crate::stack::{Cursor, Frame, FrameState, Segment, WriteStack};
use crate::writer::{TokenWriter, WriterOptions};
use crate::{ByteSink, IoSink, PlanCache, PlanKind, SerializeError, SerializerOptions};

// -----------------------------------------------------------------------------
// JsonSerializer

/// Entry point for writing values as JSON.
///
/// Holds the options and the plan cache. By default the process-wide
/// cache is shared; [`with_cache`](Self::with_cache) scopes plans to a
/// cache of your own.
///
/// # Examples
///
/// ```
/// use vc_json::{JsonSerializer, NamingPolicy, SerializerOptions};
/// use vc_shape::impl_shape_struct;
///
/// struct Profile {
///     user_name: String,
///     age: Option<u8>,
/// }
///
/// impl_shape_struct!(Profile { user_name: String, age: Option<u8> });
///
/// let serializer = JsonSerializer::new(
///     SerializerOptions::default()
///         .with_naming_policy(NamingPolicy::CamelCase)
///         .with_omit_null_members(true),
/// );
///
/// let profile = Profile { user_name: "ada".into(), age: None };
/// assert_eq!(serializer.to_string(&profile).unwrap(), r#"{"userName":"ada"}"#);
/// ```
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    options: SerializerOptions,
    cache: Arc<PlanCache>,
}

impl JsonSerializer {
    /// Creates a serializer using the global plan cache.
    pub fn new(options: SerializerOptions) -> Self {
        Self::with_cache(options, Arc::clone(PlanCache::global()))
    }

    pub fn with_cache(options: SerializerOptions, cache: Arc<PlanCache>) -> Self {
        Self { options, cache }
    }

    #[inline]
    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    #[inline]
    pub fn cache(&self) -> &Arc<PlanCache> {
        &self.cache
    }

    /// Starts a resumable write of `value` into `sink`.
    pub fn session<'a, S: ByteSink>(&'a self, value: &'a dyn Shape, sink: S) -> WriteSession<'a, S> {
        WriteSession::new(self, value, value.runtime_shape(), sink)
    }

    /// Starts a resumable write of `value` declared as `expected`.
    ///
    /// Fails with [`SerializeError::TypeMismatch`] before anything is
    /// written if `value` cannot stand for `expected`.
    pub fn session_as<'a, S: ByteSink>(
        &'a self,
        value: &'a dyn Shape,
        expected: &'static ShapeInfo,
        sink: S,
    ) -> Result<WriteSession<'a, S>, SerializeError> {
        resolver::verify_assignable(expected, value)?;
        Ok(WriteSession::new(self, value, expected, sink))
    }

    /// Writes `value` into `sink` and returns the sink.
    pub fn to_sink<S: ByteSink>(&self, value: &dyn Shape, sink: S) -> Result<S, SerializeError> {
        let mut session = self.session(value, sink);
        session.run()?;
        Ok(session.into_sink())
    }

    pub fn to_vec(&self, value: &dyn Shape) -> Result<Vec<u8>, SerializeError> {
        self.to_sink(value, Vec::with_capacity(128))
    }

    /// Same output as [`to_vec`](Self::to_vec), as text.
    pub fn to_string(&self, value: &dyn Shape) -> Result<String, SerializeError> {
        let bytes = self.to_vec(value)?;
        String::from_utf8(bytes).map_err(|_| SerializeError::Invariant("output is not UTF-8"))
    }

    /// Writes `value` into an [`io::Write`], flushing it at the end.
    pub fn to_writer<W: io::Write>(&self, writer: W, value: &dyn Shape) -> Result<W, SerializeError> {
        Ok(self.to_sink(value, IoSink::new(writer))?.into_inner())
    }

    /// Writes `value` declared as `expected`, see [`session_as`](Self::session_as).
    pub fn serialize_as(
        &self,
        value: &dyn Shape,
        expected: &'static ShapeInfo,
    ) -> Result<Vec<u8>, SerializeError> {
        let mut session = self.session_as(value, expected, Vec::with_capacity(128))?;
        session.run()?;
        Ok(session.into_sink())
    }
}

impl Default for JsonSerializer {
    #[inline]
    fn default() -> Self {
        Self::new(SerializerOptions::default())
    }
}

// -----------------------------------------------------------------------------
// WriteSession

/// Outcome of [`WriteSession::resume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Pending output reached the flush threshold and was committed.
    /// Call `resume` again to continue.
    Paused { committed: usize },
    /// The document is complete and flushed.
    Complete { committed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Running,
    Complete,
    Failed,
}

/// An in-progress write that can pause at flush boundaries.
///
/// Each [`resume`](Self::resume) runs the write loop until the pending
/// output reaches the flush threshold or the document is done. Between
/// calls the [`WriteStack`] holds the exact position, so the concatenated
/// output equals a single uninterrupted write.
///
/// On error the pending bytes are dropped; bytes already committed to the
/// sink stay there.
///
/// # Examples
///
/// ```
/// use vc_json::{JsonSerializer, Progress, SerializerOptions};
///
/// let serializer = JsonSerializer::new(SerializerOptions::default().with_flush_threshold(4));
/// let value = vec![100_u32, 200, 300];
/// let mut session = serializer.session(&value, Vec::new());
///
/// let mut pauses = 0;
/// while let Progress::Paused { .. } = session.resume().unwrap() {
///     pauses += 1;
/// }
///
/// assert!(pauses > 0);
/// assert_eq!(session.into_sink(), b"[100,200,300]");
/// ```
pub struct WriteSession<'a, S: ByteSink> {
    writer: TokenWriter<S>,
    stack: WriteStack<'a>,
    cache: &'a PlanCache,
    options: &'a SerializerOptions,
    root: Option<(&'a dyn Shape, &'static ShapeInfo)>,
    name_buf: String,
    key_buf: String,
    status: Status,
}

impl<'a, S: ByteSink> WriteSession<'a, S> {
    fn new(
        serializer: &'a JsonSerializer,
        value: &'a dyn Shape,
        expected: &'static ShapeInfo,
        sink: S,
    ) -> Self {
        let options = &serializer.options;
        Self {
            writer: TokenWriter::with_options(sink, WriterOptions::from(options)),
            stack: WriteStack::new(options.max_depth()),
            cache: &serializer.cache,
            options,
            root: Some((value, expected)),
            name_buf: String::new(),
            key_buf: String::new(),
            status: Status::Running,
        }
    }

    /// Continues writing until the next pause or the end of the document.
    ///
    /// Resuming a complete session returns `Complete` again; resuming after
    /// an error fails with [`SerializeError::Invariant`].
    pub fn resume(&mut self) -> Result<Progress, SerializeError> {
        match self.status {
            Status::Running => {}
            Status::Complete => {
                return Ok(Progress::Complete {
                    committed: self.writer.committed_len(),
                });
            }
            Status::Failed => return Err(SerializeError::Invariant("session resumed after failure")),
        }

        let result = self.advance();
        if result.is_err() {
            self.status = Status::Failed;
        }
        result
    }

    /// Resumes until the document is complete.
    pub fn run(&mut self) -> Result<usize, SerializeError> {
        loop {
            if let Progress::Complete { committed } = self.resume()? {
                return Ok(committed);
            }
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }

    /// The open containers, root first.
    #[inline]
    pub fn stack(&self) -> &WriteStack<'a> {
        &self.stack
    }

    /// Bytes committed to the sink so far.
    #[inline]
    pub fn committed_len(&self) -> usize {
        self.writer.committed_len()
    }

    #[inline]
    pub fn sink(&self) -> &S {
        self.writer.get_ref()
    }

    /// Returns the sink, dropping anything not yet committed.
    #[inline]
    pub fn into_sink(self) -> S {
        self.writer.into_sink()
    }

    // -------------------------------------------------------------------------
    // Write loop

    fn advance(&mut self) -> Result<Progress, SerializeError> {
        if let Some((value, expected)) = self.root.take() {
            self.write_value(Segment::Root, value, expected)?;
        }

        while !self.stack.is_empty() {
            self.step()?;
            let pending = self.writer.pending_len();
            if pending > 0 && pending >= self.options.flush_threshold && !self.stack.is_empty() {
                self.writer.flush(false)?;
                return Ok(Progress::Paused {
                    committed: self.writer.committed_len(),
                });
            }
        }

        self.writer.flush(true)?;
        self.status = Status::Complete;
        Ok(Progress::Complete {
            committed: self.writer.committed_len(),
        })
    }

    fn step(&mut self) -> Result<(), SerializeError> {
        let Some(frame) = self.stack.top_mut() else {
            return Err(SerializeError::Invariant("step on an empty write stack"));
        };

        match frame.state {
            FrameState::StartContainer => {
                match frame.plan.kind() {
                    PlanKind::Sequence { .. } => self.writer.begin_array(),
                    _ => self.writer.begin_object(),
                }
                frame.state = FrameState::WritingMembers;
            }
            FrameState::WritingMembers => return self.write_next(),
            FrameState::EndContainer => {
                match frame.plan.kind() {
                    PlanKind::Sequence { .. } => self.writer.end_array(),
                    _ => self.writer.end_object(),
                }
                frame.state = FrameState::Done;
            }
            FrameState::Done => {
                self.stack.pop();
            }
        }
        Ok(())
    }

    /// Writes the name of the next child of the top frame, then the child
    /// itself (or pushes it). Marks the frame as ended when nothing is left.
    fn write_next(&mut self) -> Result<(), SerializeError> {
        let Self {
            writer,
            stack,
            options,
            name_buf,
            key_buf,
            ..
        } = self;
        let Some(frame) = stack.top_mut() else {
            return Err(SerializeError::Invariant("step on an empty write stack"));
        };

        let mut bad_key = None;
        let next = match &mut frame.cursor {
            Cursor::Members { index } => {
                let mut next = None;
                while let Some(member) = frame.plan.members().get(*index) {
                    *index += 1;
                    let value = member.get(frame.value).ok_or(SerializeError::Invariant(
                        "member accessor rejected its owner",
                    ))?;
                    if (options.omit_null_members || member.skip_when_null())
                        && resolver::is_null(value)
                    {
                        continue;
                    }
                    if member.is_renamed() {
                        writer.write_name(member.name());
                    } else {
                        writer.write_name(options.naming_policy.apply(member.name(), name_buf));
                    }
                    next = Some((Segment::Member(member.name()), value, member.declared()));
                    break;
                }
                next
            }
            Cursor::Elements { items, index } => {
                let PlanKind::Sequence { item } = frame.plan.kind() else {
                    return Err(SerializeError::Invariant("element cursor on a non-sequence plan"));
                };
                items.next().map(|value| {
                    let segment = Segment::Index(*index);
                    *index += 1;
                    (segment, value, item)
                })
            }
            Cursor::Entries { entries, index } => {
                let PlanKind::Dictionary { value: declared, .. } = frame.plan.kind() else {
                    return Err(SerializeError::Invariant("entry cursor on a non-dictionary plan"));
                };
                match entries.next() {
                    Some((key, value)) => {
                        *index += 1;
                        match key_text(key, key_buf) {
                            Some(text) => {
                                let name = options.dictionary_key_policy.apply(text, name_buf);
                                writer.write_name(name);
                                Some((Segment::Key(key), value, declared))
                            }
                            None => {
                                bad_key = Some(key);
                                None
                            }
                        }
                    }
                    None => None,
                }
            }
        };

        if next.is_none() && bad_key.is_none() {
            frame.state = FrameState::EndContainer;
        }

        if let Some(key) = bad_key {
            return Err(SerializeError::UnsupportedKey {
                type_path: key.descriptor().path(),
                path: stack.path_to(Some(Segment::Key(key))),
            });
        }

        match next {
            Some((segment, value, declared)) => self.write_value(segment, value, declared),
            None => Ok(()),
        }
    }

    /// Writes a child value: `null`, a scalar, or a new frame for containers.
    fn write_value(
        &mut self,
        segment: Segment<'a>,
        value: &'a dyn Shape,
        declared: &'static ShapeInfo,
    ) -> Result<(), SerializeError> {
        let (value, info) = match resolver::resolve(declared, value) {
            Resolved::Null => {
                self.writer.write_null();
                return Ok(());
            }
            Resolved::Value { value, info } => (value, info),
        };

        // Scalars never need a plan.
        if let ShapeInfo::Scalar(_) = info {
            return self.write_scalar(value);
        }

        let plan = self.cache.get_or_build(info);
        let cursor = match (plan.kind(), value.shape_ref()) {
            (PlanKind::Object, ShapeRef::Struct) => Cursor::Members { index: 0 },
            (PlanKind::Sequence { .. }, ShapeRef::List(list)) => Cursor::Elements {
                items: list.iter(),
                index: 0,
            },
            (PlanKind::Dictionary { .. }, ShapeRef::Map(map)) => Cursor::Entries {
                entries: map.iter(),
                index: 0,
            },
            (PlanKind::Opaque, _) | (_, ShapeRef::Opaque) => {
                return Err(SerializeError::UnsupportedShape {
                    type_path: info.type_path(),
                    path: self.stack.path_to(Some(segment)),
                });
            }
            _ => {
                return Err(SerializeError::Invariant(
                    "value content does not match its shape metadata",
                ));
            }
        };

        self.stack.push(Frame::new(value, plan, cursor, segment))
    }

    fn write_scalar(&mut self, value: &dyn Shape) -> Result<(), SerializeError> {
        let ShapeRef::Scalar(scalar) = value.shape_ref() else {
            return Err(SerializeError::Invariant("scalar metadata on a non-scalar value"));
        };
        let writer = &mut self.writer;
        match scalar {
            ScalarRef::Null => writer.write_null(),
            ScalarRef::Bool(v) => writer.write_bool(v),
            ScalarRef::Int(v) => writer.write_i64(v),
            ScalarRef::UInt(v) => writer.write_u64(v),
            ScalarRef::Int128(v) => writer.write_i128(v),
            ScalarRef::UInt128(v) => writer.write_u128(v),
            ScalarRef::F32(v) => writer.write_f32(v)?,
            ScalarRef::F64(v) => writer.write_f64(v)?,
            ScalarRef::Char(v) => writer.write_char(v),
            ScalarRef::Str(v) => writer.write_str(v),
        }
        Ok(())
    }
}

/// Returns the text of a dictionary key, `None` if the key has no string form.
fn key_text<'k>(key: &'k dyn Shape, buf: &'k mut String) -> Option<&'k str> {
    buf.clear();
    let mut ints = itoa::Buffer::new();
    let text = match key.shape_ref() {
        ShapeRef::Scalar(ScalarRef::Str(text)) => return Some(text),
        ShapeRef::Scalar(ScalarRef::Bool(v)) => return Some(if v { "true" } else { "false" }),
        ShapeRef::Scalar(ScalarRef::Char(v)) => {
            buf.push(v);
            return Some(buf.as_str());
        }
        ShapeRef::Scalar(ScalarRef::Int(v)) => ints.format(v),
        ShapeRef::Scalar(ScalarRef::UInt(v)) => ints.format(v),
        ShapeRef::Scalar(ScalarRef::Int128(v)) => ints.format(v),
        ShapeRef::Scalar(ScalarRef::UInt128(v)) => ints.format(v),
        _ => return None,
    };
    buf.push_str(text);
    Some(buf.as_str())
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use vc_shape::{Shape, Typed, impl_shape_opaque, impl_shape_struct};

    use crate::{
        FloatPolicy, FrameState, JsonSerializer, NamingPolicy, PlanCache, Progress, SerializeError,
        SerializerOptions, SinkError, SliceSink,
    };

    struct Pair {
        a: i32,
        b: Option<i32>,
    }

    impl_shape_struct!(Pair { a: i32, b: Option<i32> });

    struct Point {
        x: i32,
    }

    impl_shape_struct!(Point { x: i32 });

    struct Empty {}

    impl_shape_struct!(Empty {});

    struct Link {
        id: u32,
        next: Option<Box<Link>>,
    }

    impl_shape_struct!(Link {
        id: u32,
        #[omit_null] next: Option<Box<Link>>,
    });

    fn chain(len: u32) -> Link {
        let mut head = Link { id: len, next: None };
        for id in (0..len).rev() {
            head = Link {
                id,
                next: Some(Box::new(head)),
            };
        }
        head
    }

    struct Socket(u32);

    impl_shape_opaque!(Socket);

    struct Conn {
        host: String,
        socket: Socket,
    }

    impl_shape_struct!(Conn { host: String, socket: Socket });

    struct Doc {
        title: String,
        items: Vec<Box<dyn Shape>>,
        meta: BTreeMap<String, Option<f64>>,
        nested: Vec<Vec<u8>>,
        any: Box<dyn Shape>,
    }

    impl_shape_struct!(Doc {
        title: String,
        items: Vec<Box<dyn Shape>>,
        meta: BTreeMap<String, Option<f64>>,
        nested: Vec<Vec<u8>>,
        any: Box<dyn Shape>,
    });

    fn doc() -> Doc {
        Doc {
            title: "report \"q3\"".into(),
            items: vec![Box::new(1_u8), Box::new("two"), Box::new(Point { x: 3 })],
            meta: BTreeMap::from([("a".into(), Some(0.5)), ("b".into(), None)]),
            nested: vec![vec![], vec![1, 2]],
            any: Box::new(vec![Some(true), None]),
        }
    }

    fn compact(value: &dyn Shape) -> String {
        JsonSerializer::default().to_string(value).unwrap()
    }

    #[test]
    fn null_members_kept_or_omitted() {
        let value = Pair { a: 1, b: None };
        assert_eq!(compact(&value), r#"{"a":1,"b":null}"#);

        let omit = JsonSerializer::new(SerializerOptions::default().with_omit_null_members(true));
        assert_eq!(omit.to_string(&value).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn nested_nulls_are_omitted() {
        struct Maybe {
            a: u8,
            b: Option<Option<u8>>,
        }

        impl_shape_struct!(Maybe { a: u8, b: Option<Option<u8>> });

        struct Flagged {
            a: u8,
            b: Option<Option<u8>>,
        }

        impl_shape_struct!(Flagged { a: u8, #[omit_null] b: Option<Option<u8>> });

        struct Loose {
            a: Box<dyn Shape>,
            b: Option<Box<dyn Shape>>,
        }

        impl_shape_struct!(Loose { a: Box<dyn Shape>, b: Option<Box<dyn Shape>> });

        let omit = JsonSerializer::new(SerializerOptions::default().with_omit_null_members(true));

        let maybe = Maybe { a: 1, b: Some(None) };
        assert_eq!(compact(&maybe), r#"{"a":1,"b":null}"#);
        assert_eq!(omit.to_string(&maybe).unwrap(), r#"{"a":1}"#);

        let flagged = Flagged { a: 1, b: Some(None) };
        assert_eq!(compact(&flagged), r#"{"a":1}"#);
        let flagged = Flagged { a: 1, b: Some(Some(2)) };
        assert_eq!(compact(&flagged), r#"{"a":1,"b":2}"#);

        let loose = Loose {
            a: Box::new(()),
            b: Some(Box::new(())),
        };
        assert_eq!(compact(&loose), r#"{"a":null,"b":null}"#);
        assert_eq!(omit.to_string(&loose).unwrap(), "{}");
    }

    #[test]
    fn explicit_names_bypass_naming_policy() {
        struct Record {
            id: u32,
            x_y: u32,
            created_at: u32,
        }

        impl_shape_struct!(Record {
            #[rename("ID")] id: u32,
            #[rename("x-y")] x_y: u32,
            created_at: u32,
        });

        let value = Record {
            id: 1,
            x_y: 2,
            created_at: 3,
        };
        let camel = JsonSerializer::new(
            SerializerOptions::default().with_naming_policy(NamingPolicy::CamelCase),
        );
        assert_eq!(
            camel.to_string(&value).unwrap(),
            r#"{"ID":1,"x-y":2,"createdAt":3}"#
        );
    }

    #[test]
    fn closed_frame_is_popped_on_next_step() {
        let serializer = JsonSerializer::new(SerializerOptions::default().with_flush_threshold(1));
        let value = Vec::<u8>::new();
        let mut session = serializer.session(&value, Vec::new());

        assert_eq!(session.resume().unwrap(), Progress::Paused { committed: 1 });
        assert_eq!(session.stack().frames()[0].state(), FrameState::WritingMembers);

        assert_eq!(session.resume().unwrap(), Progress::Paused { committed: 2 });
        assert_eq!(session.stack().frames()[0].state(), FrameState::Done);

        assert_eq!(session.resume().unwrap(), Progress::Complete { committed: 2 });
        assert!(session.stack().is_empty());
        assert_eq!(session.into_sink(), b"[]");
    }

    #[test]
    fn heterogeneous_sequence() {
        let items: Vec<Box<dyn Shape>> = vec![
            Box::new(1_i32),
            Box::new(String::from("x")),
            Box::new(true),
            Box::new(None::<i32>),
        ];
        assert_eq!(compact(&items), r#"[1,"x",true,null]"#);
    }

    #[test]
    fn any_declared_value_uses_runtime_shape() {
        let any: Box<dyn Shape> = Box::new(Point { x: 1 });
        let serializer = JsonSerializer::default();
        let bytes = serializer
            .serialize_as(&any, <Box<dyn Shape> as Typed>::shape_info())
            .unwrap();
        assert_eq!(bytes, br#"{"x":1}"#);
        assert_eq!(compact(&any), r#"{"x":1}"#);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(compact(&Vec::<i32>::new()), "[]");
        assert_eq!(compact(&Empty {}), "{}");
        assert_eq!(compact(&BTreeMap::<String, i32>::new()), "{}");
        assert_eq!(compact(&None::<Point>), "null");
    }

    #[test]
    fn mixed_document() {
        assert_eq!(
            compact(&doc()),
            concat!(
                r#"{"title":"report \"q3\"","items":[1,"two",{"x":3}],"#,
                r#""meta":{"a":0.5,"b":null},"nested":[[],[1,2]],"any":[true,null]}"#
            )
        );
    }

    #[test]
    fn dictionary_keys() {
        let ints = BTreeMap::from([(-1_i64, 'a'), (20, 'b')]);
        assert_eq!(compact(&ints), r#"{"-1":"a","20":"b"}"#);

        let policy = JsonSerializer::new(
            SerializerOptions::default()
                .with_dictionary_key_policy(NamingPolicy::SnakeCase)
                .with_naming_policy(NamingPolicy::PascalCase),
        );
        let map = BTreeMap::from([("someKey".to_owned(), Point { x: 0 })]);
        assert_eq!(policy.to_string(&map).unwrap(), r#"{"some_key":{"X":0}}"#);

        let lists = BTreeMap::from([(vec![1_u8], 1_u8)]);
        let err = JsonSerializer::default().to_vec(&lists).unwrap_err();
        let SerializeError::UnsupportedKey { path, .. } = err else {
            panic!("unexpected {err:?}");
        };
        assert!(path.starts_with("$[<"), "{path}");
    }

    #[test]
    fn output_is_deterministic() {
        let value = doc();
        let serializer = JsonSerializer::default();
        assert_eq!(serializer.to_vec(&value).unwrap(), serializer.to_vec(&value).unwrap());
    }

    #[test]
    fn depth_ceiling() {
        let serializer = JsonSerializer::new(SerializerOptions::default().with_max_depth(8));
        assert!(serializer.to_vec(&chain(7)).is_ok());

        let err = serializer.to_vec(&chain(8)).unwrap_err();
        let SerializeError::DepthExceeded { max_depth, path } = err else {
            panic!("unexpected {err:?}");
        };
        assert_eq!(max_depth, 8);
        assert_eq!(path, format!("${}", ".next".repeat(8)));

        // The default ceiling still stops very deep input.
        assert!(matches!(
            JsonSerializer::default().to_vec(&chain(500)),
            Err(SerializeError::DepthExceeded { max_depth: 64, .. })
        ));
    }

    #[test]
    fn suspension_matches_single_shot() {
        let value = doc();
        let expected = compact(&value).into_bytes();

        for threshold in 1..=expected.len() + 1 {
            let serializer =
                JsonSerializer::new(SerializerOptions::default().with_flush_threshold(threshold));
            let mut session = serializer.session(&value, Vec::new());
            let mut last_committed = 0;
            let mut root_position = 0;
            loop {
                let progress = session.resume().unwrap();
                if let Some(root) = session.stack().frames().first() {
                    assert!(root.position() >= root_position);
                    root_position = root.position();
                }
                match progress {
                    Progress::Paused { committed } => {
                        assert!(committed > last_committed);
                        assert_eq!(session.sink().len(), committed);
                        last_committed = committed;
                    }
                    Progress::Complete { committed } => {
                        assert_eq!(committed, expected.len());
                        break;
                    }
                }
            }
            assert!(session.is_complete());
            assert_eq!(session.into_sink(), expected, "threshold {threshold}");
        }
    }

    #[test]
    fn mismatched_declaration_writes_nothing() {
        let serializer = JsonSerializer::default();
        let err = serializer
            .serialize_as(&5_u8, <String as Typed>::shape_info())
            .unwrap_err();
        assert!(matches!(err, SerializeError::TypeMismatch { .. }));

        assert!(serializer
            .serialize_as(&5_u8, <Option<u8> as Typed>::shape_info())
            .is_ok());
    }

    #[test]
    fn opaque_member_fails_with_path() {
        let conn = Conn {
            host: "db".into(),
            socket: Socket(3),
        };
        let serializer = JsonSerializer::default();
        let mut session = serializer.session(&conn, Vec::new());
        let err = session.resume().unwrap_err();
        assert!(matches!(
            err,
            SerializeError::UnsupportedShape { ref path, .. } if path == "$.socket"
        ));
        assert!(matches!(session.resume(), Err(SerializeError::Invariant(_))));
        assert!(session.into_sink().is_empty());
        assert_eq!(conn.socket.0, 3);
    }

    #[test]
    fn non_finite_numbers() {
        let value = vec![1.0_f64, f64::NAN];
        assert!(matches!(
            JsonSerializer::default().to_vec(&value),
            Err(SerializeError::NonFiniteNumber { .. })
        ));

        let lenient = JsonSerializer::new(SerializerOptions::default().with_float_policy(FloatPolicy::Null));
        assert_eq!(lenient.to_string(&value).unwrap(), "[1.0,null]");
    }

    #[test]
    fn sink_failures_surface() {
        let mut buf = [0_u8; 8];
        let value = vec!["abcdef"; 4];
        let err = JsonSerializer::default()
            .to_sink(&value, SliceSink::new(&mut buf))
            .err()
            .unwrap();
        assert!(matches!(err, SerializeError::Sink(SinkError::Full { .. })));
        assert!(err.is_sink());
    }

    #[test]
    fn io_writer_output() {
        let value = Pair { a: 2, b: Some(3) };
        let out = JsonSerializer::default().to_writer(Vec::new(), &value).unwrap();
        assert_eq!(out, br#"{"a":2,"b":3}"#);
    }

    #[test]
    fn scoped_cache() {
        let cache = alloc::sync::Arc::new(PlanCache::new());
        let serializer = JsonSerializer::with_cache(SerializerOptions::default(), cache.clone());
        serializer.to_vec(&doc()).unwrap();
        assert!(cache.contains(<Doc as Typed>::shape_info().descriptor()));
        assert!(cache.contains(<Point as Typed>::shape_info().descriptor()));
        assert!(!cache.contains(<String as Typed>::shape_info().descriptor()));
    }
}
