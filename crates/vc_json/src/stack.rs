use alloc::sync::Arc;
use core::fmt::{self, Write};

use vc_shape::{ScalarRef, Shape, ShapeRef};

use crate::{SerializeError, WritePlan};

// -----------------------------------------------------------------------------
// FrameState

/// Progress of one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// The opening token is not written yet.
    StartContainer,
    WritingMembers,
    /// All children are written, the closing token is next.
    EndContainer,
    /// The closing token is written; the frame is popped on the next step.
    Done,
}

// -----------------------------------------------------------------------------
// Segment

/// How a frame was reached from its parent.
#[derive(Clone, Copy)]
pub enum Segment<'a> {
    Root,
    Member(&'static str),
    Index(usize),
    Key(&'a dyn Shape),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_char('$'),
            Self::Member(name) => write!(f, ".{name}"),
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Key(key) => match key.shape_ref() {
                ShapeRef::Scalar(ScalarRef::Str(key)) => write!(f, "[{key:?}]"),
                ShapeRef::Scalar(ScalarRef::Char(key)) => write!(f, "[\"{key}\"]"),
                ShapeRef::Scalar(ScalarRef::Int(key)) => write!(f, "[{key}]"),
                ShapeRef::Scalar(ScalarRef::UInt(key)) => write!(f, "[{key}]"),
                ShapeRef::Scalar(ScalarRef::Int128(key)) => write!(f, "[{key}]"),
                ShapeRef::Scalar(ScalarRef::UInt128(key)) => write!(f, "[{key}]"),
                ShapeRef::Scalar(ScalarRef::Bool(key)) => write!(f, "[{key}]"),
                _ => write!(f, "[<{}>]", key.descriptor()),
            },
        }
    }
}

impl fmt::Debug for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// Cursor

/// Position inside a container. It only moves forward.
pub(crate) enum Cursor<'a> {
    Members {
        index: usize,
    },
    Elements {
        items: Box<dyn Iterator<Item = &'a dyn Shape> + 'a>,
        index: usize,
    },
    Entries {
        entries: Box<dyn Iterator<Item = (&'a dyn Shape, &'a dyn Shape)> + 'a>,
        index: usize,
    },
}

impl Cursor<'_> {
    #[inline]
    fn position(&self) -> usize {
        match self {
            Self::Members { index } | Self::Elements { index, .. } | Self::Entries { index, .. } => {
                *index
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Frame

/// One container being written.
pub struct Frame<'a> {
    pub(crate) value: &'a dyn Shape,
    pub(crate) plan: Arc<WritePlan>,
    pub(crate) state: FrameState,
    pub(crate) cursor: Cursor<'a>,
    pub(crate) segment: Segment<'a>,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(
        value: &'a dyn Shape,
        plan: Arc<WritePlan>,
        cursor: Cursor<'a>,
        segment: Segment<'a>,
    ) -> Self {
        Self {
            value,
            plan,
            state: FrameState::StartContainer,
            cursor,
            segment,
        }
    }

    #[inline]
    pub fn value(&self) -> &'a dyn Shape {
        self.value
    }

    #[inline]
    pub fn plan(&self) -> &WritePlan {
        &self.plan
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Number of members, elements or entries consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    #[inline]
    pub fn segment(&self) -> Segment<'a> {
        self.segment
    }
}

impl fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("type", &self.plan.descriptor())
            .field("state", &self.state)
            .field("position", &self.position())
            .field("segment", &self.segment)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// WriteStack

/// Explicit stack of open containers, bottom is the root.
///
/// Its depth is the current nesting depth of the output. Pushing past the
/// configured ceiling fails instead of growing without bound.
pub struct WriteStack<'a> {
    frames: Vec<Frame<'a>>,
    max_depth: usize,
}

impl<'a> WriteStack<'a> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames from the root up.
    #[inline]
    pub fn frames(&self) -> &[Frame<'a>] {
        &self.frames
    }

    #[inline]
    pub(crate) fn top_mut(&mut self) -> Option<&mut Frame<'a>> {
        self.frames.last_mut()
    }

    pub(crate) fn push(&mut self, frame: Frame<'a>) -> Result<(), SerializeError> {
        if self.frames.len() >= self.max_depth {
            return Err(SerializeError::DepthExceeded {
                max_depth: self.max_depth,
                path: self.path_to(Some(frame.segment)),
            });
        }
        log::trace!(
            "push `{}` at depth {}",
            frame.plan.descriptor(),
            self.frames.len() + 1
        );
        self.frames.push(frame);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<Frame<'a>> {
        let frame = self.frames.pop()?;
        log::trace!(
            "pop `{}` at depth {}",
            frame.plan.descriptor(),
            self.frames.len() + 1
        );
        Some(frame)
    }

    /// Renders the position of the top frame, like `$.items[2].name`.
    pub fn path(&self) -> String {
        self.path_to(None)
    }

    /// Renders the position of the top frame followed by `next`.
    pub(crate) fn path_to(&self, next: Option<Segment<'a>>) -> String {
        let mut path = String::from("$");
        let segments = self.frames.iter().map(|frame| frame.segment).chain(next);
        for segment in segments {
            if !matches!(segment, Segment::Root) {
                // Writing into a `String` does not fail.
                let _ = write!(path, "{segment}");
            }
        }
        path
    }
}

impl fmt::Debug for WriteStack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteStack")
            .field("frames", &self.frames)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use vc_shape::Typed;

    use super::{Cursor, Frame, Segment, WriteStack};
    use crate::{PlanCache, SerializeError};

    fn frame(segment: Segment<'static>) -> Frame<'static> {
        static VALUE: Vec<u8> = Vec::new();
        let plan = PlanCache::new().get_or_build(<Vec<u8> as Typed>::shape_info());
        Frame::new(&VALUE, plan, Cursor::Members { index: 0 }, segment)
    }

    #[test]
    fn path_rendering() {
        static KEY: &str = "alice";
        let mut stack = WriteStack::new(8);
        stack.push(frame(Segment::Root)).unwrap();
        stack.push(frame(Segment::Member("scores"))).unwrap();
        stack.push(frame(Segment::Key(&KEY))).unwrap();
        stack.push(frame(Segment::Index(3))).unwrap();
        assert_eq!(stack.path(), r#"$.scores["alice"][3]"#);
        assert_eq!(stack.depth(), 4);

        stack.pop();
        assert_eq!(stack.path(), r#"$.scores["alice"]"#);
    }

    #[test]
    fn key_segments_render_values() {
        static WIDE: u128 = u128::MAX;
        static NEGATIVE: i128 = -5;
        static FLAG: bool = true;
        static BYTES: Vec<u8> = Vec::new();

        assert_eq!(Segment::Key(&WIDE).to_string(), format!("[{}]", u128::MAX));
        assert_eq!(Segment::Key(&NEGATIVE).to_string(), "[-5]");
        assert_eq!(Segment::Key(&FLAG).to_string(), "[true]");
        assert!(Segment::Key(&BYTES).to_string().starts_with("[<"));
    }

    #[test]
    fn push_past_ceiling_fails() {
        let mut stack = WriteStack::new(2);
        stack.push(frame(Segment::Root)).unwrap();
        stack.push(frame(Segment::Index(0))).unwrap();
        let err = stack.push(frame(Segment::Index(1))).unwrap_err();
        assert!(matches!(
            err,
            SerializeError::DepthExceeded { max_depth: 2, ref path } if path == "$[0][1]"
        ));
        assert_eq!(stack.depth(), 2);
    }
}
