//! Physical lines and the three-line window the inspector works on.

/// One physical line of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Content without the line break (`\n` or `\r\n`).
    pub text: &'a str,
    /// Whether the line ended with a line break.
    pub terminated: bool,
    /// Byte offset of the line start within the file.
    pub offset: usize,
}

impl<'a> Line<'a> {
    /// Creates a line that ends with a line break, at offset 0.
    ///
    /// Mostly useful for building contexts by hand.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            terminated: true,
            offset: 0,
        }
    }

    /// Creates a line without a trailing line break, at offset 0.
    #[must_use]
    pub fn unterminated(text: &'a str) -> Self {
        Self {
            text,
            terminated: false,
            offset: 0,
        }
    }
}

/// Iterator over the physical lines of a string.
///
/// An empty string has no lines. A final line without a line break is
/// still yielded, marked as unterminated.
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    rest: &'a str,
    offset: usize,
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let offset = self.offset;
        let (raw, terminated, consumed) = match self.rest.find('\n') {
            Some(end) => (&self.rest[..end], true, end + 1),
            None => (self.rest, false, self.rest.len()),
        };
        let text = if terminated {
            raw.strip_suffix('\r').unwrap_or(raw)
        } else {
            raw
        };
        self.rest = &self.rest[consumed..];
        self.offset += consumed;
        Some(Line {
            text,
            terminated,
            offset,
        })
    }
}

/// Splits file content into physical lines.
#[must_use]
pub fn lines(content: &str) -> SourceLines<'_> {
    SourceLines {
        rest: content,
        offset: 0,
    }
}

/// A line together with its neighbours.
///
/// `previous` is `None` on the first line and `next` is `None` on the
/// last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext<'a> {
    /// 1-based line number of `current`.
    pub number: usize,
    /// Line before `current`, if any.
    pub previous: Option<Line<'a>>,
    /// Line under inspection.
    pub current: Line<'a>,
    /// Line after `current`, if any.
    pub next: Option<Line<'a>>,
}

impl<'a> LineContext<'a> {
    /// Creates a context for line `number`.
    #[must_use]
    pub fn new(
        number: usize,
        previous: Option<Line<'a>>,
        current: Line<'a>,
        next: Option<Line<'a>>,
    ) -> Self {
        Self {
            number,
            previous,
            current,
            next,
        }
    }

    /// Builds the context for the line at `index` (0-based) of `lines`.
    ///
    /// Returns `None` if `index` is out of range.
    #[must_use]
    pub fn at(lines: &[Line<'a>], index: usize) -> Option<Self> {
        let current = *lines.get(index)?;
        let previous = index.checked_sub(1).and_then(|i| lines.get(i)).copied();
        let next = lines.get(index + 1).copied();
        Some(Self::new(index + 1, previous, current, next))
    }
}
