use internment::Intern;
use std::{fmt, ops::Range, path::Path};

/// Name of the source a program was read from
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct SrcId(Intern<String>);

impl SrcId {
    pub fn empty() -> Self {
        Self(Intern::new(String::new()))
    }

    pub fn named(name: &str) -> Self {
        Self(Intern::new(name.to_string()))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self(Intern::new(path.as_ref().to_string_lossy().into_owned()))
    }
}

impl fmt::Display for SrcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "?")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for SrcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Character range within a source
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    src: SrcId,
    range: (usize, usize),
}

impl Span {
    pub fn new(src: SrcId, range: Range<usize>) -> Self {
        assert!(range.start <= range.end);
        Self {
            src,
            range: (range.start, range.end),
        }
    }

    pub fn src(&self) -> SrcId {
        self.src
    }

    pub fn range(&self) -> Range<usize> {
        self.range.0..self.range.1
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{:?}", self.src, self.range())
    }
}

impl chumsky::Span for Span {
    type Context = SrcId;
    type Offset = usize;

    fn new(src: SrcId, range: Range<usize>) -> Self {
        Span::new(src, range)
    }

    fn context(&self) -> Self::Context {
        self.src
    }

    fn start(&self) -> Self::Offset {
        self.range.0
    }

    fn end(&self) -> Self::Offset {
        self.range.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_range() {
        let src = SrcId::named("prog.lp");
        let span = Span::new(src, 5..15);
        assert_eq!(span.range(), 5..15);
        assert_eq!(span.src(), src);
        assert_eq!(format!("{:?}", span), "prog.lp:5..15");
    }

    #[test]
    fn test_empty_src_displays_placeholder() {
        assert_eq!(SrcId::empty().to_string(), "?");
    }
}
