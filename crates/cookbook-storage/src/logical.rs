//! Caller-supplied path segments.

use crate::DOCUMENT_EXTENSION;

/// Path segments as requested by a caller.
///
/// Segments may use the configured word separator in place of spaces and are
/// not guaranteed to name anything real until resolved by
/// [`ContentTree::resolve`](crate::ContentTree::resolve).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalPath {
    segments: Vec<String>,
}

impl LogicalPath {
    /// Create a logical path from already split segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a decoded URL path into segments.
    ///
    /// Empty segments (leading, trailing or doubled slashes) are dropped and a
    /// trailing `.cook` suffix on the last segment is removed, since documents
    /// are matched by base name.
    ///
    /// ```
    /// use cookbook_storage::LogicalPath;
    ///
    /// let path = LogicalPath::parse("Desserts/chocolate_cake.cook");
    /// assert_eq!(path.segments(), ["Desserts", "chocolate_cake"]);
    /// ```
    pub fn parse(url_path: &str) -> Self {
        let mut segments: Vec<String> = url_path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();

        if let Some(last) = segments.last_mut()
            && let Some(base) = last
                .strip_suffix(DOCUMENT_EXTENSION)
                .and_then(|s| s.strip_suffix('.'))
                .filter(|base| !base.is_empty())
        {
            *last = base.to_owned();
        }

        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the leading segments and the final one.
    #[must_use]
    pub fn split_last(&self) -> Option<(&str, LogicalPath)> {
        let (last, parent) = self.segments.split_last()?;
        Some((last.as_str(), Self::new(parent.iter().cloned())))
    }
}
