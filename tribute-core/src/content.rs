use std::fmt;
use std::sync::Arc;

/// The memorial markup supplied by the template layer.
///
/// Opaque: nothing in this crate edits the body. Cloning shares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPayload {
    body: Arc<str>,
    variant: Option<Arc<str>>,
}

impl ContentPayload {
    pub fn new(body: impl Into<Arc<str>>) -> Self {
        Self {
            body: body.into(),
            variant: None,
        }
    }

    pub fn with_variant(mut self, variant: impl Into<Arc<str>>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Named template variant (e.g. which commemorative style is shown).
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Same body, different variant.
    pub(crate) fn set_variant(&mut self, variant: Option<Arc<str>>) {
        self.variant = variant;
    }

    /// True when both payloads share the same body allocation.
    pub fn same_body(&self, other: &ContentPayload) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

/// Remount key. Bumped on every content-variant change so views that
/// derive state from the content rebuild it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContentKey(pub u64);

impl ContentKey {
    pub fn next(self) -> Self {
        ContentKey(self.0 + 1)
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
