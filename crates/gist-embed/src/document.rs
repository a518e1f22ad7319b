//! Host documents.

/// A document whose text body the pipeline may rewrite.
///
/// The host owns documents; the pipeline only reads and replaces the body
/// while processing.
pub trait Document {
    /// Name used in log lines and reports (e.g. a source path).
    fn name(&self) -> &str;

    /// Mutable access to the text body.
    fn body_mut(&mut self) -> &mut String;
}

/// Minimal owned [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    /// Document name.
    pub name: String,
    /// Text body.
    pub body: String,
}

impl TextDocument {
    /// Create a document.
    #[must_use]
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

impl Document for TextDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn body_mut(&mut self) -> &mut String {
        &mut self.body
    }
}
