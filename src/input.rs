//! Input-side value types (§3, §6). `InputFile` is the pass-through shape
//! the core accepts: a location label, an optional note, and an ordered
//! list of parsed documents. Nothing here touches a filesystem or a socket.

use crate::node::Node;

/// One `---`-separated YAML chunk, one JSON value, or a whole TOML file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Document { root }
    }
}

/// A location-labeled ordered sequence of `Document`s.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFile {
    /// Display string: a file path, `-` for STDIN, or a synthetic label.
    /// Opaque to the core; never parsed or matched against.
    pub location: String,
    /// Set by operations that relocate the document root, e.g.
    /// `"YAML root was changed to /spec/template"`.
    pub note: Option<String>,
    pub documents: Vec<Document>,
}

impl InputFile {
    pub fn new(location: impl Into<String>, documents: Vec<Document>) -> Self {
        InputFile {
            location: location.into(),
            note: None,
            documents,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
