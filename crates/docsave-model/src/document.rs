//! The document capability handed to the saver.

use std::io::{self, Write};

use serde::Serialize;

/// An in-memory document that can write its byte representation to a sink.
///
/// The saver borrows a handle for the duration of one save call and never
/// retains it. The byte layout is entirely up to the implementor.
pub trait DocumentHandle {
    /// Write the document's bytes to `sink`.
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()>;
}

impl<T: DocumentHandle + ?Sized> DocumentHandle for &T {
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()> {
        (**self).serialize(sink)
    }
}

impl DocumentHandle for [u8] {
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(self)
    }
}

impl DocumentHandle for Vec<u8> {
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(self)
    }
}

impl DocumentHandle for str {
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(self.as_bytes())
    }
}

impl DocumentHandle for String {
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(self.as_bytes())
    }
}

/// A document serialized as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    value: T,
}

impl<T: Serialize> JsonDocument<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Serialize> DocumentHandle for JsonDocument<T> {
    fn serialize(&self, sink: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *sink, &self.value).map_err(io::Error::from)?;
        sink.write_all(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Report {
        title: String,
        pages: u32,
    }

    fn bytes_of<D: DocumentHandle + ?Sized>(doc: &D) -> Vec<u8> {
        let mut out = Vec::new();
        doc.serialize(&mut out).unwrap();
        out
    }

    #[test]
    fn test_byte_documents_write_verbatim() {
        assert_eq!(bytes_of(b"abc".as_slice()), b"abc");
        assert_eq!(bytes_of(&vec![1u8, 2, 3]), vec![1, 2, 3]);
        assert_eq!(bytes_of("report"), b"report");
        assert_eq!(bytes_of(&String::from("x")), b"x");
    }

    #[test]
    fn test_json_document_is_pretty_with_trailing_newline() {
        let doc = JsonDocument::new(Report {
            title: "Sales".to_string(),
            pages: 3,
        });
        let text = String::from_utf8(bytes_of(&doc)).unwrap();
        assert!(text.starts_with("{\n"));
        assert!(text.contains("\"title\": \"Sales\""));
        assert!(text.ends_with("}\n"));
        assert_eq!(doc.value().pages, 3);
    }
}
