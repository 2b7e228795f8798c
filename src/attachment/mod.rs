//! Attachment processing
//!
//! Word documents are reduced to plain text; other binaries stay raw for
//! providers that accept inline multimodal parts. Providers that only
//! speak text get document texts merged into the conversation instead.

pub mod docx;

use tracing::warn;

use crate::constants::{DOCUMENT_DELIMITER, DOCUMENT_SECTION_HEADER};
use crate::domain::types::{Attachment, ChatMessage, MessageRole};

pub use docx::DocxError;

/// Extract a document attachment's text, degrading a malformed archive to
/// empty text so a broken upload never fails the whole request.
pub fn document_text(attachment: &Attachment) -> String {
    match docx::extract_text(&attachment.bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(%err, "failed to extract document attachment, continuing without it");
            String::new()
        }
    }
}

/// Merge document attachment texts into the last user message.
///
/// Text-only providers cannot carry inline binary parts, so extracted
/// document text is appended to the most recent user turn. Non-document
/// attachments are skipped, and without a user message the text is
/// dropped.
pub fn merge_documents(messages: &mut [ChatMessage], attachments: &[Attachment]) {
    let texts: Vec<String> = attachments
        .iter()
        .filter(|attachment| attachment.is_document())
        .map(document_text)
        .collect();
    if texts.is_empty() {
        return;
    }

    let Some(target) = messages
        .iter_mut()
        .rev()
        .find(|message| message.role == MessageRole::User)
    else {
        warn!("document attachments present but no user message to merge them into");
        return;
    };

    target.content.push_str(DOCUMENT_SECTION_HEADER);
    target.content.push_str(&texts.join(DOCUMENT_DELIMITER));
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::CompressionMethod;
    use zip::write::SimpleFileOptions;

    use super::*;
    use crate::constants::{DOCX_DOCUMENT_ENTRY, DOCX_MIME};

    fn docx_attachment(content: &str) -> Attachment {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file(DOCX_DOCUMENT_ENTRY, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        Attachment::new(DOCX_MIME, bytes)
    }

    #[test]
    fn merges_into_last_user_message() {
        let mut messages = vec![ChatMessage::new(MessageRole::User, "Q")];
        merge_documents(&mut messages, &[docx_attachment("<w:p>D</w:p>")]);
        assert_eq!(messages[0].content, "Q\n\n[Document Content]:\nD");
    }

    #[test]
    fn joins_multiple_documents_with_delimiter() {
        let mut messages = vec![
            ChatMessage::new(MessageRole::System, "ctx"),
            ChatMessage::new(MessageRole::User, "ask"),
            ChatMessage::new(MessageRole::Assistant, "reply"),
            ChatMessage::new(MessageRole::User, "follow-up"),
        ];
        merge_documents(
            &mut messages,
            &[
                docx_attachment("<w:p>first</w:p>"),
                docx_attachment("<w:p>second</w:p>"),
            ],
        );
        assert_eq!(messages[1].content, "ask");
        assert_eq!(
            messages[3].content,
            "follow-up\n\n[Document Content]:\nfirst\n\n---\n\nsecond"
        );
    }

    #[test]
    fn without_user_message_documents_are_dropped() {
        let mut messages = vec![ChatMessage::new(MessageRole::System, "ctx")];
        merge_documents(&mut messages, &[docx_attachment("<w:p>D</w:p>")]);
        assert_eq!(messages[0].content, "ctx");
    }

    #[test]
    fn non_document_attachments_are_ignored() {
        let mut messages = vec![ChatMessage::new(MessageRole::User, "Q")];
        merge_documents(&mut messages, &[Attachment::new("image/png", vec![1, 2, 3])]);
        assert_eq!(messages[0].content, "Q");
    }

    #[test]
    fn corrupt_document_degrades_to_empty_text() {
        let mut messages = vec![ChatMessage::new(MessageRole::User, "Q")];
        merge_documents(&mut messages, &[Attachment::new(DOCX_MIME, b"garbage".to_vec())]);
        assert_eq!(messages[0].content, "Q\n\n[Document Content]:\n");
    }
}
