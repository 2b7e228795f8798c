//! Application constants
//!
//! Single source of truth for upstream endpoints, mime types, and the
//! client-facing sentinel texts.

/// Base URL of the Generative Language API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Endpoint suffix used when neither the request nor the registry entry
/// names one.
pub const DEFAULT_CHAT_ENDPOINT: &str = "chat/completions";

/// Mime type identifying a Word document attachment.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Zip entry holding a Word document's main text part.
pub const DOCX_DOCUMENT_ENTRY: &str = "word/document.xml";

/// Substitute text emitted in place of content lost to the provider's
/// safety filter.
pub const SAFETY_NOTICE: &str = "已触发安全限制，请重新开始对话";

/// Client-facing message for a conversation with no usable prompt.
pub const INVALID_CONVERSATION: &str = "对话失效，请重新开始对话";

/// Header prepended to document text merged into a user message.
pub const DOCUMENT_SECTION_HEADER: &str = "\n\n[Document Content]:\n";

/// Delimiter between the texts of multiple merged documents.
pub const DOCUMENT_DELIMITER: &str = "\n\n---\n\n";
