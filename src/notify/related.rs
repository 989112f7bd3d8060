//! Multipart/related message assembly
//!
//! HTML notifications carry their images inline. Image references in the
//! rendered HTML are rewritten to `cid:` URLs matching the inline
//! attachments; a reference that already carries a `cid:` prefix is left
//! alone, so rewriting is idempotent.

use crate::domain::errors::CatalogueError;
use crate::domain::result::Result;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use std::path::Path;

/// An image attached inline to the HTML part
#[derive(Debug, Clone)]
pub struct InlinePart {
    /// File name, used both as the content id and in HTML references
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl InlinePart {
    /// Read an inline image from disk, deriving the content type from the
    /// file extension.
    ///
    /// # Errors
    ///
    /// A missing file or an extension with no known image type is a
    /// notification error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                CatalogueError::Notification(format!(
                    "Inline image path {} has no file name",
                    path.display()
                ))
            })?
            .to_string();
        let content_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            other => {
                return Err(CatalogueError::Notification(format!(
                    "Unsupported inline image type {other:?} for {}",
                    path.display()
                )))
            }
        };
        let bytes = std::fs::read(path).map_err(|e| {
            CatalogueError::Notification(format!(
                "Cannot read inline image {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            bytes,
        })
    }
}

/// Rewrite references to the given file names into `cid:` URLs.
///
/// References already prefixed with `cid:` are not rewritten again.
pub fn rewrite_inline_references(html: &str, file_names: &[&str]) -> Result<String> {
    let mut rewritten = html.to_string();
    for name in file_names {
        let pattern = format!("(?<!cid:){}", fancy_regex::escape(name));
        let regex = fancy_regex::Regex::new(&pattern).map_err(|e| {
            CatalogueError::Notification(format!("Invalid inline reference pattern: {e}"))
        })?;
        rewritten = regex
            .replace_all(&rewritten, format!("cid:{name}"))
            .into_owned();
    }
    Ok(rewritten)
}

/// Assemble a multipart notification: a plain-text alternative, an HTML
/// body with inline images, and an optional PDF attachment.
pub fn build_related_message(
    from: &str,
    to: &str,
    subject: &str,
    text: String,
    html: String,
    inline: &[InlinePart],
    pdf: Option<(&str, Vec<u8>)>,
) -> Result<Message> {
    let file_names: Vec<&str> = inline.iter().map(|part| part.file_name.as_str()).collect();
    let html = rewrite_inline_references(&html, &file_names)?;

    let mut related = MultiPart::related().singlepart(SinglePart::html(html));
    for part in inline {
        let content_type = ContentType::parse(&part.content_type).map_err(|e| {
            CatalogueError::Notification(format!(
                "Invalid content type '{}': {e}",
                part.content_type
            ))
        })?;
        related = related.singlepart(
            Attachment::new_inline(part.file_name.clone())
                .body(Body::new(part.bytes.clone()), content_type),
        );
    }

    let alternative = MultiPart::alternative()
        .singlepart(SinglePart::plain(text))
        .multipart(related);

    let content = match pdf {
        None => alternative,
        Some((file_name, bytes)) => {
            let content_type = ContentType::parse("application/pdf").map_err(|e| {
                CatalogueError::Notification(format!("Invalid PDF content type: {e}"))
            })?;
            MultiPart::mixed().multipart(alternative).singlepart(
                Attachment::new(file_name.to_string()).body(Body::new(bytes), content_type),
            )
        }
    };

    let from: Mailbox = from
        .parse()
        .map_err(|e| CatalogueError::Notification(format!("Invalid sender '{from}': {e}")))?;
    let to: Mailbox = to
        .parse()
        .map_err(|e| CatalogueError::Notification(format!("Invalid recipient '{to}': {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(content)
        .map_err(|e| CatalogueError::Notification(format!("Cannot assemble message: {e}")))
}
