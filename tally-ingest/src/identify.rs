//! Bank identification: file name first, then first-page content.

use tracing::debug;

use crate::banks::ProfileRegistry;
use crate::types::InstitutionId;

/// Institution whose layout `name` uses, or `None` when nothing matches.
///
/// `first_page` is only called when no file pattern matches, so callers can defer the
/// (possibly OCR-backed) page extraction until it is actually needed.
pub fn identify(
    registry: &ProfileRegistry,
    name: &str,
    first_page: impl FnOnce() -> String,
) -> Option<InstitutionId> {
    if let Some(p) = registry.iter().find(|p| p.file_pattern.is_match(name)) {
        debug!(institution = %p.institution, "identified by file name");
        return Some(p.institution);
    }

    let text = first_page();
    let hit = registry
        .iter()
        .find(|p| p.content_pattern.is_match(&text))
        .map(|p| p.institution);
    if let Some(id) = hit {
        debug!(institution = %id, "identified by first page content");
    }
    hit
}
