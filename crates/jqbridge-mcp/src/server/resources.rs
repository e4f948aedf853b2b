//! Static reference resources served under the `jq://reference/` URI scheme.
//!
//! Reference text is embedded at compile time and served verbatim — no
//! computation, no subprocess.

/// A static reference document.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceDoc {
    /// Resource URI.
    pub uri: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Short description shown in resource listings.
    pub description: &'static str,
    /// The document text.
    pub text: &'static str,
}

/// All reference documents this server exposes.
pub const DOCS: &[ReferenceDoc] = &[
    ReferenceDoc {
        uri: "jq://reference/filters",
        name: "filters",
        description: "jq filter syntax quick reference",
        text: include_str!("../../docs/reference/filters.md"),
    },
    ReferenceDoc {
        uri: "jq://reference/operations",
        name: "operations",
        description: "Catalog of jqbridge tools and their operations",
        text: include_str!("../../docs/reference/operations.md"),
    },
];

/// MIME type for all reference documents.
pub const MIME_TYPE: &str = "text/markdown";

/// Look up a reference document by URI.
pub fn find(uri: &str) -> Option<&'static ReferenceDoc> {
    DOCS.iter().find(|doc| doc.uri == uri)
}
