//! The flat persisted projection of a server context.

use serde::{Deserialize, Serialize};

/// One persisted server connection, minus its secret.
///
/// Every field is nullable so a document written by an older or newer
/// version still loads; the restore engine decides per record whether the
/// content is usable. The field names are the document schema -- renaming
/// any of them needs a migration path.
///
/// The `kind` field carries the context type as a plain string rather than
/// the closed enum, so an unrecognized value survives deserialization and
/// can be dropped (with vault cleanup) by the restore engine instead of
/// poisoning the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextRecord {
    /// Context type, string form of `ContextType`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Full server URI, including any collection path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Account id for hosted contexts, string form of a UUID.
    #[serde(rename = "accountUUID", default, skip_serializing_if = "Option::is_none")]
    pub account_uuid: Option<String>,

    /// Collection reference, JSON-encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_ref_json: Option<String>,

    /// Project reference, JSON-encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_ref_json: Option<String>,

    /// Repository reference, JSON-encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_ref_json: Option<String>,
}
