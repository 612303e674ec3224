use serde::Serialize;

/// Action set a listing view exposes to the current viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingCapabilities {
    /// Viewer owns the listing: edit and delete.
    Manage { edit: bool, delete: bool },

    /// Anyone else: reveal the owner's contact channels.
    Contact { reveal_contacts: bool },
}

impl ListingCapabilities {
    pub fn can_manage(&self) -> bool {
        matches!(self, ListingCapabilities::Manage { .. })
    }

    pub fn can_reveal_contacts(&self) -> bool {
        matches!(
            self,
            ListingCapabilities::Contact {
                reveal_contacts: true
            }
        )
    }
}
