/// Kinds of audit entries written against an excess.
///
/// Stored as free-form text so older rows with other values still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Created,
    DocumentUploaded,
    DocumentDeleted,
    StatusChanged,
    NotesUpdated,
    DescriptionUpdated,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::DocumentUploaded => "DOCUMENT_UPLOADED",
            Self::DocumentDeleted => "DOCUMENT_DELETED",
            Self::StatusChanged => "STATUS_CHANGED",
            Self::NotesUpdated => "NOTES_UPDATED",
            Self::DescriptionUpdated => "DESCRIPTION_UPDATED",
        }
    }
}

/// Kinds of notifications fanned out to the back-office staff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    BookingCreated,
    ExcessCreated,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookingCreated => "BOOKING_CREATED",
            Self::ExcessCreated => "EXCESS_CREATED",
        }
    }
}
