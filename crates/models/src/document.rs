use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Largest accepted upload for a single document
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Content types accepted for excess documents
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];

/// One of the five document references carried by an excess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSlot {
    Identity,
    Contract,
    License,
    Invoice,
    Subscription,
}

impl DocumentSlot {
    pub const ALL: [Self; 5] = [
        Self::Identity,
        Self::Contract,
        Self::License,
        Self::Invoice,
        Self::Subscription,
    ];

    /// Multipart field name used by uploads
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Identity => "imageIdentity",
            Self::Contract => "imageContract",
            Self::License => "imageLicense",
            Self::Invoice => "imageInvoice",
            Self::Subscription => "imageCompanySubscription",
        }
    }

    /// Short name used by downloads and the details view
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Contract => "contract",
            Self::License => "license",
            Self::Invoice => "invoice",
            Self::Subscription => "subscription",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Identity => "Identity Document",
            Self::Contract => "Contract Document",
            Self::License => "Driving License",
            Self::Invoice => "Invoice Document",
            Self::Subscription => "Company Subscription",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.field_name() == name)
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.short_name() == name)
    }

    /// Accepts either naming scheme
    pub fn parse(name: &str) -> Option<Self> {
        Self::from_field_name(name).or_else(|| Self::from_short_name(name))
    }
}

pub fn is_allowed_content_type(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES.contains(&content_type)
}

/// Generated storage name for an uploaded document
pub fn document_filename(excess_id: Uuid, slot: DocumentSlot, millis: i64, ext: &str) -> String {
    format!("{excess_id}-{}-{millis}.{ext}", slot.field_name())
}

/// Lowercased extension of `filename`, `bin` if there is none
pub fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}

/// MIME type served back for a stored document
pub fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}
