use chrono::{DateTime, Utc};

use super::{ImageState, RootDiskStorageType};

/// Size of an image's storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSize {
    /// The size.
    pub size: f64,
    /// The unit of `size`.
    pub unit: String,
}

/// An operating system image, either a Leaseweb image or a custom one.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Image id: a token such as `UBUNTU_22_04_64BIT`, or a UUID for custom images.
    pub id: String,
    /// Display name.
    pub name: String,
    /// OS family, e.g. `linux`.
    pub family: String,
    /// Flavour, e.g. `ubuntu`.
    pub flavour: String,
    /// Whether the image was created by the customer.
    pub custom: bool,
    /// OS version.
    pub version: Option<String>,
    /// CPU architecture.
    pub architecture: Option<String>,
    /// Availability, custom images only.
    pub state: Option<ImageState>,
    /// Why the image is in its state.
    pub state_reason: Option<String>,
    /// Region of a custom image.
    pub region: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Storage size, custom images only.
    pub storage_size: Option<StorageSize>,
    /// Market apps that can be installed on the image.
    pub market_apps: Vec<String>,
    /// Storage types the image can be deployed to.
    pub storage_types: Vec<RootDiskStorageType>,
}

impl Image {
    /// An image with only its identifying fields set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        family: impl Into<String>,
        flavour: impl Into<String>,
        custom: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            family: family.into(),
            flavour: flavour.into(),
            custom,
            version: None,
            architecture: None,
            state: None,
            state_reason: None,
            region: None,
            created_at: None,
            updated_at: None,
            storage_size: None,
            market_apps: Vec::new(),
            storage_types: Vec::new(),
        }
    }
}
