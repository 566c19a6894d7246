//! Catalog entities: regions and instance types, and their collections.

use super::RootDiskStorageType;

/// A data center region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Region identifier, e.g. `eu-west-3`.
    pub name: String,
    /// Human readable location.
    pub location: String,
}

impl Region {
    /// Create a region.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

/// A single measured resource, e.g. 4 vCPU or 16 GiB memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// The amount.
    pub value: f64,
    /// The unit of `value`.
    pub unit: String,
}

impl Resource {
    /// Create a resource.
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Compute and network resources of an instance type.
#[derive(Debug, Clone, PartialEq)]
pub struct Resources {
    /// Virtual CPUs.
    pub cpu: Resource,
    /// Memory.
    pub memory: Resource,
    /// Public network speed.
    pub public_network_speed: Resource,
    /// Private network speed.
    pub private_network_speed: Resource,
}

/// Hourly and monthly price of one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    /// Price per hour, as a decimal string.
    pub hourly_price: String,
    /// Price per month, as a decimal string.
    pub monthly_price: String,
}

/// Storage prices per storage type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePrices {
    /// Local storage.
    pub local: Price,
    /// Central storage.
    pub central: Price,
}

/// The price list of an instance type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prices {
    /// ISO currency code.
    pub currency: String,
    /// Currency symbol.
    pub currency_symbol: String,
    /// Compute price.
    pub compute: Price,
    /// Storage prices.
    pub storage: StoragePrices,
}

/// An instance type as reported by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceType {
    /// Type identifier, e.g. `lsw.m5a.4xlarge`.
    pub name: String,
    /// Resources, when reported.
    pub resources: Option<Resources>,
    /// Prices, when reported.
    pub prices: Option<Prices>,
    /// Root disk storage types the type supports, when reported.
    pub storage_types: Option<Vec<RootDiskStorageType>>,
}

impl InstanceType {
    /// An instance type known only by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: None,
            prices: None,
            storage_types: None,
        }
    }

    /// Attach resources.
    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Attach prices.
    pub fn with_prices(mut self, prices: Prices) -> Self {
        self.prices = Some(prices);
        self
    }

    /// Attach supported storage types.
    pub fn with_storage_types(mut self, storage_types: Vec<RootDiskStorageType>) -> Self {
        self.storage_types = Some(storage_types);
        self
    }
}

/// Regions reported by the catalog, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Regions(Vec<Region>);

impl Regions {
    /// Wrap a list of regions.
    pub fn new(regions: Vec<Region>) -> Self {
        Self(regions)
    }

    /// Whether a region with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|r| r.name == name)
    }

    /// Region names in insertion order.
    pub fn to_array(&self) -> Vec<String> {
        self.0.iter().map(|r| r.name.clone()).collect()
    }

    /// Iterate over the regions.
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.0.iter()
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no regions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Region> for Regions {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Instance types reported by the catalog, in wire order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstanceTypes(Vec<InstanceType>);

impl InstanceTypes {
    /// Wrap a list of instance types.
    pub fn new(instance_types: Vec<InstanceType>) -> Self {
        Self(instance_types)
    }

    /// Whether an instance type with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|t| t.name == name)
    }

    /// Instance type names in insertion order.
    pub fn to_array(&self) -> Vec<String> {
        self.0.iter().map(|t| t.name.clone()).collect()
    }

    /// Iterate over the instance types.
    pub fn iter(&self) -> std::slice::Iter<'_, InstanceType> {
        self.0.iter()
    }

    /// Number of instance types.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no instance types.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<InstanceType> for InstanceTypes {
    fn from_iter<I: IntoIterator<Item = InstanceType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
