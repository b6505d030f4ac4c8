//! Resource kinds and per-resource conventions

use super::pools::{
    AssetFamiliesPool, AssociationTypesPool, AttributeGroupsPool, AttributesPool, CategoriesPool,
    ChannelsPool, CurrenciesPool, FamiliesPool, LocalesPool, MeasureFamiliesPool, MediaFilesPool,
    ProductModelsPool, ProductsPool, PublishedProductsPool, ReferenceEntitiesPool,
};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Field holding the code of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeField {
    /// Products are keyed by `identifier`
    Identifier,
    /// Everything else is keyed by `code`
    Code,
}

impl CodeField {
    /// JSON field name
    pub fn as_str(self) -> &'static str {
        match self {
            CodeField::Identifier => "identifier",
            CodeField::Code => "code",
        }
    }
}

/// How a resource pages its listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPagination {
    /// Numbered pages, the server default
    Page,
    /// Opaque `search_after` cursors, requested with
    /// `pagination_type=search_after`
    SearchAfter,
}

/// Conventions and capabilities of one endpoint, fixed by its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolProfile {
    /// Field holding the code of an item
    pub code_field: CodeField,
    /// How listings are paged
    pub pagination: ListPagination,
    /// Capability traits the pool implements, e.g. `Gettable`
    pub capabilities: &'static [&'static str],
}

impl PoolProfile {
    /// Whether the pool implements the named capability
    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Top-level resources of the REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    AssociationTypes,
    Attributes,
    AttributeGroups,
    Categories,
    Channels,
    Currencies,
    Families,
    Locales,
    MeasureFamilies,
    MediaFiles,
    Products,
    ProductModels,
    PublishedProducts,
    AssetFamilies,
    ReferenceEntities,
}

impl ResourceKind {
    /// Every resource kind, in API reference order
    pub const ALL: [ResourceKind; 15] = [
        ResourceKind::AssociationTypes,
        ResourceKind::Attributes,
        ResourceKind::AttributeGroups,
        ResourceKind::Categories,
        ResourceKind::Channels,
        ResourceKind::Currencies,
        ResourceKind::Families,
        ResourceKind::Locales,
        ResourceKind::MeasureFamilies,
        ResourceKind::MediaFiles,
        ResourceKind::Products,
        ResourceKind::ProductModels,
        ResourceKind::PublishedProducts,
        ResourceKind::AssetFamilies,
        ResourceKind::ReferenceEntities,
    ];

    /// Path segment under the REST API root
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::AssociationTypes => "association-types",
            ResourceKind::Attributes => "attributes",
            ResourceKind::AttributeGroups => "attribute-groups",
            ResourceKind::Categories => "categories",
            ResourceKind::Channels => "channels",
            ResourceKind::Currencies => "currencies",
            ResourceKind::Families => "families",
            ResourceKind::Locales => "locales",
            ResourceKind::MeasureFamilies => "measure-families",
            ResourceKind::MediaFiles => "media-files",
            ResourceKind::Products => "products",
            ResourceKind::ProductModels => "product-models",
            ResourceKind::PublishedProducts => "published-products",
            ResourceKind::AssetFamilies => "asset-families",
            ResourceKind::ReferenceEntities => "reference-entities",
        }
    }

    /// Snake case name, e.g. `product_models`
    pub fn name(self) -> String {
        self.path().replace('-', "_")
    }

    /// Profile of the pool serving this kind
    pub fn profile(self) -> PoolProfile {
        match self {
            ResourceKind::AssociationTypes => AssociationTypesPool::PROFILE,
            ResourceKind::Attributes => AttributesPool::PROFILE,
            ResourceKind::AttributeGroups => AttributeGroupsPool::PROFILE,
            ResourceKind::Categories => CategoriesPool::PROFILE,
            ResourceKind::Channels => ChannelsPool::PROFILE,
            ResourceKind::Currencies => CurrenciesPool::PROFILE,
            ResourceKind::Families => FamiliesPool::PROFILE,
            ResourceKind::Locales => LocalesPool::PROFILE,
            ResourceKind::MeasureFamilies => MeasureFamiliesPool::PROFILE,
            ResourceKind::MediaFiles => MediaFilesPool::PROFILE,
            ResourceKind::Products => ProductsPool::PROFILE,
            ResourceKind::ProductModels => ProductModelsPool::PROFILE,
            ResourceKind::PublishedProducts => PublishedProductsPool::PROFILE,
            ResourceKind::AssetFamilies => AssetFamiliesPool::PROFILE,
            ResourceKind::ReferenceEntities => ReferenceEntitiesPool::PROFILE,
        }
    }

    /// Field holding the code of an item of this kind
    pub fn code_field(self) -> CodeField {
        self.profile().code_field
    }

    /// Pagination used when listing this kind
    pub fn pagination(self) -> ListPagination {
        self.profile().pagination
    }

    /// Whether single items can be fetched by code
    pub fn is_gettable(self) -> bool {
        self.profile().supports("Gettable")
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    /// Accepts the path (`product-models`) or the snake case name
    /// (`product_models`), case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.path() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.path()).collect();
                Error::invalid_value(
                    "resource",
                    format!("unknown resource '{}', expected one of: {}", s, known.join(", ")),
                )
            })
    }
}
