//! Resource pools
//!
//! One pool per endpoint. The capability list of each pool mirrors what the
//! REST API allows on that endpoint.

use super::capabilities::{
    Creatable, Deletable, Gettable, Listable, Resource, Updatable, UpdatableList,
};
use super::types::{CodeField, ListPagination, PoolProfile};
use crate::error::Result;
use crate::http::{urljoin, HttpClient};
use crate::pagination::PageErrorPolicy;
use std::sync::Arc;

macro_rules! pool {
    (
        $(#[$meta:meta])*
        $name:ident, $field:ident, $paging:ident, [$($cap:ident),* $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            endpoint: String,
            client: Arc<HttpClient>,
            policy: PageErrorPolicy,
        }

        impl $name {
            /// Conventions and capabilities of this endpoint
            pub const PROFILE: PoolProfile = PoolProfile {
                code_field: CodeField::$field,
                pagination: ListPagination::$paging,
                capabilities: &[$(stringify!($cap)),*],
            };

            /// Create a pool for the given collection URL
            pub fn new(endpoint: impl Into<String>, client: Arc<HttpClient>) -> Self {
                Self {
                    endpoint: endpoint.into(),
                    client,
                    policy: PageErrorPolicy::default(),
                }
            }

            /// Set the failure policy of listing cursors
            #[must_use]
            pub fn with_policy(mut self, policy: PageErrorPolicy) -> Self {
                self.policy = policy;
                self
            }
        }

        impl Resource for $name {
            fn endpoint(&self) -> &str {
                &self.endpoint
            }

            fn client(&self) -> &Arc<HttpClient> {
                &self.client
            }

            fn code_field(&self) -> CodeField {
                Self::PROFILE.code_field
            }

            fn pagination(&self) -> ListPagination {
                Self::PROFILE.pagination
            }

            fn page_policy(&self) -> PageErrorPolicy {
                self.policy
            }
        }

        $(impl $cap for $name {})*

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("endpoint", &self.endpoint)
                    .field("policy", &self.policy)
                    .finish_non_exhaustive()
            }
        }
    };
}

pool!(
    /// Products
    ProductsPool, Identifier, SearchAfter,
    [Creatable, Deletable, Gettable, Listable, Updatable, UpdatableList]
);

pool!(
    /// Product models
    ///
    /// Keyed by `code`: product model documents carry no `identifier` field.
    ProductModelsPool, Code, SearchAfter,
    [Creatable, Gettable, Listable, Updatable]
);

pool!(
    /// Published products (Enterprise Edition, read-only)
    PublishedProductsPool, Identifier, SearchAfter,
    [Gettable, Listable]
);

pool!(
    /// Categories
    CategoriesPool, Code, Page,
    [Creatable, Gettable, Listable, Updatable, UpdatableList]
);

pool!(
    /// Families
    FamiliesPool, Code, Page,
    [Creatable, Deletable, Gettable, Listable, Updatable, UpdatableList]
);

pool!(
    /// Variants of one family
    FamilyVariantsPool, Code, Page,
    [Creatable, Gettable, Listable]
);

pool!(
    /// Attributes
    AttributesPool, Code, Page,
    [Creatable, Gettable, Listable, Updatable, UpdatableList]
);

pool!(
    /// Options of one select attribute
    AttributeOptionsPool, Code, Page,
    [Creatable, Gettable, Listable, Updatable]
);

pool!(
    /// Attribute groups
    AttributeGroupsPool, Code, Page,
    [Creatable, Gettable, Listable, Updatable, UpdatableList]
);

pool!(
    /// Association types
    AssociationTypesPool, Code, Page,
    [Creatable, Gettable, Listable, Updatable, UpdatableList]
);

pool!(
    /// Channels
    ChannelsPool, Code, Page,
    [Gettable, Listable, Updatable, UpdatableList]
);

pool!(
    /// Locales
    LocalesPool, Code, Page,
    [Gettable, Listable]
);

pool!(
    /// Currencies
    CurrenciesPool, Code, Page,
    [Creatable, Listable]
);

pool!(
    /// Measure families
    MeasureFamiliesPool, Code, Page,
    [Gettable, Listable]
);

pool!(
    /// Media files
    MediaFilesPool, Code, Page,
    [Creatable, Gettable, Listable]
);

pool!(
    /// Asset families
    AssetFamiliesPool, Code, Page,
    [Gettable, Listable, Updatable]
);

pool!(
    /// Assets of one asset family
    AssetsPool, Code, Page,
    [Deletable, Gettable, Listable, Updatable, UpdatableList]
);

pool!(
    /// Reference entities
    ReferenceEntitiesPool, Code, Page,
    [Gettable, Listable, Updatable]
);

pool!(
    /// Records of one reference entity
    ReferenceEntityRecordsPool, Code, Page,
    [Gettable, Listable, Updatable, UpdatableList]
);

pool!(
    /// Attributes of one reference entity
    ReferenceEntityAttributesPool, Code, Page,
    [Gettable, Listable, Updatable]
);

pool!(
    /// Options of one reference entity attribute
    ReferenceEntityAttributeOptionsPool, Code, Page,
    [Gettable, Listable, Updatable]
);

/// Collection URL nested under one item of `parent`
fn child_endpoint(parent: &impl Resource, code: &str, segment: &str) -> Result<String> {
    Ok(urljoin(&parent.item_url(code)?, &[segment]))
}

impl FamiliesPool {
    /// Variants of the family `code`
    pub fn variants(&self, code: &str) -> Result<FamilyVariantsPool> {
        let endpoint = child_endpoint(self, code, "variants")?;
        Ok(FamilyVariantsPool::new(endpoint, self.client.clone()).with_policy(self.policy))
    }
}

impl AttributesPool {
    /// Options of the attribute `code`
    pub fn options(&self, code: &str) -> Result<AttributeOptionsPool> {
        let endpoint = child_endpoint(self, code, "options")?;
        Ok(AttributeOptionsPool::new(endpoint, self.client.clone()).with_policy(self.policy))
    }
}

impl AssetFamiliesPool {
    /// Assets of the asset family `code`
    pub fn assets(&self, code: &str) -> Result<AssetsPool> {
        let endpoint = child_endpoint(self, code, "assets")?;
        Ok(AssetsPool::new(endpoint, self.client.clone()).with_policy(self.policy))
    }
}

impl ReferenceEntitiesPool {
    /// Records of the reference entity `code`
    pub fn records(&self, code: &str) -> Result<ReferenceEntityRecordsPool> {
        let endpoint = child_endpoint(self, code, "records")?;
        Ok(ReferenceEntityRecordsPool::new(endpoint, self.client.clone()).with_policy(self.policy))
    }

    /// Attributes of the reference entity `code`
    pub fn attributes(&self, code: &str) -> Result<ReferenceEntityAttributesPool> {
        let endpoint = child_endpoint(self, code, "attributes")?;
        Ok(ReferenceEntityAttributesPool::new(endpoint, self.client.clone())
            .with_policy(self.policy))
    }
}

impl ReferenceEntityAttributesPool {
    /// Options of the reference entity attribute `code`
    pub fn options(&self, code: &str) -> Result<ReferenceEntityAttributeOptionsPool> {
        let endpoint = child_endpoint(self, code, "options")?;
        Ok(ReferenceEntityAttributeOptionsPool::new(endpoint, self.client.clone())
            .with_policy(self.policy))
    }
}
