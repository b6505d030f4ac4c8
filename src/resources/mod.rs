//! Resource module
//!
//! Typed handles ("pools") on the REST endpoints of an Akeneo instance.
//!
//! # Overview
//!
//! Every pool implements [`Resource`] and the capability traits its
//! endpoint supports: [`Creatable`], [`Gettable`], [`Listable`],
//! [`Updatable`], [`UpdatableList`] and [`Deletable`]. Listings return a
//! [`ResultCursor`](crate::pagination::ResultCursor).

mod capabilities;
mod pools;
mod types;

pub use capabilities::{
    Creatable, Deletable, Gettable, Listable, Resource, Updatable, UpdatableList,
    PAGINATION_TYPE_PARAM,
};
pub use pools::{
    AssetFamiliesPool, AssetsPool, AssociationTypesPool, AttributeGroupsPool,
    AttributeOptionsPool, AttributesPool, CategoriesPool, ChannelsPool, CurrenciesPool,
    FamiliesPool, FamilyVariantsPool, LocalesPool, MeasureFamiliesPool, MediaFilesPool,
    ProductModelsPool, ProductsPool, PublishedProductsPool, ReferenceEntitiesPool,
    ReferenceEntityAttributeOptionsPool, ReferenceEntityAttributesPool,
    ReferenceEntityRecordsPool,
};
pub use types::{CodeField, ListPagination, PoolProfile, ResourceKind};
