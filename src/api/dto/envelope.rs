//! Response envelopes shared by every resource.
//!
//! Single resources are wrapped as `{"data": {...}}`, collections as
//! `{"data": [...]}` and paginated collections add
//! `{"meta": {"pagination": {...}}}`.

use serde::Serialize;

use crate::domain::query::Page;

/// Maps a domain value to its wire representation.
pub trait Transformer<T> {
    type Output: Serialize;

    fn transform(&self, value: T) -> Self::Output;
}

#[derive(Debug, Serialize)]
pub struct ItemResponse<O> {
    pub data: O,
}

#[derive(Debug, Serialize)]
pub struct CollectionResponse<O> {
    pub data: Vec<O>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<CollectionMeta>,
}

#[derive(Debug, Serialize)]
pub struct CollectionMeta {
    pub pagination: PaginationMeta,
}

/// Pagination block of a paginated collection.
///
/// `count` is the number of items on this page, `per_page` the requested size.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub count: usize,
    pub per_page: u32,
    pub current_page: u32,
    pub total_pages: u32,
}

pub fn item<T, X>(value: T, transformer: &X) -> ItemResponse<X::Output>
where
    X: Transformer<T>,
{
    ItemResponse {
        data: transformer.transform(value),
    }
}

pub fn collection<T, X, I>(values: I, transformer: &X) -> CollectionResponse<X::Output>
where
    X: Transformer<T>,
    I: IntoIterator<Item = T>,
{
    CollectionResponse {
        data: values
            .into_iter()
            .map(|value| transformer.transform(value))
            .collect(),
        meta: None,
    }
}

pub fn paginated<T, X>(page: Page<T>, transformer: &X) -> CollectionResponse<X::Output>
where
    X: Transformer<T>,
{
    let pagination = PaginationMeta {
        total: page.total,
        count: page.items.len(),
        per_page: page.page_size,
        current_page: page.page,
        total_pages: page.total_pages(),
    };

    CollectionResponse {
        meta: Some(CollectionMeta { pagination }),
        ..collection(page.items, transformer)
    }
}
