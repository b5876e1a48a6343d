//! Filter, sort and paginate catalog models

use model_registry_core::{Page, TextQuery};
use std::cmp::Ordering;

use crate::error::{CatalogError, CatalogResult};
use crate::model::CatalogModel;
use crate::provider::{CatalogOrderBy, ListModelsParams};

/// True when any searchable field of `model` contains the query
pub fn matches_query(model: &CatalogModel, query: &TextQuery) -> bool {
    let fields = [
        model.name.as_str(),
        model.description.as_deref().unwrap_or_default(),
        model.provider.as_deref().unwrap_or_default(),
        model.library_name.as_deref().unwrap_or_default(),
    ];
    query.matches_any(fields.into_iter().chain(model.tasks.iter().map(String::as_str)))
}

/// Ascending comparison of two models on `order_by`
pub fn compare_models(a: &CatalogModel, b: &CatalogModel, order_by: CatalogOrderBy) -> Ordering {
    match order_by {
        CatalogOrderBy::Name => a.name.cmp(&b.name),
        CatalogOrderBy::CreateTime => a.create_time().cmp(&b.create_time()),
        CatalogOrderBy::LastUpdateTime => a.last_update_time().cmp(&b.last_update_time()),
    }
}

/// Apply `params` to a set of models.
///
/// The sort is stable, so models with equal keys keep the order `models`
/// yields them in, in both directions.
pub fn list_models<'a>(
    models: impl IntoIterator<Item = &'a CatalogModel>,
    params: &ListModelsParams,
) -> CatalogResult<Page<CatalogModel>> {
    params
        .pagination
        .validate()
        .map_err(|e| CatalogError::InvalidArgument(e.to_string()))?;

    let query = TextQuery::new(params.query.as_deref());
    let mut matched: Vec<CatalogModel> = models
        .into_iter()
        .filter(|model| matches_query(model, &query))
        .cloned()
        .collect();

    matched.sort_by(|a, b| params.sort_order.apply(compare_models(a, b, params.order_by)));

    Ok(params.pagination.paginate(matched))
}
