pub use self::actions::Action;
pub use self::backend::Backend;
pub use self::cache::{ContextCache, ContextDetail, ContextList, NamespaceListCache, ResourceSummary};
pub use self::dispatcher::Dispatcher;
pub use self::errors::FetchError;
pub use self::fetcher::ResourceFetcher;
pub use self::query::{
    QueryData, QueryWithLocation, ResourceQuery, ResourceQueryResults, ResultsPath, resource_query_key,
};
pub use self::related::{EVENTS_QUERY, PODS_QUERY};
pub use self::selection::{
    ListPageSelection, NamespaceSelection, OVERVIEW_TITLE, ObjectSelection, QueryScope, Selection,
};
pub use self::state::State;
pub use self::store::QueryStore;

mod actions;
mod backend;
mod cache;
mod dispatcher;
mod errors;
mod fetcher;
#[cfg(test)]
mod mock;
mod query;
mod related;
mod selection;
mod state;
mod store;
