use kui_common::StateChangeTracker;
use kui_kube::{NAMESPACES, ResourceList};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::related::related_queries;
use crate::{
    Action, ContextCache, FetchError, NamespaceListCache, QueryData, QueryScope, QueryWithLocation, ResourceFetcher,
    ResourceQuery, ResourceQueryResults, ResultsPath, Selection, State,
};

#[cfg(test)]
#[path = "./dispatcher.tests.rs"]
mod dispatcher_tests;

/// Result of the background fetch.
enum FetchResult {
    /// Context detail or namespace list, applied only if still awaited.
    Context(Action),

    /// Query result, applied only if the store generation did not change.
    Query { generation: u64, action: Action },
}

/// Part of the selection that scopes the query store.
#[derive(Debug, Default, PartialEq)]
struct SelectionScope {
    context: Option<String>,
    scope: Option<QueryScope>,
    namespace: Option<String>,
}

impl From<&Selection> for SelectionScope {
    fn from(value: &Selection) -> Self {
        Self {
            context: value.context.clone(),
            scope: value.namespace.as_ref().map(|n| n.scope),
            namespace: value.namespace.as_ref().map(|n| n.namespace.clone()),
        }
    }
}

/// Applies actions to the [`State`] and fetches data the selection needs.\
/// **Note** that fetches run on the provided runtime, their results are applied by [`Dispatcher::process_results`]
/// or [`Dispatcher::next_result`] on the thread that owns the dispatcher.
pub struct Dispatcher<F: ResourceFetcher> {
    fetcher: Arc<F>,
    runtime: Handle,
    state: State,
    scope: StateChangeTracker<SelectionScope>,
    cancellation_token: CancellationToken,
    results_tx: UnboundedSender<FetchResult>,
    results_rx: UnboundedReceiver<FetchResult>,
}

impl<F: ResourceFetcher> Dispatcher<F> {
    /// Creates new [`Dispatcher`] instance.
    pub fn new(fetcher: Arc<F>, runtime: Handle) -> Self {
        let (results_tx, results_rx) = unbounded_channel();
        Self {
            fetcher,
            runtime,
            state: State::default(),
            scope: StateChangeTracker::new(Some(SelectionScope::default())),
            cancellation_token: CancellationToken::new(),
            results_tx,
            results_rx,
        }
    }

    /// Returns current state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns results kept in the `location`.
    pub fn results(&self, location: &ResultsPath) -> Option<&ResourceQueryResults> {
        self.state.store.get(location)
    }

    /// Returns primary query results for the query `key`.
    pub fn results_for_key(&self, key: &str) -> Option<&ResourceQueryResults> {
        self.state.store.get_by_key(key)
    }

    /// Drops all query results, so they will be fetched again.
    pub fn clear_cache(&mut self) {
        self.dispatch(Action::ClearCache);
    }

    /// Returns `true` if nothing is being loaded.
    pub fn is_settled(&self) -> bool {
        !self.state.is_context_loading() && !self.state.store.is_loading()
    }

    /// Applies the `action` and all actions that follow from it.
    pub fn dispatch(&mut self, action: Action) {
        let mut pending = VecDeque::from([action]);
        while let Some(action) = pending.pop_front() {
            let related = self.related_queries(&action);
            if matches!(action, Action::ClearCache) {
                self.cancel_fetches();
            }

            self.state.reduce(action);

            if !related.is_empty() {
                self.fetch(&related);
                pending.push_back(Action::StartQueries(related));
            }

            if let Some(action) = self.watch_state() {
                pending.push_back(action);
            }
        }
    }

    /// Applies all results of the already finished fetches and returns how many were received.
    pub fn process_results(&mut self) -> usize {
        let mut count = 0;
        while let Ok(result) = self.results_rx.try_recv() {
            self.apply(result);
            count += 1;
        }

        count
    }

    /// Waits for the next fetch to finish and applies its result.
    pub async fn next_result(&mut self) -> bool {
        match self.results_rx.recv().await {
            Some(result) => {
                self.apply(result);
                true
            },
            None => false,
        }
    }

    /// Applies fetch results until nothing is being loaded.
    pub async fn run_until_settled(&mut self) {
        while !self.is_settled() {
            if !self.next_result().await {
                break;
            }
        }
    }

    /// Decides what must be fetched for the current state and starts fetching it.\
    /// Returns action that must be applied next, if any.
    fn watch_state(&mut self) -> Option<Action> {
        if self.scope.changed(SelectionScope::from(&self.state.selection)).is_some() {
            return Some(Action::ClearCache);
        }

        let context = self.state.context()?.to_owned();
        if self
            .state
            .context_cache
            .as_ref()
            .is_none_or(|c| c.context_name != context)
        {
            self.load_context(&context);
            return Some(Action::StartContextLoad(
                ContextCache::loading(&context),
                NamespaceListCache::loading(&context),
            ));
        }

        if self.state.is_context_loading() || self.state.has_context_error() {
            return None;
        }

        let mut queries = Vec::new();
        if let Some(list) = self.state.list_page_selection() {
            for resource in &list.resources {
                push_missing(&self.state, &mut queries, self.state.list_query(resource));
            }
        }

        if let Some(object) = self.state.object_selection() {
            push_missing(&self.state, &mut queries, self.state.object_query(object));
        }

        if queries.is_empty() {
            None
        } else {
            self.fetch(&queries);
            Some(Action::StartQueries(queries))
        }
    }

    /// Returns secondary queries for the primary object that has just been fetched.
    fn related_queries(&self, action: &Action) -> Vec<QueryWithLocation> {
        let Action::DataResult(location, results) = action else {
            return Vec::new();
        };

        if !location.is_primary() || !results.query.is_object() {
            return Vec::new();
        }

        let Some(item) = results.results.as_ref().and_then(QueryData::object) else {
            return Vec::new();
        };

        let Some(detail) = self.state.context_detail() else {
            return Vec::new();
        };

        related_queries(detail, &results.query.context, &location.path, item)
            .into_iter()
            .filter(|q| !self.state.store.has(&q.location))
            .collect()
    }

    fn fetch(&self, queries: &[QueryWithLocation]) {
        let generation = self.state.store.generation();
        for QueryWithLocation { location, query } in queries.iter().cloned() {
            debug!("Fetching '{}' ({})", location.path, location.query_name);
            let fetcher = Arc::clone(&self.fetcher);
            let results_tx = self.results_tx.clone();
            let cancellation_token = self.cancellation_token.clone();
            let runtime = self.runtime.clone();

            self.runtime.spawn(async move {
                let task = runtime.spawn({
                    let query = query.clone();
                    async move { fetch_query(fetcher.as_ref(), &query).await }
                });
                let abort_handle = task.abort_handle();

                tokio::select! {
                    () = cancellation_token.cancelled() => abort_handle.abort(),
                    result = task => {
                        let result = result.unwrap_or_else(task_failed);
                        if let Err(error) = &result {
                            if error.is_auth() {
                                debug!("No access to '{}': {}", location.path, error);
                            } else {
                                warn!("Cannot fetch '{}' ({}): {}", location.path, location.query_name, error);
                            }
                        }

                        let results = ResourceQueryResults::finished(query, result);
                        let action = Action::DataResult(location, results);
                        let _ = results_tx.send(FetchResult::Query { generation, action });
                    },
                }
            });
        }
    }

    fn load_context(&self, context: &str) {
        debug!("Loading context '{}'", context);

        let fetcher = Arc::clone(&self.fetcher);
        let results_tx = self.results_tx.clone();
        let runtime = self.runtime.clone();
        let name = context.to_owned();
        self.runtime.spawn(async move {
            let detail = runtime
                .spawn({
                    let name = name.clone();
                    async move { fetcher.get_context(&name).await }
                })
                .await
                .unwrap_or_else(task_failed);
            if let Err(error) = &detail {
                warn!("Cannot load context '{}': {}", name, error);
            }

            let action = Action::ContextDetail(ContextCache::finished(&name, detail));
            let _ = results_tx.send(FetchResult::Context(action));
        });

        let fetcher = Arc::clone(&self.fetcher);
        let results_tx = self.results_tx.clone();
        let runtime = self.runtime.clone();
        let name = context.to_owned();
        self.runtime.spawn(async move {
            let namespaces = runtime
                .spawn({
                    let name = name.clone();
                    async move { fetcher.list_resources(&name, NAMESPACES, None, &BTreeMap::new()).await }
                })
                .await
                .unwrap_or_else(task_failed)
                .map(|list| namespace_names(&list));
            if let Err(error) = &namespaces {
                warn!("Cannot list namespaces of context '{}': {}", name, error);
            }

            let action = Action::NamespaceList(NamespaceListCache::finished(&name, namespaces));
            let _ = results_tx.send(FetchResult::Context(action));
        });
    }

    fn apply(&mut self, result: FetchResult) {
        match result {
            FetchResult::Context(action) => {
                if self.is_awaited(&action) {
                    self.dispatch(action);
                } else {
                    debug!("Dropping context result that is no longer awaited");
                }
            },
            FetchResult::Query { generation, action } => {
                if generation == self.state.store.generation() {
                    self.dispatch(action);
                } else {
                    debug!("Dropping query result from generation {}", generation);
                }
            },
        }
    }

    fn is_awaited(&self, action: &Action) -> bool {
        match action {
            Action::ContextDetail(detail) => self
                .state
                .context_cache
                .as_ref()
                .is_some_and(|c| c.loading && c.context_name == detail.context_name),
            Action::NamespaceList(namespaces) => self
                .state
                .namespace_cache
                .as_ref()
                .is_some_and(|n| n.loading && n.context_name == namespaces.context_name),
            _ => false,
        }
    }

    fn cancel_fetches(&mut self) {
        self.cancellation_token.cancel();
        self.cancellation_token = CancellationToken::new();
    }
}

impl<F: ResourceFetcher> Drop for Dispatcher<F> {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

fn push_missing(state: &State, queries: &mut Vec<QueryWithLocation>, query: ResourceQuery) {
    let location = ResultsPath::primary(query.key());
    if !state.store.has(&location) && queries.iter().all(|q| q.location != location) {
        queries.push(QueryWithLocation::new(location, query));
    }
}

async fn fetch_query<F: ResourceFetcher>(fetcher: &F, query: &ResourceQuery) -> Result<QueryData, FetchError> {
    let namespace = query.namespace.as_deref();
    match query.object_id.as_deref().filter(|o| !o.is_empty()) {
        Some(name) => fetcher
            .get_resource(&query.context, &query.resource, namespace, name, &query.params)
            .await
            .map(QueryData::Object),
        None => fetcher
            .list_resources(&query.context, &query.resource, namespace, &query.params)
            .await
            .map(QueryData::List),
    }
}

/// Turns a panicked or aborted fetch task into an error, so its query does not stay loading.
fn task_failed<T>(error: JoinError) -> Result<T, FetchError> {
    Err(FetchError::Client(format!("fetch task failed: {error}")))
}

fn namespace_names(list: &ResourceList) -> Vec<String> {
    list.items
        .iter()
        .filter_map(|item| item.get("metadata")?.get("name")?.as_str())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
