use crate::{
    Action, ContextCache, ContextDetail, ListPageSelection, NamespaceListCache, NamespaceSelection, OVERVIEW_TITLE,
    ObjectSelection, QueryScope, QueryStore, ResourceQuery, ResourceQueryResults, ResultsPath, Selection,
    resource_query_key,
};

#[cfg(test)]
#[path = "./state.tests.rs"]
mod state_tests;

/// Everything the views read: the selection, cached context data and query results.
#[derive(Debug, Default)]
pub struct State {
    pub selection: Selection,
    pub context_cache: Option<ContextCache>,
    pub namespace_cache: Option<NamespaceListCache>,
    pub store: QueryStore,
}

impl State {
    /// Applies the `action` to the state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::SelectContext(context) => {
                self.selection = Selection {
                    context: Some(context).filter(|c| !c.is_empty()),
                    namespace: Some(NamespaceSelection::single("")),
                    list: None,
                    object: None,
                };
            },
            Action::SelectNamespace(namespace) => self.selection.namespace = Some(namespace),
            Action::SelectListPage(list) => self.selection.list = list,
            Action::SelectObject(object) => self.selection.object = object,
            Action::StartContextLoad(context, namespaces) => {
                self.context_cache = Some(context);
                self.namespace_cache = Some(namespaces);
            },
            Action::ContextDetail(context) => self.context_cache = Some(context),
            Action::NamespaceList(namespaces) => self.namespace_cache = Some(namespaces),
            Action::StartQueries(queries) => self.store.start(&queries),
            Action::DataResult(location, results) => self.store.set(&location, results),
            Action::ClearCache => self.store.clear(),
        }
    }

    /// Returns selected context name.
    pub fn context(&self) -> Option<&str> {
        self.selection.context.as_deref()
    }

    /// Returns `true` if context is selected together with a complete namespace selection.
    pub fn is_namespace_selected(&self) -> bool {
        self.context().is_some() && self.selection.namespace.as_ref().is_some_and(NamespaceSelection::is_selected)
    }

    /// Returns detail of the selected context if it is loaded.
    pub fn context_detail(&self) -> Option<&ContextDetail> {
        self.context_cache
            .as_ref()
            .filter(|c| Some(c.context_name.as_str()) == self.context())
            .and_then(|c| c.detail.as_ref())
    }

    /// Returns `true` if context detail or namespace list is loading.
    pub fn is_context_loading(&self) -> bool {
        self.context_cache.as_ref().is_some_and(|c| c.loading)
            || self.namespace_cache.as_ref().is_some_and(|n| n.loading)
    }

    /// Returns `true` if context detail or namespace list failed to load.
    pub fn has_context_error(&self) -> bool {
        self.context_cache.as_ref().is_some_and(|c| c.err.is_some())
            || self.namespace_cache.as_ref().is_some_and(|n| n.err.is_some())
    }

    /// Returns selected list page, the overview of all resources in the selected scope if none is selected.
    pub fn list_page_selection(&self) -> Option<ListPageSelection> {
        if !self.is_namespace_selected() {
            return None;
        }

        let detail = self.context_detail()?;
        if let Some(list) = &self.selection.list {
            return Some(list.clone());
        }

        let resources = detail.resources_in(self.scope()).into_iter().map(String::from).collect();
        Some(ListPageSelection::new(OVERVIEW_TITLE, resources))
    }

    /// Returns selected object if context detail is loaded.
    pub fn object_selection(&self) -> Option<&ObjectSelection> {
        self.context_detail()?;
        self.selection.object.as_ref()
    }

    /// Returns query that lists the `resource` in the selected namespace scope.\
    /// **Note** that namespace is used only for namespaced resources in the single namespace scope.
    pub fn list_query(&self, resource: &str) -> ResourceQuery {
        let is_cluster_resource = self
            .context_detail()
            .and_then(|d| d.resource(resource))
            .is_some_and(|r| r.is_cluster_resource);
        let namespace = self
            .selection
            .namespace
            .as_ref()
            .filter(|n| !is_cluster_resource && n.scope == QueryScope::SingleNamespace)
            .map(|n| n.namespace.as_str());

        ResourceQuery::list(self.context().unwrap_or_default(), resource, namespace)
    }

    /// Returns query for the selected object.
    pub fn object_query(&self, object: &ObjectSelection) -> ResourceQuery {
        ResourceQuery::object(
            self.context().unwrap_or_default(),
            &object.resource,
            object.namespace.as_deref(),
            &object.name,
        )
    }

    /// Returns query key of the `resource` list in the selected namespace scope.
    pub fn list_query_key(&self, resource: &str) -> String {
        self.list_query(resource).key()
    }

    /// Returns query key of the selected object.
    pub fn detail_query_key(&self) -> String {
        match self.object_selection() {
            Some(object) => self.object_query(object).key(),
            None => resource_query_key(self.context().unwrap_or_default(), "", None, None),
        }
    }

    /// Returns results kept in the `location`.
    pub fn results(&self, location: &ResultsPath) -> Option<&ResourceQueryResults> {
        self.store.get(location)
    }

    fn scope(&self) -> QueryScope {
        self.selection.namespace.as_ref().map(|n| n.scope).unwrap_or_default()
    }
}
