use crate::{
    ContextCache, ListPageSelection, NamespaceListCache, NamespaceSelection, ObjectSelection, QueryWithLocation,
    ResourceQueryResults, ResultsPath,
};

/// List of all possible actions that change the [`State`](crate::State).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User selected a context, the namespace selection is reset.
    SelectContext(String),

    /// User selected a namespace scope.
    SelectNamespace(NamespaceSelection),

    /// User selected a list page or, with `None`, the overview of all resources in scope.
    SelectListPage(Option<ListPageSelection>),

    /// User selected a single object or cleared the selection.
    SelectObject(Option<ObjectSelection>),

    /// Context detail and namespace list started to load.
    StartContextLoad(ContextCache, NamespaceListCache),

    /// Context detail was loaded.
    ContextDetail(ContextCache),

    /// Namespace list was loaded.
    NamespaceList(NamespaceListCache),

    /// Queries started to load.
    StartQueries(Vec<QueryWithLocation>),

    /// Query finished.
    DataResult(ResultsPath, ResourceQueryResults),

    /// All query results are dropped.
    ClearCache,
}
