use kui_kube::ResourceScope;

/// Title of the list page that shows all resources in the selected scope.
pub const OVERVIEW_TITLE: &str = "Overview";

/// Which objects are browsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryScope {
    #[default]
    SingleNamespace,
    AllNamespaces,
    ClusterObjects,
}

impl QueryScope {
    /// Returns scope of the resources that can be listed in this query scope.
    pub fn resource_scope(self) -> ResourceScope {
        match self {
            QueryScope::ClusterObjects => ResourceScope::Cluster,
            QueryScope::SingleNamespace | QueryScope::AllNamespaces => ResourceScope::Namespaced,
        }
    }
}

/// Selected namespace scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceSelection {
    pub scope: QueryScope,
    pub namespace: String,
}

impl NamespaceSelection {
    /// Selects objects from one namespace.
    pub fn single(namespace: impl Into<String>) -> Self {
        Self {
            scope: QueryScope::SingleNamespace,
            namespace: namespace.into(),
        }
    }

    /// Selects namespaced objects from all namespaces.
    pub fn all() -> Self {
        Self {
            scope: QueryScope::AllNamespaces,
            namespace: String::new(),
        }
    }

    /// Selects cluster scoped objects.
    pub fn cluster() -> Self {
        Self {
            scope: QueryScope::ClusterObjects,
            namespace: String::new(),
        }
    }

    /// Returns `true` if the selection is complete, i.e. a namespace is chosen for the single namespace scope.
    pub fn is_selected(&self) -> bool {
        self.scope != QueryScope::SingleNamespace || !self.namespace.is_empty()
    }
}

/// Selected list page: resources listed together under one title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPageSelection {
    pub title: String,
    pub resources: Vec<String>,
}

impl ListPageSelection {
    /// Creates new [`ListPageSelection`] instance.
    pub fn new(title: impl Into<String>, resources: Vec<String>) -> Self {
        Self {
            title: title.into(),
            resources,
        }
    }
}

/// Selected single object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSelection {
    pub resource: String,
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectSelection {
    /// Creates new [`ObjectSelection`] instance.
    pub fn new(resource: impl Into<String>, namespace: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            namespace: namespace.filter(|n| !n.is_empty()).map(String::from),
            name: name.into(),
        }
    }
}

/// Everything user has currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub context: Option<String>,
    pub namespace: Option<NamespaceSelection>,
    pub list: Option<ListPageSelection>,
    pub object: Option<ObjectSelection>,
}
