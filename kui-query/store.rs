use std::collections::HashMap;

use crate::{QueryWithLocation, ResourceQueryResults, ResultsPath};

#[cfg(test)]
#[path = "./store.tests.rs"]
mod store_tests;

/// Results of all queries for the selected context and namespace scope.\
/// **Note** that every [`QueryStore::clear`] starts a new generation, results of the older ones must be discarded.
#[derive(Debug, Default)]
pub struct QueryStore {
    data: HashMap<String, HashMap<String, ResourceQueryResults>>,
    generation: u64,
}

impl QueryStore {
    /// Returns current store generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns results kept in the `location`.
    pub fn get(&self, location: &ResultsPath) -> Option<&ResourceQueryResults> {
        self.data.get(&location.path)?.get(&location.query_name)
    }

    /// Returns `true` if there are results (also loading or failed ones) in the `location`.
    pub fn has(&self, location: &ResultsPath) -> bool {
        self.get(location).is_some()
    }

    /// Returns primary query results kept under the query `key`.
    pub fn get_by_key(&self, key: &str) -> Option<&ResourceQueryResults> {
        self.data.get(key)?.get("")
    }

    /// Marks all `queries` as loading.
    pub fn start(&mut self, queries: &[QueryWithLocation]) {
        for query in queries {
            self.set(&query.location, ResourceQueryResults::loading(query.query.clone()));
        }
    }

    /// Stores `results` in the `location`, replacing what was there.
    pub fn set(&mut self, location: &ResultsPath, results: ResourceQueryResults) {
        self.data
            .entry(location.path.clone())
            .or_default()
            .insert(location.query_name.clone(), results);
    }

    /// Removes all results and starts a new generation.
    pub fn clear(&mut self) {
        self.data.clear();
        self.generation += 1;
    }

    /// Returns `true` if any query is still loading.
    pub fn is_loading(&self) -> bool {
        self.data.values().flat_map(HashMap::values).any(|r| r.loading)
    }

    /// Returns number of stored results.
    pub fn len(&self) -> usize {
        self.data.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
