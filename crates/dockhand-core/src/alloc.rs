//! Hash collections for dockhand's lookup tables.
//!
//! Name registries, node indexes and visibility caches all key on small
//! handles or strings; they share one AHash based hasher.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_index_reuses_freed_names() {
        let mut names: HashMap<String, u64> = HashMap::new();
        names.insert("editor".to_string(), 1);
        names.insert("console".to_string(), 2);

        assert_eq!(names.remove("console"), Some(2));
        assert!(names.insert("console".to_string(), 3).is_none());

        assert_eq!(names.get("console"), Some(&3));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_duplicate_names_are_detected() {
        let mut seen = HashSet::default();
        let tabs = ["editor", "outline", "editor"];
        let duplicate = tabs.iter().find(|name| !seen.insert(name.to_string()));
        assert_eq!(duplicate, Some(&"editor"));
    }

    #[test]
    fn test_shared_hasher_builds_maps() {
        let state = RandomState::new();
        let mut visibility: HashMap<u64, bool> = HashMap::with_hasher(state);
        visibility.insert(7, true);
        *visibility.entry(7).or_insert(false) = false;
        assert_eq!(visibility.get(&7), Some(&false));
    }
}
