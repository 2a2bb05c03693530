//! Depth-first search for the object that owns a key.
//!
//! [`find_object_with_name`] answers "which object has a field called
//! `name`?", not "what is the value of `name`?". Entries are visited in
//! insertion order; a nested object is searched before the siblings that
//! follow it. Arrays are not descended into.
//!
//! Keys need not be unique across nesting levels. When several objects
//! contain `name`, the first one reached by this traversal is returned,
//! which is not necessarily the shallowest.

use serde_json::Value;

/// Find the object that directly contains `name`.
///
/// ```
/// use serde_json::json;
/// use jsonmore_core::find_object_with_name;
///
/// let root = json!({"a": {"b": 1}, "name": "x"});
/// assert_eq!(find_object_with_name(&root, "name"), Some(&root));
/// assert_eq!(find_object_with_name(&root, "b"), Some(&json!({"b": 1})));
/// assert_eq!(find_object_with_name(&root, "zzz"), None);
/// ```
pub fn find_object_with_name<'a>(root: &'a Value, name: &str) -> Option<&'a Value> {
    let map = root.as_object()?;
    for (key, child) in map {
        if key == name {
            return Some(root);
        }
        if child.is_object() {
            if let Some(found) = find_object_with_name(child, name) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable form of [`find_object_with_name`], for updating the owning
/// object in place.
pub fn find_object_with_name_mut<'a>(root: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    let path = owner_path(root, name)?;
    let mut node = root;
    for key in path {
        node = node.get_mut(key.as_str())?;
    }
    Some(node)
}

/// Keys leading from `root` to the owning object, found with the same
/// traversal as [`find_object_with_name`].
fn owner_path(root: &Value, name: &str) -> Option<Vec<String>> {
    let map = root.as_object()?;
    for (key, child) in map {
        if key == name {
            return Some(Vec::new());
        }
        if child.is_object() {
            if let Some(mut path) = owner_path(child, name) {
                path.insert(0, key.clone());
                return Some(path);
            }
        }
    }
    None
}
