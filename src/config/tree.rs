//! Key-path navigation over a loaded configuration document.

use serde_yaml::Value;

/// A parsed configuration document.
pub type ConfigTree = Value;

/// Render a key path for diagnostics, e.g. `app > smtp > host`.
pub fn path_to_string(path: &[&str]) -> String {
    path.join(" > ")
}

/// Check whether every key of `path` exists in `tree`.
///
/// An empty path always exists. A scalar or sequence encountered before the
/// path is exhausted counts as "key not found".
pub fn path_exists(tree: Option<&Value>, path: &[&str]) -> bool {
    match path.split_first() {
        None => true,
        Some((key, rest)) => match tree.and_then(|node| child(node, key)) {
            Some(next) => path_exists(Some(next), rest),
            None => false,
        },
    }
}

/// Get the node at `path`, or `None` if any key along the way is missing.
pub fn get_value<'a>(tree: &'a Value, path: &[&str]) -> Option<&'a Value> {
    match path.split_first() {
        None => Some(tree),
        Some((key, rest)) => get_value(child(tree, key)?, rest),
    }
}

/// Mutable variant of [`get_value`].
pub fn get_value_mut<'a>(tree: &'a mut Value, path: &[&str]) -> Option<&'a mut Value> {
    match path.split_first() {
        None => Some(tree),
        Some((key, rest)) => get_value_mut(tree.as_mapping_mut()?.get_mut(*key)?, rest),
    }
}

fn child<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    node.as_mapping()?.get(key)
}
