//! Output shape: the skeleton of containers mirroring every field path.
//!
//! The skeleton is built once while compiling, with [`Value::None`] in every
//! leaf slot. Each parse clones it and fills the clone.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::TemplateSyntaxError;
use crate::models::{Key, Value};
use crate::template::{FieldPath, PathStep};

/// An empty skeleton.
pub(crate) fn root() -> Value {
    Value::Map(IndexMap::new())
}

/// Add a field path to the skeleton, creating missing levels.
///
/// Fails when the path needs a different kind of container than an earlier
/// path created at the same place. Repeating an existing leaf path is allowed.
pub(crate) fn insert(root: &mut Value, path: &FieldPath) -> Result<(), TemplateSyntaxError> {
    let steps = path.steps();
    let mut node = root;

    for (depth, step) in steps.iter().enumerate() {
        let rest = &steps[depth + 1..];
        node = match (node, step) {
            (Value::Map(map), PathStep::Index(key)) => match map.entry(key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(build(rest));
                    return Ok(());
                }
                Entry::Occupied(slot) => slot.into_mut(),
            },
            (Value::Object(attrs), PathStep::Attribute(name)) => match attrs.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(build(rest));
                    return Ok(());
                }
                Entry::Occupied(slot) => slot.into_mut(),
            },
            (_, step) => return Err(incompatible(path, step)),
        };
    }

    if node.is_container() {
        // The path stops where an earlier path kept going.
        if let Some(last) = steps.last() {
            return Err(incompatible(path, last));
        }
    }
    Ok(())
}

fn incompatible(path: &FieldPath, step: &PathStep) -> TemplateSyntaxError {
    TemplateSyntaxError::IncompatiblePath {
        field: path.to_string(),
        step: step.to_string(),
    }
}

/// Nested containers for the remaining steps, with an empty leaf at the end.
fn build(steps: &[PathStep]) -> Value {
    steps.iter().rev().fold(Value::None, |top, step| match step {
        PathStep::Index(key) => Value::Map(IndexMap::from([(key.clone(), top)])),
        PathStep::Attribute(name) => Value::Object(IndexMap::from([(name.clone(), top)])),
    })
}

/// Turn every map whose keys are exactly the indices `0..n` into a list.
///
/// Children are normalized before their parent, so nested maps convert too.
/// Applying it twice changes nothing.
pub(crate) fn normalize(value: Value) -> Value {
    match value {
        Value::Map(map) => {
            let map: IndexMap<_, _> = map.into_iter().map(|(k, v)| (k, normalize(v))).collect();
            if !is_sequence(&map) {
                return Value::Map(map);
            }
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by_key(|(key, _)| key.as_index());
            Value::List(entries.into_iter().map(|(_, v)| v).collect())
        }
        Value::Object(attrs) => Value::Object(
            attrs
                .into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .collect(),
        ),
        Value::List(items) => Value::List(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

fn is_sequence(map: &IndexMap<Key, Value>) -> bool {
    if map.is_empty() {
        return false;
    }
    let mut seen = vec![false; map.len()];
    for key in map.keys() {
        match key.as_index() {
            Some(i) if i < seen.len() && !seen[i] => seen[i] = true,
            _ => return false,
        }
    }
    true
}

/// Store a value in the leaf addressed by `path`.
///
/// Returns `false` when the leaf already holds a value; the first field
/// written to a slot wins.
pub(crate) fn populate(root: &mut Value, path: &FieldPath, value: Value) -> bool {
    let mut node = root;

    for step in path.steps() {
        let next = match (node, step) {
            (Value::Map(map), PathStep::Index(key)) => map.get_mut(key),
            (Value::List(items), PathStep::Index(key)) => {
                key.as_index().and_then(|i| items.get_mut(i))
            }
            (Value::Object(attrs), PathStep::Attribute(name)) => attrs.get_mut(name),
            _ => None,
        };
        match next {
            Some(child) => node = child,
            None => return false,
        }
    }

    if node.is_none() {
        *node = value;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn skeleton(names: &[&str]) -> Result<Value, TemplateSyntaxError> {
        let mut shape = root();
        for name in names {
            insert(&mut shape, &FieldPath::parse(name).unwrap())?;
        }
        Ok(normalize(shape))
    }

    #[test]
    fn test_positional_fields_become_list() {
        assert_eq!(
            skeleton(&["1", "0"]).unwrap(),
            Value::List(vec![Value::None, Value::None])
        );
    }

    #[test]
    fn test_named_fields_stay_map() {
        let shape = skeleton(&["a", "0"]).unwrap();
        let Value::Map(map) = shape else {
            panic!("expected a map");
        };
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![Key::from("a"), Key::from("0")]);
    }

    #[test]
    fn test_gaps_stay_map() {
        assert!(matches!(skeleton(&["0", "2"]).unwrap(), Value::Map(_)));
    }

    #[test]
    fn test_shared_prefix_merges() {
        let shape = skeleton(&["0[first]", "0[second]"]).unwrap();
        let expected = Value::List(vec![Value::Map(IndexMap::from([
            (Key::from("first"), Value::None),
            (Key::from("second"), Value::None),
        ]))]);
        assert_eq!(shape, expected);
    }

    #[test]
    fn test_nested_numeric_keys_normalize() {
        let shape = skeleton(&["a[0]", "a[1]"]).unwrap();
        assert_eq!(
            shape.get("a"),
            Some(&Value::List(vec![Value::None, Value::None]))
        );
    }

    #[test]
    fn test_attributes_build_objects() {
        let shape = skeleton(&["0.first[second]"]).unwrap();
        let object = shape.index(0).unwrap();
        assert_eq!(
            object.attr("first").and_then(|m| m.get("second")),
            Some(&Value::None)
        );
    }

    #[test]
    fn test_incompatible_paths() {
        for names in [
            &["0.a", "0[a]"][..],
            &["0[a]", "0.a"][..],
            &["0", "0[a]"][..],
            &["0[a]", "0"][..],
        ] {
            assert!(
                matches!(skeleton(names), Err(TemplateSyntaxError::IncompatiblePath { .. })),
                "{:?} should collide",
                names
            );
        }
    }

    #[test]
    fn test_repeated_leaf_is_allowed() {
        assert_eq!(skeleton(&["a", "a"]).unwrap().get("a"), Some(&Value::None));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = skeleton(&["0[0]", "0[1]", "1.x"]).unwrap();
        assert_eq!(normalize(once.clone()), once);
    }

    #[test]
    fn test_populate_first_write_wins() {
        let mut shape = skeleton(&["0[first]", "1"]).unwrap();
        let first = FieldPath::parse("0[first]").unwrap();

        assert!(populate(&mut shape, &first, Value::from("x")));
        assert!(!populate(&mut shape, &first, Value::from("y")));
        assert!(populate(&mut shape, &FieldPath::parse("1").unwrap(), Value::from(5)));

        assert_eq!(shape.index(0).and_then(|m| m.get("first")), Some(&Value::from("x")));
        assert_eq!(shape.index(1), Some(&Value::from(5)));
    }
}
