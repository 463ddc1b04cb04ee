//! Path-addressed rendering and patching of state trees.
//!
//! Encoding walks a snapshot into a flat list of render items: editable
//! controls bound to leaf paths, interleaved with structural text (markers,
//! key labels, indentation). Decoding applies a single path+value patch,
//! producing a new tree and never touching the input.

use crate::error::{Error, Result};
use crate::path::{Path, Step};
use crate::state::AppState;

/// Kind of editable leaf a control binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Bool,
    Number,
    Text,
}

/// Raw value captured from an edited control before conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEdit {
    /// A toggled boolean control, taken as-is.
    Toggle(bool),
    /// Text typed into a numeric or textual control.
    Entry(String),
}

/// One item of the rendered editable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderItem {
    /// Editable control bound to the leaf at `path`.
    Control {
        path: Path,
        kind: LeafKind,
        value: String,
    },
    /// Structural text: open/close markers, key labels, indentation.
    Text(String),
}

/// Render a snapshot into its path-addressed editable form.
pub fn encode(state: &AppState) -> Vec<RenderItem> {
    let mut items = Vec::new();
    walk(state, &Path::root(), 0, &mut items);
    items
}

fn walk(state: &AppState, path: &Path, level: usize, items: &mut Vec<RenderItem>) {
    match state {
        AppState::Bool(flag) => items.push(control(path, LeafKind::Bool, flag.to_string())),
        AppState::Number(number) => items.push(control(path, LeafKind::Number, number.to_string())),
        AppState::Text(text) => items.push(control(path, LeafKind::Text, text.clone())),
        AppState::Sequence(children) => {
            items.push(RenderItem::Text("[\n".to_string()));
            for (index, child) in children.iter().enumerate() {
                items.push(RenderItem::Text(indent(level + 1)));
                walk(child, &path.child_index(index), level + 1, items);
            }
            items.push(RenderItem::Text(format!("{}]\n", indent(level))));
        }
        // BTreeMap iteration is the sorted-key order the contract requires.
        AppState::Mapping(children) => {
            items.push(RenderItem::Text("{\n".to_string()));
            for (key, child) in children {
                items.push(RenderItem::Text(format!("{}{key}: ", indent(level + 1))));
                walk(child, &path.child_key(key), level + 1, items);
            }
            items.push(RenderItem::Text(format!("{}}}\n", indent(level))));
        }
    }
}

fn control(path: &Path, kind: LeafKind, value: String) -> RenderItem {
    RenderItem::Control {
        path: path.clone(),
        kind,
        value,
    }
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

/// Join rendered items into the stable textual form, controls shown as
/// their display value.
pub fn render_text(state: &AppState) -> String {
    encode(state)
        .into_iter()
        .map(|item| match item {
            RenderItem::Text(text) => text,
            RenderItem::Control { value, .. } => format!("{value}\n"),
        })
        .collect()
}

/// Look up the node a path addresses, if any.
pub fn value_at<'a>(root: &'a AppState, path: &Path) -> Option<&'a AppState> {
    let mut current = root;
    for step in path.steps() {
        current = match (step, current) {
            (Step::Key(key), AppState::Mapping(children)) => children.get(key)?,
            (Step::Index(index), AppState::Sequence(children)) => children.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Apply a single patch: replace the node at `path` with `raw` converted
/// per the declared kind, returning a new root. The input tree is never
/// mutated; a path that does not address an existing node is an
/// [`Error::Addressing`], never silently created structure.
pub fn apply_edit(root: &AppState, path: &Path, kind: LeafKind, raw: RawEdit) -> Result<AppState> {
    let replacement = convert(kind, raw)?;
    set_at(root, path.steps(), &replacement).ok_or_else(|| Error::Addressing(path.to_string()))
}

fn convert(kind: LeafKind, raw: RawEdit) -> Result<AppState> {
    match (kind, raw) {
        (LeafKind::Bool, RawEdit::Toggle(flag)) => Ok(AppState::Bool(flag)),
        (LeafKind::Number, RawEdit::Entry(text)) => text
            .trim()
            .parse::<i64>()
            .map(AppState::Number)
            .map_err(|_| Error::Literal {
                kind: "number",
                raw: text,
            }),
        (LeafKind::Text, RawEdit::Entry(text)) => Ok(AppState::Text(text)),
        (LeafKind::Bool, RawEdit::Entry(text)) => Err(Error::Literal {
            kind: "boolean",
            raw: text,
        }),
        (_, RawEdit::Toggle(flag)) => Err(Error::Literal {
            kind: "toggle",
            raw: flag.to_string(),
        }),
    }
}

fn set_at(node: &AppState, steps: &[Step], replacement: &AppState) -> Option<AppState> {
    let Some((step, rest)) = steps.split_first() else {
        return Some(replacement.clone());
    };
    match (step, node) {
        (Step::Key(key), AppState::Mapping(children)) => {
            let patched = set_at(children.get(key)?, rest, replacement)?;
            let mut next = children.clone();
            next.insert(key.clone(), patched);
            Some(AppState::Mapping(next))
        }
        (Step::Index(index), AppState::Sequence(children)) => {
            let patched = set_at(children.get(*index)?, rest, replacement)?;
            let mut next = children.clone();
            next[*index] = patched;
            Some(AppState::Sequence(next))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppState {
        AppState::parse(r#"{"a":1,"b":[true,"x"]}"#).unwrap()
    }

    #[test]
    fn render_is_indented_and_sorted() {
        let state = AppState::parse(r#"{"b":[true,"x"],"a":1}"#).unwrap();
        let expected = "{\n  a: 1\n  b: [\n    true\n    x\n  ]\n}\n";
        assert_eq!(render_text(&state), expected);
    }

    #[test]
    fn encoding_is_deterministic_across_insertion_orders() {
        let first = AppState::parse(r#"{"zebra":1,"apple":true,"mango":"m"}"#).unwrap();
        let second = AppState::parse(r#"{"mango":"m","apple":true,"zebra":1}"#).unwrap();
        assert_eq!(encode(&first), encode(&second));
    }

    #[test]
    fn reapplying_unmodified_controls_round_trips() {
        let state = AppState::parse(r#"{"a":1,"b":[true,"x"],"c":{"deep":[2,false]}}"#).unwrap();
        let mut current = state.clone();
        for item in encode(&state) {
            let RenderItem::Control { path, kind, value } = item else {
                continue;
            };
            let raw = match kind {
                LeafKind::Bool => RawEdit::Toggle(value == "true"),
                _ => RawEdit::Entry(value),
            };
            current = apply_edit(&current, &path, kind, raw).unwrap();
        }
        assert_eq!(current, state);
    }

    #[test]
    fn patching_never_mutates_the_input() {
        let original = sample();
        let before = original.clone();
        let path = Path::root().child_key("b").child_index(0);
        let patched = apply_edit(&original, &path, LeafKind::Bool, RawEdit::Toggle(false)).unwrap();
        assert_eq!(original, before);
        assert_ne!(patched, original);
        assert_eq!(
            patched.serialize(),
            r#"{"a":1,"b":[false,"x"]}"#.to_string()
        );
    }

    #[test]
    fn numeric_entries_parse_base_ten() {
        let patched = apply_edit(
            &sample(),
            &Path::root().child_key("a"),
            LeafKind::Number,
            RawEdit::Entry(" 42 ".to_string()),
        )
        .unwrap();
        assert_eq!(value_at(&patched, &Path::root().child_key("a")), Some(&AppState::Number(42)));

        let err = apply_edit(
            &sample(),
            &Path::root().child_key("a"),
            LeafKind::Number,
            RawEdit::Entry("0x2a".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Literal { .. }));
    }

    #[test]
    fn missing_path_is_an_addressing_error() {
        let err = apply_edit(
            &sample(),
            &Path::root().child_key("missing"),
            LeafKind::Number,
            RawEdit::Entry("1".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Addressing(_)));

        // Index into a mapping is just as absent as an unknown key.
        let err = apply_edit(
            &sample(),
            &Path::root().child_index(0),
            LeafKind::Number,
            RawEdit::Entry("1".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Addressing(_)));
    }

    #[test]
    fn root_path_replaces_the_whole_tree() {
        let patched = apply_edit(
            &sample(),
            &Path::root(),
            LeafKind::Text,
            RawEdit::Entry("flat".to_string()),
        )
        .unwrap();
        assert_eq!(patched, AppState::Text("flat".to_string()));
    }
}
