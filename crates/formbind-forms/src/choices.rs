//! Choice lists for select, radio, and checkbox-group fields.
//!
//! A config supplies choices either as a plain list of values or as an
//! ordered key→label map. The factory expands the list form eagerly into a
//! [`Choices`] map, which is what the field variants render and validate
//! against.

use serde_json::Value;

use crate::value::display;

/// Choices as supplied in a field config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceList {
    /// A plain ordered list of values.
    List(Vec<String>),
    /// An ordered key→label map.
    Map(Vec<(String, String)>),
}

impl ChoiceList {
    /// Builds a choice list from a raw config value.
    ///
    /// Arrays become [`ChoiceList::List`], objects become [`ChoiceList::Map`].
    /// An object whose keys are exactly `0, 1, 2, ...` in order is treated
    /// as a list of its values.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Self::List(items.iter().map(display).collect())),
            Value::Object(map) => {
                let sequential = map.keys().enumerate().all(|(i, k)| *k == i.to_string());
                if sequential {
                    Some(Self::List(map.values().map(display).collect()))
                } else {
                    Some(Self::Map(
                        map.iter().map(|(k, v)| (k.clone(), display(v))).collect(),
                    ))
                }
            }
            _ => None,
        }
    }
}

/// A field description: one text, or one label per choice (legacy form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    /// Text shown next to the control.
    Text(String),
    /// Labels paired positionally with a plain choice list.
    PerChoice(Vec<String>),
}

impl Default for Description {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Description {
    /// The text to render next to the control. Per-choice labels render none.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::PerChoice(_) => "",
        }
    }
}

/// An expanded, ordered key→label choice map.
///
/// Keys are unique. A repeated key keeps the position of its first
/// occurrence and the label of its last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices(Vec<(String, String)>);

impl Choices {
    /// Creates a choice map from ordered pairs.
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }

    /// Expands a config choice list.
    ///
    /// A map is kept as-is. A plain list is expanded in this order:
    /// 1. with per-choice descriptions, values are zipped with the labels
    ///    and the description is cleared;
    /// 2. without `numeric`, each value becomes its own key;
    /// 3. otherwise the list is keyed by position.
    ///
    /// # Examples
    ///
    /// ```
    /// use formbind_forms::choices::{ChoiceList, Choices, Description};
    ///
    /// let list = ChoiceList::List(vec!["a".into(), "b".into()]);
    /// let mut desc = Description::default();
    ///
    /// let keyed = Choices::expand(&list, &mut desc, false);
    /// assert_eq!(keyed.keys().collect::<Vec<_>>(), ["a", "b"]);
    ///
    /// let indexed = Choices::expand(&list, &mut desc, true);
    /// assert_eq!(indexed.keys().collect::<Vec<_>>(), ["0", "1"]);
    /// ```
    pub fn expand(list: &ChoiceList, desc: &mut Description, numeric: bool) -> Self {
        let values = match list {
            ChoiceList::Map(pairs) => return pairs.iter().cloned().collect(),
            ChoiceList::List(values) => values,
        };
        if values.is_empty() {
            return Self::default();
        }
        if let Description::PerChoice(labels) = &*desc {
            if labels.len() != values.len() {
                tracing::warn!(
                    choices = values.len(),
                    labels = labels.len(),
                    "per-choice descriptions do not match the choice count"
                );
            }
            let choices = values.iter().cloned().zip(labels.iter().cloned()).collect();
            *desc = Description::default();
            return choices;
        }
        if numeric {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect()
        } else {
            values.iter().map(|v| (v.clone(), v.clone())).collect()
        }
    }

    /// Iterates `(key, label)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    /// Iterates keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Returns `true` if `key` is one of the choice keys.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Returns the label for `key`.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, l)| l.as_str())
    }

    /// Returns the first key.
    pub fn first_key(&self) -> Option<&str> {
        self.0.first().map(|(k, _)| k.as_str())
    }

    /// Returns the number of choices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no choices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the choices as a config map.
    pub fn to_choice_list(&self) -> ChoiceList {
        ChoiceList::Map(self.0.clone())
    }
}

impl FromIterator<(String, String)> for Choices {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for (key, label) in iter {
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = label,
                None => pairs.push((key, label)),
            }
        }
        Self(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(values: &[&str]) -> ChoiceList {
        ChoiceList::List(values.iter().map(|v| (*v).to_string()).collect())
    }

    #[test]
    fn test_expand_keyed_by_value() {
        let mut desc = Description::default();
        let choices = Choices::expand(&list(&["a", "b"]), &mut desc, false);
        assert_eq!(
            choices.iter().collect::<Vec<_>>(),
            [("a", "a"), ("b", "b")]
        );
    }

    #[test]
    fn test_expand_numeric_keeps_index() {
        let mut desc = Description::default();
        let choices = Choices::expand(&list(&["a", "b"]), &mut desc, true);
        assert_eq!(
            choices.iter().collect::<Vec<_>>(),
            [("0", "a"), ("1", "b")]
        );
    }

    #[test]
    fn test_expand_per_choice_labels() {
        let mut desc = Description::PerChoice(vec!["Red".into(), "Blue".into()]);
        let choices = Choices::expand(&list(&["red", "blue"]), &mut desc, false);
        assert_eq!(choices.label("blue"), Some("Blue"));
        assert_eq!(desc, Description::Text(String::new()));
    }

    #[test]
    fn test_expand_per_choice_wins_over_numeric() {
        let mut desc = Description::PerChoice(vec!["One".into()]);
        let choices = Choices::expand(&list(&["1"]), &mut desc, true);
        assert_eq!(choices.iter().collect::<Vec<_>>(), [("1", "One")]);
    }

    #[test]
    fn test_expand_duplicate_values_collapse() {
        let mut desc = Description::default();
        let choices = Choices::expand(&list(&["a", "b", "a"]), &mut desc, false);
        assert_eq!(choices.iter().collect::<Vec<_>>(), [("a", "a"), ("b", "b")]);
    }

    #[test]
    fn test_expand_per_choice_duplicates_keep_last_label() {
        let mut desc = Description::PerChoice(vec!["First".into(), "Other".into(), "Last".into()]);
        let choices = Choices::expand(&list(&["x", "y", "x"]), &mut desc, false);
        assert_eq!(
            choices.iter().collect::<Vec<_>>(),
            [("x", "Last"), ("y", "Other")]
        );
    }

    #[test]
    fn test_new_dedupes_map_pairs() {
        let choices = Choices::new(vec![
            ("k".into(), "One".into()),
            ("j".into(), "J".into()),
            ("k".into(), "Two".into()),
        ]);
        assert_eq!(choices.len(), 2);
        assert_eq!(choices.first_key(), Some("k"));
        assert_eq!(choices.label("k"), Some("Two"));
    }

    #[test]
    fn test_expand_map_kept() {
        let mut desc = Description::Text("d".into());
        let map = ChoiceList::Map(vec![("red".into(), "Red".into())]);
        let choices = Choices::expand(&map, &mut desc, false);
        assert_eq!(choices.label("red"), Some("Red"));
        assert_eq!(desc.text(), "d");
    }

    #[test]
    fn test_expand_empty_list() {
        let mut desc = Description::PerChoice(vec!["x".into()]);
        assert!(Choices::expand(&list(&[]), &mut desc, false).is_empty());
    }

    #[test]
    fn test_from_value_array_and_object() {
        assert_eq!(
            ChoiceList::from_value(&json!(["a", 2])),
            Some(list(&["a", "2"]))
        );
        assert_eq!(
            ChoiceList::from_value(&json!({"red": "Red"})),
            Some(ChoiceList::Map(vec![("red".into(), "Red".into())]))
        );
        assert_eq!(ChoiceList::from_value(&json!("nope")), None);
    }

    #[test]
    fn test_from_value_sequential_object_is_list() {
        assert_eq!(
            ChoiceList::from_value(&json!({"0": "a", "1": "b"})),
            Some(list(&["a", "b"]))
        );
    }

    #[test]
    fn test_lookup_helpers() {
        let choices = Choices::new(vec![
            ("x".into(), "X".into()),
            ("y".into(), "Y".into()),
        ]);
        assert!(choices.contains_key("y"));
        assert!(!choices.contains_key("z"));
        assert_eq!(choices.first_key(), Some("x"));
        assert_eq!(choices.len(), 2);
    }
}
