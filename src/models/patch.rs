use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Per-field update intent for a merge.
///
/// A missing JSON field deserializes to `Keep` (with `#[serde(default)]`).
/// Wrapping a nullable column as `Patch<Option<T>>` yields three states:
/// `Keep`, `Set(None)` (clear) and `Set(Some(v))`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Keep => None,
            Patch::Set(value) => Some(value),
        }
    }
}

impl<T: Clone> Patch<T> {
    /// `(overwrite?, value)` as bound into a merge statement.
    pub fn bind_parts(&self) -> (bool, Option<T>) {
        match self {
            Patch::Keep => (false, None),
            Patch::Set(value) => (true, Some(value.clone())),
        }
    }
}

impl<T: Clone> Patch<Option<T>> {
    /// Like [`Patch::bind_parts`] for nullable columns: `Set(None)` clears.
    pub fn bind_nullable_parts(&self) -> (bool, Option<T>) {
        match self {
            Patch::Keep => (false, None),
            Patch::Set(value) => (true, value.clone()),
        }
    }

    /// `None` keeps the stored value instead of clearing it.
    pub fn keep_if_none(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(Some(value)),
            None => Patch::Keep,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Keep,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

/// Serializes as the set value, or `null` for `Keep`.
impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_set().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        title: Patch<String>,
        #[serde(default)]
        description: Patch<Option<String>>,
    }

    #[test]
    fn test_missing_field_keeps() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert!(body.title.is_keep());
        assert!(body.description.is_keep());
    }

    #[test]
    fn test_null_clears_nullable_field() {
        let body: Body = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(body.description, Patch::Set(None));
        assert_eq!(body.description.bind_nullable_parts(), (true, None));
    }

    #[test]
    fn test_value_sets_field() {
        let body: Body =
            serde_json::from_str(r#"{"title": "Heat", "description": "LA, 1995"}"#).unwrap();
        assert_eq!(body.title.bind_parts(), (true, Some("Heat".to_string())));
        assert_eq!(body.description.as_set(), Some(&Some("LA, 1995".to_string())));
    }

    #[test]
    fn test_null_rejected_for_required_field() {
        assert!(serde_json::from_str::<Body>(r#"{"title": null}"#).is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Patch::<i32>::from(Some(1)), Patch::Set(1));
        assert_eq!(Patch::<i32>::from(None), Patch::Keep);
        assert_eq!(Patch::keep_if_none(None::<i32>), Patch::Keep);
        assert_eq!(Patch::keep_if_none(Some(2)), Patch::Set(Some(2)));
    }

    #[test]
    fn test_serializes_set_value_or_null() {
        assert_eq!(serde_json::to_value(Patch::Set("Heat")).unwrap(), serde_json::json!("Heat"));
        assert_eq!(serde_json::to_value(Patch::<i32>::Keep).unwrap(), serde_json::Value::Null);
        assert_eq!(
            serde_json::to_value(Patch::<Option<i32>>::Set(None)).unwrap(),
            serde_json::Value::Null
        );
    }
}
