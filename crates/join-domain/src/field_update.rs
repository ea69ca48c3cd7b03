/// Three-state update for optional fields in a partial patch.
///
/// - `NoChange`: keep the existing value
/// - `Set(value)`: replace the value
/// - `Clear`: set the field to None
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    NoChange,
    Set(T),
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::NoChange
    }
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to() {
        let mut field = Some("old".to_string());
        FieldUpdate::Set("new".to_string()).apply_to(&mut field);
        assert_eq!(field, Some("new".to_string()));

        FieldUpdate::NoChange.apply_to(&mut field);
        assert_eq!(field, Some("new".to_string()));

        FieldUpdate::Clear.apply_to(&mut field);
        assert_eq!(field, None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FieldUpdate::from(Some(1)), FieldUpdate::Set(1));
        assert_eq!(FieldUpdate::<i32>::from(None), FieldUpdate::Clear);
    }
}
