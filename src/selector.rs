//! Sample selector dropdown

use crate::view::Surface;
use serde::{Deserialize, Serialize};

/// One `<option>`: display text and value are both the sample name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(name: &str) -> Self {
        Self {
            text: name.to_string(),
            value: name.to_string(),
        }
    }
}

/// Fired when the user picks a different sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChanged {
    pub sample: String,
}

impl SelectionChanged {
    pub fn new(sample: impl Into<String>) -> Self {
        Self { sample: sample.into() }
    }
}

/// Append one option per name, in order. Duplicates are kept.
pub fn populate<S: Surface + ?Sized>(surface: &mut S, target: &str, names: &[String]) {
    let options = names.iter().map(|n| SelectOption::new(n)).collect();
    surface.append_options(target, options);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::PageState;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_populate_preserves_order_and_duplicates() {
        let mut page = PageState::default();
        populate(&mut page, "selDataset", &names(&["941", "940", "941"]));

        let opts = &page.dropdown("selDataset").unwrap().options;
        let values: Vec<&str> = opts.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["941", "940", "941"]);
        assert!(opts.iter().all(|o| o.text == o.value));
    }

    #[test]
    fn test_populate_empty_creates_no_options() {
        let mut page = PageState::default();
        populate(&mut page, "selDataset", &[]);
        assert!(page.dropdown("selDataset").unwrap().options.is_empty());
    }

    #[test]
    fn test_selection_event_from_json() {
        let ev: SelectionChanged = serde_json::from_str(r#"{"sample":"943"}"#).unwrap();
        assert_eq!(ev, SelectionChanged::new("943"));
    }
}
