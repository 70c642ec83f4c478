use anyhow::{Error, Result, bail};
use serde::Serialize;

use super::models::Category;

/// Picking which of the recommended tests or medicines to book.
#[derive(Clone, Debug, Serialize)]
pub struct BookingSelection {
    pub category: Category,
    items: Vec<String>,
    selected: Vec<String>,
}

impl BookingSelection {
    pub fn new(category: Category, items: Vec<String>) -> Self {
        Self {
            category,
            items,
            selected: vec![],
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, item: &str) -> bool {
        self.selected.iter().any(|s| s == item)
    }

    /// Select `item` or deselect it when it already is.
    pub fn toggle(&mut self, item: &str) -> Result<(), Error> {
        if !self.items.iter().any(|i| i == item) {
            bail!("{} is not one of the recommended {}", item, self.category);
        }
        if self.is_selected(item) {
            self.selected.retain(|s| s != item);
        } else {
            self.selected.push(item.to_string());
        }
        Ok(())
    }

    /// Finish the selection and return what was picked.
    pub fn confirm(self) -> Result<Vec<String>, Error> {
        if self.selected.is_empty() {
            let noun = self.category.noun();
            bail!("No {noun} selected: Please select at least one {noun}.");
        }
        Ok(self.selected)
    }
}
