use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

use super::{Channel, Department, OrderError};

/// One requested sku. Has no identity beyond its position in the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub title: String,
    pub sku: String,
    pub quantity: u32,
}

/// Pending order lines for one form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub department: Department,
    pub lines: Vec<OrderLine>,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            department: Department::Marketing,
            lines: Vec::new(),
        }
    }
}

impl OrderDraft {
    #[must_use]
    pub fn new(department: Department) -> Self {
        Self {
            department,
            lines: Vec::new(),
        }
    }

    /// Switches department, dropping pending lines the new department may
    /// not order. Returns how many lines were dropped.
    pub fn set_department(
        &mut self,
        department: Department,
        catalog: &Catalog,
        restricted_tag: &str,
    ) -> usize {
        self.department = department;
        let before = self.lines.len();
        self.lines.retain(|line| {
            catalog
                .find(&line.title, &line.sku)
                .is_some_and(|r| !department.is_restricted() || r.has_tag(restricted_tag))
        });
        before - self.lines.len()
    }

    /// Validates and appends a line.
    ///
    /// `title` and `sku` are `None` (or blank) when nothing was picked;
    /// `quantity` is the raw text from the form.
    ///
    /// # Errors
    ///
    /// - [`OrderError::SelectionMissing`] when product or sku is unselected.
    /// - [`OrderError::UnknownSku`] when the sku is not a variant of the product.
    /// - [`OrderError::NotAvailable`] when the department may not order it.
    /// - [`OrderError::InvalidQuantity`] when quantity is not a positive integer.
    /// - [`OrderError::OutOfStock`] when quantity exceeds 10% of recorded stock.
    pub fn add_line(
        &mut self,
        catalog: &Catalog,
        restricted_tag: &str,
        title: Option<&str>,
        sku: Option<&str>,
        quantity: &str,
    ) -> Result<&OrderLine, OrderError> {
        let title = title.map(str::trim).filter(|s| !s.is_empty());
        let sku = sku.map(str::trim).filter(|s| !s.is_empty());
        let (Some(title), Some(sku)) = (title, sku) else {
            return Err(OrderError::SelectionMissing);
        };

        let record = catalog
            .find(title, sku)
            .ok_or_else(|| OrderError::UnknownSku {
                title: title.to_string(),
                sku: sku.to_string(),
            })?;

        if self.department.is_restricted() && !record.has_tag(restricted_tag) {
            return Err(OrderError::NotAvailable {
                title: title.to_string(),
                department: self.department,
            });
        }

        let quantity = parse_quantity(quantity)?;

        // Reject anything above 10% of recorded stock.
        let requested = u64::from(quantity);
        if requested.saturating_mul(10) > record.in_stock {
            return Err(OrderError::OutOfStock {
                sku: sku.to_string(),
                requested,
                max: record.max_orderable(),
            });
        }

        self.lines.push(OrderLine {
            title: title.to_string(),
            sku: sku.to_string(),
            quantity,
        });
        tracing::debug!(sku, quantity, lines = self.lines.len(), "added order line");

        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Removes the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NoSuchLine`] if `index` is out of range.
    pub fn remove_line(&mut self, index: usize) -> Result<OrderLine, OrderError> {
        if index >= self.lines.len() {
            return Err(OrderError::NoSuchLine(index));
        }
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    #[must_use]
    pub fn channel(&self) -> Channel {
        Channel::for_total_quantity(self.total_quantity())
    }
}

fn parse_quantity(raw: &str) -> Result<u32, OrderError> {
    match raw.trim().parse::<u32>() {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(OrderError::InvalidQuantity(raw.to_string())),
    }
}
