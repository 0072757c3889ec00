//! Position tracking types
//!
//! A position is kept per trading book; the aggregate is their sum.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::ProductId;
use crate::product::{Bond, Product};
use crate::record::{CsvRecord, Keyed};

/// Signed holdings of one product across books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position<P = Bond> {
    product: P,
    positions: BTreeMap<String, i64>,
}

impl<P: Product> Position<P> {
    pub fn new(product: P) -> Self {
        Self {
            product,
            positions: BTreeMap::new(),
        }
    }

    pub fn product(&self) -> &P {
        &self.product
    }

    /// Apply a signed quantity change to one book.
    pub fn add(&mut self, book: &str, quantity: i64) {
        *self.positions.entry(book.to_string()).or_insert(0) += quantity;
    }

    /// Position in one book (zero if never traded)
    pub fn book_position(&self, book: &str) -> i64 {
        self.positions.get(book).copied().unwrap_or(0)
    }

    /// Books in name order with their quantities
    pub fn books(&self) -> impl Iterator<Item = (&str, i64)> {
        self.positions
            .iter()
            .map(|(book, qty)| (book.as_str(), *qty))
    }

    pub fn aggregate(&self) -> i64 {
        self.positions.values().sum()
    }
}

impl<P: Product> Keyed for Position<P> {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.product.product_id().clone()
    }
}

impl<P: Product> CsvRecord for Position<P> {
    fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.product.product_id().to_string()];
        fields.extend(self.books().map(|(book, qty)| format!("{}:{}", book, qty)));
        fields.push(self.aggregate().to_string());
        fields
    }
}
