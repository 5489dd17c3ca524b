//! The fixed category tables used by the sample data generator.

use crate::transaction::TransactionType;

/// A transaction category and the amount range it draws from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryRange {
    /// The category label stored on generated transactions.
    pub name: &'static str,
    /// The smallest amount the category produces.
    pub min: f64,
    /// The largest amount the category produces.
    pub max: f64,
}

/// The categories that income transactions draw from.
pub const INCOME_CATEGORIES: &[CategoryRange] = &[
    CategoryRange {
        name: "salary",
        min: 5000.0,
        max: 8000.0,
    },
    CategoryRange {
        name: "freelance",
        min: 1000.0,
        max: 3000.0,
    },
    CategoryRange {
        name: "investments",
        min: 500.0,
        max: 2000.0,
    },
    CategoryRange {
        name: "other-income",
        min: 100.0,
        max: 1000.0,
    },
];

/// The categories that expense transactions draw from.
pub const EXPENSE_CATEGORIES: &[CategoryRange] = &[
    CategoryRange {
        name: "housing",
        min: 1000.0,
        max: 2000.0,
    },
    CategoryRange {
        name: "transportation",
        min: 100.0,
        max: 500.0,
    },
    CategoryRange {
        name: "groceries",
        min: 200.0,
        max: 600.0,
    },
    CategoryRange {
        name: "utilities",
        min: 100.0,
        max: 300.0,
    },
    CategoryRange {
        name: "entertainment",
        min: 50.0,
        max: 200.0,
    },
    CategoryRange {
        name: "food",
        min: 50.0,
        max: 150.0,
    },
    CategoryRange {
        name: "shopping",
        min: 100.0,
        max: 500.0,
    },
    CategoryRange {
        name: "healthcare",
        min: 100.0,
        max: 1000.0,
    },
    CategoryRange {
        name: "education",
        min: 200.0,
        max: 1000.0,
    },
    CategoryRange {
        name: "travel",
        min: 500.0,
        max: 2000.0,
    },
];

/// The category table for a transaction direction.
pub fn categories_for(transaction_type: TransactionType) -> &'static [CategoryRange] {
    match transaction_type {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
    }
}

/// Look up a category's range by its label, searching both tables.
pub fn range_for(name: &str) -> Option<&'static CategoryRange> {
    INCOME_CATEGORIES
        .iter()
        .chain(EXPENSE_CATEGORIES)
        .find(|category| category.name == name)
}
