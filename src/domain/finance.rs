//! Finance record types
//!
//! The per-user farm finance record, the payload accepted from clients, and
//! the defaulting/validation that turns one into the other.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::DomainError;

/// Unit stored when the caller does not name a yield unit
pub const DEFAULT_YIELD_UNIT: &str = "kg";

/// Unit stored when the caller does not name a price unit
pub const DEFAULT_PRICE_UNIT: &str = "per kg";

/// A cost line the farmer tracks by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Mandatory cost lines are flagged by the UI and cannot be removed there
    #[serde(rename = "isRequired", default)]
    pub is_required: bool,
}

impl ExpenseCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            is_required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}

/// A free-form expense outside the category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherExpense {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl OtherExpense {
    pub fn new(id: impl Into<String>, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
        }
    }
}

/// Caller-owned fields of a finance record, with defaults already applied.
///
/// This is what gets persisted on every upsert: a full replacement of the
/// stored fields, never a merge. Derived figures (revenue, profit, break-even)
/// are computed by the caller and stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceData {
    pub expense_categories: Vec<ExpenseCategory>,
    pub other_expenses: Vec<OtherExpense>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub predicted_yield: Option<Decimal>,
    pub yield_unit: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub predicted_price: Option<Decimal>,
    pub price_unit: String,
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub expected_revenue: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub net_profit_loss: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub profit_loss_percentage: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub break_even_price: Option<Decimal>,
}

impl FinanceData {
    /// Empty record with only the defaults filled in
    pub fn new(expense_categories: Vec<ExpenseCategory>) -> Self {
        Self {
            expense_categories,
            other_expenses: Vec::new(),
            total_expense: Decimal::ZERO,
            predicted_yield: None,
            yield_unit: DEFAULT_YIELD_UNIT.to_string(),
            predicted_price: None,
            price_unit: DEFAULT_PRICE_UNIT.to_string(),
            crop_type: None,
            expected_revenue: None,
            net_profit_loss: None,
            profit_loss_percentage: None,
            break_even_price: None,
        }
    }

    pub fn with_other_expenses(mut self, other_expenses: Vec<OtherExpense>) -> Self {
        self.other_expenses = other_expenses;
        self
    }

    pub fn with_total_expense(mut self, total_expense: Decimal) -> Self {
        self.total_expense = total_expense;
        self
    }

    pub fn with_crop_type(mut self, crop_type: impl Into<String>) -> Self {
        self.crop_type = Some(crop_type.into());
        self
    }

    /// Sum of every category and other-expense amount.
    ///
    /// The server does not enforce `total_expense == expense_sum()`; this is
    /// here for callers that want to fill the total before saving.
    pub fn expense_sum(&self) -> Decimal {
        let categories: Decimal = self.expense_categories.iter().map(|c| c.amount).sum();
        let others: Decimal = self.other_expenses.iter().map(|e| e.amount).sum();
        categories + others
    }
}

/// A stored finance record.
///
/// Serialized flat. Decoding goes through `RecordWire` because flattened
/// fields lose the `null` handling of `float_option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordWire")]
pub struct FinanceRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub data: FinanceData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RecordWire {
    id: Uuid,
    user_id: Uuid,
    expense_categories: Vec<ExpenseCategory>,
    other_expenses: Vec<OtherExpense>,
    #[serde(with = "rust_decimal::serde::float")]
    total_expense: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    predicted_yield: Option<Decimal>,
    yield_unit: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    predicted_price: Option<Decimal>,
    price_unit: String,
    #[serde(default)]
    crop_type: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    expected_revenue: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    net_profit_loss: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    profit_loss_percentage: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    break_even_price: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecordWire> for FinanceRecord {
    fn from(wire: RecordWire) -> Self {
        FinanceRecord {
            id: wire.id,
            user_id: wire.user_id,
            data: FinanceData {
                expense_categories: wire.expense_categories,
                other_expenses: wire.other_expenses,
                total_expense: wire.total_expense,
                predicted_yield: wire.predicted_yield,
                yield_unit: wire.yield_unit,
                predicted_price: wire.predicted_price,
                price_unit: wire.price_unit,
                crop_type: wire.crop_type,
                expected_revenue: wire.expected_revenue,
                net_profit_loss: wire.net_profit_loss,
                profit_loss_percentage: wire.profit_loss_percentage,
                break_even_price: wire.break_even_price,
            },
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

// =========================================================================
// Upsert payload
// =========================================================================

/// Raw upsert payload as sent by clients.
///
/// Optional fields stay optional here; `into_data` applies the defaults.
/// A `user_id` in the body is ignored: the owner always comes from the
/// verified credential.
#[derive(Debug, Clone, Deserialize)]
pub struct FinanceInput {
    pub expense_categories: Vec<ExpenseCategory>,
    #[serde(default)]
    pub other_expenses: Option<Vec<OtherExpense>>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_expense: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub predicted_yield: Option<Decimal>,
    #[serde(default)]
    pub yield_unit: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub predicted_price: Option<Decimal>,
    #[serde(default)]
    pub price_unit: Option<String>,
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub expected_revenue: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub net_profit_loss: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub profit_loss_percentage: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub break_even_price: Option<Decimal>,
}

impl FinanceInput {
    /// Parse an upsert request body.
    ///
    /// The shape check on `expense_categories` runs before typed decoding so
    /// that a missing or non-array value is reported as such rather than as a
    /// generic decode failure.
    pub fn from_json(body: &[u8]) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DomainError::MalformedBody(e.to_string()))?;

        if !value.is_object() {
            return Err(DomainError::MalformedBody(
                "request body must be a JSON object".to_string(),
            ));
        }

        match value.get("expense_categories") {
            Some(Value::Array(_)) => {}
            _ => return Err(DomainError::InvalidExpenseCategories),
        }

        serde_json::from_value(value).map_err(|e| DomainError::MalformedBody(e.to_string()))
    }

    /// Validate amounts and fill in defaults for absent optional fields.
    ///
    /// Empty unit strings count as absent.
    pub fn into_data(self) -> Result<FinanceData, DomainError> {
        for category in &self.expense_categories {
            ensure_non_negative(&category.name, category.amount)?;
        }
        let other_expenses = self.other_expenses.unwrap_or_default();
        for expense in &other_expenses {
            ensure_non_negative(&expense.name, expense.amount)?;
        }
        let total_expense = self.total_expense.unwrap_or(Decimal::ZERO);
        ensure_non_negative("total_expense", total_expense)?;

        Ok(FinanceData {
            expense_categories: self.expense_categories,
            other_expenses,
            total_expense,
            predicted_yield: self.predicted_yield,
            yield_unit: non_empty_or(self.yield_unit, DEFAULT_YIELD_UNIT),
            predicted_price: self.predicted_price,
            price_unit: non_empty_or(self.price_unit, DEFAULT_PRICE_UNIT),
            crop_type: self.crop_type,
            expected_revenue: self.expected_revenue,
            net_profit_loss: self.net_profit_loss,
            profit_loss_percentage: self.profit_loss_percentage,
            break_even_price: self.break_even_price,
        })
    }
}

fn ensure_non_negative(field: &str, amount: Decimal) -> Result<(), DomainError> {
    if amount < Decimal::ZERO {
        return Err(DomainError::NegativeAmount {
            field: field.to_string(),
            amount,
        });
    }
    Ok(())
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
