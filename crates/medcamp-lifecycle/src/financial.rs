//! Revenue and partner-adjustment derivation, and the completion
//! reconciliation check.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use medcamp_core::models::camp::{PartnerType, optional_partner_type};

/// Per-unit price when the camp has no HUMANA partner.
pub const DEFAULT_UNIT_PRICE: u64 = 300;
pub const HUMANA_UNIT_PRICE: u64 = 500;

pub const PAHAL_ADJUSTMENT_RATE: u64 = 150;
pub const HUMANA_ADJUSTMENT_RATE: u64 = 500;

pub fn unit_price(partner_type: Option<PartnerType>) -> u64 {
    match partner_type {
        Some(PartnerType::Humana) => HUMANA_UNIT_PRICE,
        Some(PartnerType::Pahal) | None => DEFAULT_UNIT_PRICE,
    }
}

pub fn adjustment_rate(partner_type: PartnerType) -> u64 {
    match partner_type {
        PartnerType::Pahal => PAHAL_ADJUSTMENT_RATE,
        PartnerType::Humana => HUMANA_ADJUSTMENT_RATE,
    }
}

pub fn revenue(units_sold: u32, partner_type: Option<PartnerType>) -> u64 {
    u64::from(units_sold) * unit_price(partner_type)
}

pub fn partner_adjustment(adjusted_count: u32, partner_type: PartnerType) -> u64 {
    u64::from(adjusted_count) * adjustment_rate(partner_type)
}

/// Inputs to the completion gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReconciliationInput {
    pub revenue: u64,
    pub amount_paid_to_finance: u64,
    pub marketing_expense: u64,
    pub operational_expense: u64,
    pub has_partner_adjustment: bool,
    pub partner_adjustment_amount: u64,
}

impl ReconciliationInput {
    /// Sum of the expense components, counting the partner adjustment only
    /// when it is enabled. `None` when the sum does not fit in a `u64`.
    pub fn expenses(&self) -> Option<u64> {
        let base = self
            .amount_paid_to_finance
            .checked_add(self.marketing_expense)?
            .checked_add(self.operational_expense)?;
        if self.has_partner_adjustment {
            base.checked_add(self.partner_adjustment_amount)
        } else {
            Some(base)
        }
    }

    pub fn reconciles(&self) -> bool {
        self.expenses() == Some(self.revenue)
    }
}

/// One operator edit to a field that drives a derived value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialEdit {
    UnitsSold(Option<u32>),
    PartnerType(Option<PartnerType>),
    PartnerAdjustedCount(Option<u32>),
}

/// The completion form's financial fields, with revenue and partner
/// adjustment recomputed after every edit. Nothing here is persisted; the
/// engine derives the same values again when completion is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CompletionDraft {
    pub units_sold: Option<u32>,
    #[serde(default, deserialize_with = "optional_partner_type")]
    pub partner_type: Option<PartnerType>,
    pub partner_adjusted_count: Option<u32>,
    pub revenue: Option<u64>,
    pub partner_adjustment_amount: Option<u64>,
}

impl CompletionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, edit: FinancialEdit) {
        match edit {
            FinancialEdit::UnitsSold(units) => self.units_sold = units,
            FinancialEdit::PartnerType(partner) => self.partner_type = partner,
            FinancialEdit::PartnerAdjustedCount(count) => self.partner_adjusted_count = count,
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        // Revenue stays empty until units are entered.
        self.revenue = self
            .units_sold
            .map(|units| revenue(units, self.partner_type));
        self.partner_adjustment_amount = self.partner_type.map(|partner| {
            partner_adjustment(self.partner_adjusted_count.unwrap_or(0), partner)
        });
    }
}
