use medcamp_core::models::camp::PartnerType;
use medcamp_lifecycle::camp::CompletionForm;
use medcamp_lifecycle::codes;
use medcamp_lifecycle::financial::{self, CompletionDraft, FinancialEdit, ReconciliationInput};

#[test]
fn revenue_stays_empty_until_units_are_entered() {
    let mut draft = CompletionDraft::new();
    draft.apply(FinancialEdit::PartnerType(None));
    assert_eq!(draft.revenue, None);
    assert_eq!(draft.partner_adjustment_amount, None);

    draft.apply(FinancialEdit::UnitsSold(Some(40)));
    assert_eq!(draft.revenue, Some(12_000));
}

#[test]
fn humana_reprices_units_and_adjusts_per_test() {
    let mut draft = CompletionDraft::new();
    draft.apply(FinancialEdit::PartnerType(Some(PartnerType::Humana)));
    draft.apply(FinancialEdit::UnitsSold(Some(40)));
    assert_eq!(draft.revenue, Some(20_000));
    assert_eq!(draft.partner_adjustment_amount, Some(0));

    draft.apply(FinancialEdit::PartnerAdjustedCount(Some(10)));
    assert_eq!(draft.partner_adjustment_amount, Some(5000));

    // Switching partner recomputes both derived values.
    draft.apply(FinancialEdit::PartnerType(Some(PartnerType::Pahal)));
    assert_eq!(draft.revenue, Some(12_000));
    assert_eq!(draft.partner_adjustment_amount, Some(1500));

    draft.apply(FinancialEdit::PartnerType(None));
    assert_eq!(draft.partner_adjustment_amount, None);
}

#[test]
fn pricing_constants() {
    assert_eq!(financial::revenue(7, None), 2100);
    assert_eq!(financial::revenue(7, Some(PartnerType::Pahal)), 2100);
    assert_eq!(financial::revenue(7, Some(PartnerType::Humana)), 3500);
    assert_eq!(financial::partner_adjustment(4, PartnerType::Pahal), 600);
    assert_eq!(financial::partner_adjustment(4, PartnerType::Humana), 2000);
}

#[test]
fn reconciliation_counts_partner_adjustment_only_when_enabled() {
    let mut input = ReconciliationInput {
        revenue: 9000,
        amount_paid_to_finance: 5000,
        marketing_expense: 2000,
        operational_expense: 1000,
        has_partner_adjustment: false,
        partner_adjustment_amount: 1000,
    };
    assert_eq!(input.expenses(), Some(8000));
    assert!(!input.reconciles());

    input.has_partner_adjustment = true;
    assert_eq!(input.expenses(), Some(9000));
    assert!(input.reconciles());
}

#[test]
fn expenses_that_overflow_never_reconcile() {
    let form = CompletionForm {
        units_sold: Some(40),
        amount_paid_to_finance: Some(u64::MAX),
        marketing_expense: Some(12_001),
        operational_expense: Some(0),
        ..CompletionForm::default()
    };
    let check = form.reconciliation();
    assert_eq!(check.revenue, 12_000);
    assert_eq!(check.expenses(), None);
    assert!(!check.reconciles());

    let adjusted = ReconciliationInput {
        revenue: 0,
        amount_paid_to_finance: u64::MAX,
        marketing_expense: 0,
        operational_expense: 0,
        has_partner_adjustment: true,
        partner_adjustment_amount: 1,
    };
    assert_eq!(adjusted.expenses(), None);
    assert!(!adjusted.reconciles());
}

#[test]
fn empty_partner_type_means_no_partner() {
    let form: CompletionForm = serde_json::from_str(r#"{"unitsSold":40,"partnerType":""}"#).unwrap();
    assert_eq!(form.partner_type, None);
    assert_eq!(form.reconciliation().revenue, 12_000);

    let form: CompletionForm = serde_json::from_str(r#"{"unitsSold":40,"partnerType":"  "}"#).unwrap();
    assert_eq!(form.partner_type, None);

    let form: CompletionForm = serde_json::from_str(r#"{"unitsSold":40,"partnerType":null}"#).unwrap();
    assert_eq!(form.partner_type, None);

    let form: CompletionForm = serde_json::from_str(r#"{"unitsSold":40,"partnerType":"HUMANA"}"#).unwrap();
    assert_eq!(form.partner_type, Some(PartnerType::Humana));
    assert_eq!(form.reconciliation().revenue, 20_000);

    assert!(serde_json::from_str::<CompletionForm>(r#"{"partnerType":"ACME"}"#).is_err());

    let draft: CompletionDraft = serde_json::from_str(r#"{"unitsSold":40,"partnerType":""}"#).unwrap();
    assert_eq!(draft.partner_type, None);
}

#[test]
fn completion_form_derives_its_own_totals() {
    let form = CompletionForm {
        units_sold: Some(20),
        amount_paid_to_finance: Some(6000),
        marketing_expense: Some(1000),
        operational_expense: Some(0),
        partner_type: Some(PartnerType::Pahal),
        partner_adjusted_count: Some(2),
        ..CompletionForm::default()
    };
    let check = form.reconciliation();
    assert_eq!(check.revenue, 6000);
    assert_eq!(check.partner_adjustment_amount, 300);
    assert_eq!(check.expenses(), Some(7300));
}

#[test]
fn generated_codes() {
    let mut rng = rand::thread_rng();
    let code = codes::camp_code(jiff::civil::date(2024, 1, 5), &mut rng);
    assert!(code.starts_with("MSHC20240105"));
    assert!(code[12..].bytes().all(|b| b.is_ascii_digit()));

    let now: jiff::Timestamp = "2024-06-10T08:00:00Z".parse().unwrap();
    let test_code = codes::test_code("Thyroid", now, &mut rng);
    let parts: Vec<&str> = test_code.split('-').collect();
    assert_eq!(parts[0], "TEST");
    assert_eq!(parts[1], codes::to_base36(now.as_millisecond() as u64).to_uppercase());
    assert_eq!(parts[2].len(), 3);

    assert_eq!(codes::to_base36(0), "0");
    assert_eq!(codes::to_base36(35), "z");
    assert_eq!(codes::to_base36(36), "10");
    assert_eq!(codes::booking_id("CBC-X"), "BK-CBC-X");
}
