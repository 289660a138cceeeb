use medcamp_core::catalog;
use medcamp_core::models::camp::{Camp, CampStatus, PartnerType};
use medcamp_core::models::staff::StaffAssignment;
use medcamp_core::models::test_entry::{PaymentStatus, TestReportStatus, VendorStatus};
use medcamp_core::models::user::{AccountStatus, Area, Role, UserRecord};
use medcamp_core::store_keys;

fn scheduled_camp() -> Camp {
    Camp {
        camp_code: "MSHC202403151234".to_string(),
        date: jiff::civil::date(2024, 3, 15),
        clinic_code: "CL001".to_string(),
        address: "12 Main Road".to_string(),
        district: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        pin_code: "411001".to_string(),
        mobile_no: "9876543210".to_string(),
        staff: StaffAssignment {
            nurse_name: "Asha (N1)".to_string(),
            ..StaffAssignment::default()
        },
        status: CampStatus::Scheduled,
        units_sold: None,
        revenue: None,
        amount_paid_to_finance: None,
        marketing_expense: None,
        operational_expense: None,
        transaction_id: None,
        partner_type: None,
        partner_name: None,
        partner_adjusted_count: None,
        partner_adjustment_amount: None,
        vendor_name: None,
        phlebo_name: None,
        phlebo_mobile_no: None,
        report_status: None,
        created_by: "ops@example.com".to_string(),
        created_at: "2024-03-01T10:00:00Z".parse().unwrap(),
        completed_by: None,
        completed_at: None,
        cancelled_by: None,
        cancelled_at: None,
        report_status_updated_by: None,
        report_status_updated_at: None,
        last_modified: "2024-03-01T10:00:00Z".parse().unwrap(),
    }
}

#[test]
fn camp_serializes_with_flat_camel_case_fields() {
    let value = serde_json::to_value(scheduled_camp()).unwrap();

    assert_eq!(value["campCode"], "MSHC202403151234");
    assert_eq!(value["date"], "2024-03-15");
    assert_eq!(value["status"], "scheduled");
    assert_eq!(value["nurseName"], "Asha (N1)");
    assert_eq!(value["pinCode"], "411001");
    // Unset financials are omitted rather than written as null.
    assert!(value.get("revenue").is_none());
    assert!(value.get("reportStatus").is_none());
}

#[test]
fn camp_round_trips_through_json() {
    let mut camp = scheduled_camp();
    camp.partner_type = Some(PartnerType::Humana);
    let json = serde_json::to_string(&camp).unwrap();
    assert!(json.contains("\"partnerType\":\"HUMANA\""));

    let back: Camp = serde_json::from_str(&json).unwrap();
    assert_eq!(back, camp);
    assert!(back.has_partner_adjustment());
}

#[test]
fn partner_type_parses_case_insensitively() {
    assert_eq!("pahal".parse::<PartnerType>().unwrap(), PartnerType::Pahal);
    assert_eq!(" HUMANA ".parse::<PartnerType>().unwrap(), PartnerType::Humana);
    assert!("".parse::<PartnerType>().is_err());
}

#[test]
fn stage_statuses_default_to_their_initial_values() {
    assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    assert_eq!(VendorStatus::default().to_string(), "not_completed");
    assert_eq!(TestReportStatus::default().to_string(), "not_submitted");
}

#[test]
fn role_access_matrix() {
    assert!(Role::Superadmin.can_access(Area::HealthCamps));
    assert!(Role::HealthCampAdmin.can_access(Area::HealthCamps));
    assert!(!Role::IndividualCampAdmin.can_access(Area::HealthCamps));

    for role in [Role::Superadmin, Role::HealthCampAdmin, Role::IndividualCampAdmin] {
        assert!(role.can_access(Area::IndividualTests));
    }

    assert!(Role::Superadmin.can_access(Area::Superadmin));
    assert!(!Role::HealthCampAdmin.can_access(Area::Superadmin));
}

#[test]
fn user_record_defaults_to_active_without_role() {
    let record: UserRecord = serde_json::from_str("{}").unwrap();
    assert_eq!(record.role, None);
    assert_eq!(record.status, AccountStatus::Active);

    let record: UserRecord =
        serde_json::from_str(r#"{"role":"health-camp-admin","status":"blocked"}"#).unwrap();
    assert_eq!(record.role, Some(Role::HealthCampAdmin));
    assert_eq!(record.status, AccountStatus::Blocked);
}

#[test]
fn catalog_lookup_ignores_case() {
    let lipid = catalog::lookup("lipid profile").unwrap();
    assert_eq!(lipid.code, "LIP");
    assert_eq!(lipid.price, 800);
    assert_eq!(catalog::code_prefix("Blood Sugar"), "BST");
    assert_eq!(catalog::code_prefix("Thyroid"), "TEST");
    assert!(catalog::lookup("Thyroid").is_none());
}

#[test]
fn record_key_strips_direct_children_only() {
    let path = store_keys::health_camp("abc");
    assert_eq!(store_keys::record_key(&path, store_keys::HEALTH_CAMPS_PREFIX), Some("abc"));
    assert_eq!(
        store_keys::record_key("healthCamps/a/b", store_keys::HEALTH_CAMPS_PREFIX),
        None
    );
    assert_eq!(store_keys::clinic(" cl001 "), "clinics/CL001");
    assert_eq!(store_keys::user("u-1"), "users/u-1");
}
