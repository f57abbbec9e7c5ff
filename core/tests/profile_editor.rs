use churn_core::{
    editor::{set_field, ProfileField},
    profile::{Gender, LastInteraction, ProfileData, ServiceType},
};

#[test]
fn numeric_edits_clamp_and_snap() {
    let mut p = ProfileData::default();

    set_field(&mut p, ProfileField::Age, "95").unwrap();
    assert_eq!(p.age, 80);
    set_field(&mut p, ProfileField::Age, "3").unwrap();
    assert_eq!(p.age, 18);

    set_field(&mut p, ProfileField::Income, "123456").unwrap();
    assert_eq!(p.income, 125_000);
    set_field(&mut p, ProfileField::Income, "1").unwrap();
    assert_eq!(p.income, 20_000);

    set_field(&mut p, ProfileField::MonthlySpend, "1234").unwrap();
    assert_eq!(p.monthly_spend, 1_250);

    set_field(&mut p, ProfileField::Tenure, "0").unwrap();
    assert_eq!(p.tenure, 1);

    set_field(&mut p, ProfileField::SupportCalls, "7.6").unwrap();
    assert_eq!(p.support_calls, 8);
    assert!(p.is_within_bounds());
}

#[test]
fn enum_edits_match_labels_case_insensitively() {
    let mut p = ProfileData::default();
    set_field(&mut p, ProfileField::Gender, "female").unwrap();
    set_field(&mut p, ProfileField::ServiceType, "BASIC").unwrap();
    set_field(&mut p, ProfileField::LastInteraction, "over 3 months").unwrap();
    set_field(&mut p, ProfileField::AutoPay, "off").unwrap();

    assert_eq!(p.gender, Gender::Female);
    assert_eq!(p.service_type, ServiceType::Basic);
    assert_eq!(p.last_interaction, LastInteraction::Over3Months);
    assert!(!p.auto_pay);
}

#[test]
fn invalid_edits_leave_the_profile_untouched() {
    let mut p = ProfileData::default();
    let before = p.clone();

    assert!(set_field(&mut p, ProfileField::Age, "old").is_err());
    assert!(set_field(&mut p, ProfileField::ServiceType, "Gold").is_err());
    assert!(set_field(&mut p, ProfileField::AutoPay, "maybe").is_err());
    assert!(set_field(&mut p, ProfileField::Income, "inf").is_err());
    assert_eq!(p, before);
}

#[test]
fn field_names_parse_in_several_spellings() {
    assert_eq!("monthlySpend".parse::<ProfileField>().unwrap(), ProfileField::MonthlySpend);
    assert_eq!("monthly_spend".parse::<ProfileField>().unwrap(), ProfileField::MonthlySpend);
    assert_eq!("last-interaction".parse::<ProfileField>().unwrap(), ProfileField::LastInteraction);
    assert!("shoeSize".parse::<ProfileField>().is_err());
}
