use crate::completion::{completion_breakdown, profile_completion};
use crate::edc_number::{
    check_digit, format_edc_number, generate_edc_number, generate_edc_number_with,
    parse_edc_number, validate_edc_number,
};
use crate::integrity::{
    canonical_profile_json, data_hash, merkle_root, profile_hash, sha256_hex,
    verify_data_integrity, verify_profile,
};
use crate::patch::{AddressPatch, Patch, PersonalDetailsPatch, ProfilePatch, VerificationPatch};
use crate::profile::*;
use crate::validation::validate_personal_details;
use crate::ProfileError;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 20, 9, 30, 0).unwrap()
}

fn empty_profile() -> EmployeeProfile {
    EmployeeProfile::new(PersonalDetails::default(), fixed_now())
}

fn asha_rao() -> PersonalDetails {
    PersonalDetails {
        edc_number: Some("EDC-2024-12345678".into()),
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        date_of_birth: "1992-04-18".into(),
        gender: Gender::Female,
        email: "asha.rao@example.in".into(),
        phone: "9876543210".into(),
        address: Address {
            street: "12 MG Road".into(),
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            pin_code: "560001".into(),
            country: "India".into(),
        },
        aadhaar_number: Some("123456789012".into()),
        pan_number: None,
        photo: None,
    }
}

fn work_entry(id: &str) -> WorkExperience {
    WorkExperience {
        id: id.into(),
        company_name: "Infotech Pvt Ltd".into(),
        designation: "Engineer".into(),
        start_date: "2018-07-01".into(),
        end_date: None,
        currently_working: true,
        responsibilities: "Payments backend".into(),
        achievements: None,
        certificate_url: None,
    }
}

fn education_entry(id: &str) -> Education {
    Education {
        id: id.into(),
        institution_name: "VTU".into(),
        degree: "B.E.".into(),
        field_of_study: "Computer Science".into(),
        start_year: "2010".into(),
        end_year: Some("2014".into()),
        percentage: Some(78.5),
        grade: None,
        certificate_url: None,
    }
}

fn salary_entry(ctc: f64) -> SalaryHistory {
    SalaryHistory {
        id: "s1".into(),
        company_name: "Infotech Pvt Ltd".into(),
        designation: "Engineer".into(),
        ctc,
        base_pay: ctc * 0.6,
        bonuses: None,
        start_date: "2018-07-01".into(),
        end_date: None,
        is_visible: false,
    }
}

fn verified_epf() -> EpfDetails {
    EpfDetails {
        uan_number: "100200300400".into(),
        employee_name: "Asha Rao".into(),
        is_verified: true,
        last_updated: "2024-11-20T09:30:00Z".into(),
        ..EpfDetails::default()
    }
}

fn full_profile() -> EmployeeProfile {
    let mut personal = asha_rao();
    personal.photo = Some("data:image/png;base64,AAAA".into());
    let mut profile = EmployeeProfile::new(personal, fixed_now());
    profile.work_experience.push(work_entry("w1"));
    profile.education.push(education_entry("e1"));
    profile.epf_details = Some(verified_epf());
    profile.verification_status.background_check.status = CheckStatus::Verified;
    profile.verification_status.criminal_record.status = CriminalRecordStatus::Clear;
    profile
}

fn sample_record(data_hash: &str) -> BlockchainRecord {
    BlockchainRecord {
        data_hash: data_hash.into(),
        transaction_hash: format!("0x{}", "ab".repeat(32)),
        block_number: 15_123_456,
        timestamp: 1_732_095_000_000,
        network: "Mock Blockchain".into(),
    }
}

#[test]
fn empty_profile_scores_zero() {
    let profile = empty_profile();
    assert_eq!(profile_completion(&profile), 0);
    assert_eq!(profile.profile_completion, 0);
}

#[test]
fn full_profile_scores_hundred() {
    let profile = full_profile();
    assert_eq!(profile_completion(&profile), 100);
    let breakdown = completion_breakdown(&profile);
    assert_eq!(breakdown.personal, 40);
    assert_eq!(breakdown.work_experience, 20);
    assert_eq!(breakdown.education, 20);
    assert_eq!(breakdown.epf, 10);
    assert_eq!(breakdown.verification, 10);
}

#[test]
fn asha_rao_without_photo_scores_35() {
    let profile = EmployeeProfile::new(asha_rao(), fixed_now());
    let breakdown = completion_breakdown(&profile);
    assert_eq!(breakdown.personal, 35);
    assert_eq!(breakdown.work_experience, 0);
    assert_eq!(breakdown.education, 0);
    assert_eq!(breakdown.epf, 0);
    assert_eq!(breakdown.verification, 0);
    assert_eq!(profile_completion(&profile), 35);
}

#[test]
fn empty_strings_count_as_absent() {
    let mut personal = asha_rao();
    personal.first_name = String::new();
    personal.aadhaar_number = Some(String::new());
    personal.photo = Some(String::new());
    let profile = EmployeeProfile::new(personal, fixed_now());
    assert_eq!(completion_breakdown(&profile).personal, 25);
}

#[test]
fn unverified_epf_and_in_progress_checks_earn_nothing() {
    let mut profile = EmployeeProfile::new(asha_rao(), fixed_now());
    profile.epf_details = Some(EpfDetails {
        is_verified: false,
        ..verified_epf()
    });
    profile.verification_status.background_check.status = CheckStatus::InProgress;
    profile.verification_status.criminal_record.status = CriminalRecordStatus::IssuesFound;
    assert_eq!(profile_completion(&profile), 35);

    profile.verification_status.criminal_record.status = CriminalRecordStatus::Clear;
    assert_eq!(profile_completion(&profile), 40);
}

#[test]
fn randomized_profiles_score_in_five_point_steps() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let mut profile = empty_profile();
        if rng.gen_bool(0.5) {
            profile.personal_details = asha_rao();
        }
        for i in 0..rng.gen_range(0..3) {
            profile.work_experience.push(work_entry(&format!("w{i}")));
        }
        for i in 0..rng.gen_range(0..3) {
            profile.education.push(education_entry(&format!("e{i}")));
        }
        if rng.gen_bool(0.5) {
            profile.epf_details = Some(verified_epf());
        }
        let score = profile_completion(&profile);
        assert!(score <= 100);
        assert_eq!(score % 5, 0);
    }
}

fn arb_profile() -> impl Strategy<Value = EmployeeProfile> {
    (
        proptest::collection::vec(any::<bool>(), 8),
        0usize..3,
        0usize..3,
        proptest::option::of(any::<bool>()),
        0usize..4,
        0usize..4,
    )
        .prop_map(|(fields, work, edu, epf, bg, cr)| {
            let text = |on: bool, v: &str| if on { v.to_string() } else { String::new() };
            let personal = PersonalDetails {
                first_name: text(fields[0], "Asha"),
                last_name: text(fields[1], "Rao"),
                date_of_birth: text(fields[2], "1992-04-18"),
                email: text(fields[3], "asha@example.in"),
                phone: text(fields[4], "9876543210"),
                address: Address {
                    city: text(fields[5], "Pune"),
                    ..Address::default()
                },
                aadhaar_number: fields[6].then(|| "123456789012".to_string()),
                photo: fields[7].then(|| "photo.png".to_string()),
                ..PersonalDetails::default()
            };
            let mut profile = EmployeeProfile::new(personal, fixed_now());
            profile.work_experience = (0..work).map(|i| work_entry(&format!("w{i}"))).collect();
            profile.education = (0..edu).map(|i| education_entry(&format!("e{i}"))).collect();
            profile.epf_details = epf.map(|is_verified| EpfDetails {
                is_verified,
                ..verified_epf()
            });
            profile.verification_status.background_check.status = [
                CheckStatus::Pending,
                CheckStatus::InProgress,
                CheckStatus::Verified,
                CheckStatus::Failed,
            ][bg];
            profile.verification_status.criminal_record.status = [
                CriminalRecordStatus::Pending,
                CriminalRecordStatus::InProgress,
                CriminalRecordStatus::Clear,
                CriminalRecordStatus::IssuesFound,
            ][cr];
            profile
        })
}

proptest! {
    #[test]
    fn score_stays_within_bounds(profile in arb_profile()) {
        let score = profile_completion(&profile);
        prop_assert!(score <= 100);
        prop_assert_eq!(u32::from(score), completion_breakdown(&profile).earned());
    }

    #[test]
    fn filling_a_category_never_lowers_the_score(profile in arb_profile()) {
        let before = profile_completion(&profile);

        let mut more_work = profile.clone();
        more_work.work_experience.push(work_entry("extra"));
        prop_assert!(profile_completion(&more_work) >= before);

        let mut more_edu = profile.clone();
        more_edu.education.push(education_entry("extra"));
        prop_assert!(profile_completion(&more_edu) >= before);

        let mut epf = profile.clone();
        epf.epf_details = Some(verified_epf());
        prop_assert!(profile_completion(&epf) >= before);

        let mut photo = profile.clone();
        photo.personal_details.photo = Some("photo.png".into());
        prop_assert!(profile_completion(&photo) >= before);
    }
}

#[test]
fn sha256_matches_known_vectors() {
    assert_eq!(
        sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn non_finite_percentage_is_rejected_not_hashed() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let mut profile = full_profile();
        profile.education[0].percentage = Some(bad);
        match profile_hash(&profile) {
            Err(crate::HashError::NonFinite { field, .. }) => {
                assert_eq!(field, "education[0].percentage")
            }
            other => panic!("expected NonFinite, got {other:?}"),
        }
        assert!(canonical_profile_json(&profile).is_err());
        assert!(verify_profile(&profile, &"0".repeat(64)).is_err());
    }

    let mut profile = full_profile();
    profile.education[0].percentage = None;
    assert!(profile_hash(&profile).is_ok());
}

#[test]
fn profile_hash_is_deterministic_lowercase_hex() {
    let profile = full_profile();
    let first = profile_hash(&profile).unwrap();
    let second = profile_hash(&profile.clone()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn canonical_payload_has_fixed_section_order_and_excludes_private_fields() {
    let mut profile = full_profile();
    profile.salary_history.push(salary_entry(1_800_000.0));
    profile.blockchain_record = Some(sample_record("deadbeef"));
    let canonical = canonical_profile_json(&profile).unwrap();

    assert!(canonical.starts_with(r#"{"personalDetails":{"edcNumber":"EDC-2024-12345678","firstName":"Asha""#));
    let pd = canonical.find("\"personalDetails\"").unwrap();
    let we = canonical.find("\"workExperience\"").unwrap();
    let ed = canonical.find("\"education\"").unwrap();
    let vs = canonical.find("\"verificationStatus\"").unwrap();
    assert!(pd < we && we < ed && ed < vs);

    for excluded in ["salaryHistory", "ctc", "blockchainRecord", "epfDetails", "createdAt"] {
        assert!(!canonical.contains(excluded), "{excluded} leaked into the fingerprint");
    }
    assert_eq!(profile_hash(&profile).unwrap(), sha256_hex(canonical.as_bytes()));
}

#[test]
fn hash_changes_with_each_hashed_section() {
    let base = full_profile();
    let base_hash = profile_hash(&base).unwrap();

    let mut personal = base.clone();
    personal.personal_details.phone = "9123456780".into();
    assert_ne!(profile_hash(&personal).unwrap(), base_hash);

    let mut work = base.clone();
    work.work_experience[0].designation = "Senior Engineer".into();
    assert_ne!(profile_hash(&work).unwrap(), base_hash);

    let mut education = base.clone();
    education.education.push(education_entry("e2"));
    assert_ne!(profile_hash(&education).unwrap(), base_hash);

    let mut verification = base.clone();
    verification.verification_status.document_verification.status = CheckStatus::Verified;
    assert_ne!(profile_hash(&verification).unwrap(), base_hash);
}

#[test]
fn hash_ignores_salary_ledger_epf_and_timestamps() {
    let base = full_profile();
    let base_hash = profile_hash(&base).unwrap();

    let mut other = base.clone();
    other.salary_history = vec![salary_entry(2_400_000.0)];
    other.blockchain_record = Some(sample_record(&base_hash));
    other.epf_details = None;
    other.updated_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    other.profile_completion = 90;

    assert_eq!(profile_hash(&other).unwrap(), base_hash);
}

#[test]
fn hash_survives_json_round_trip() {
    let mut profile = full_profile();
    profile.salary_history.push(salary_entry(1_200_000.0));
    let stored = profile.to_json_pretty().unwrap();
    let restored = EmployeeProfile::from_json(&stored).unwrap();
    assert_eq!(profile_hash(&restored).unwrap(), profile_hash(&profile).unwrap());
}

#[test]
fn verify_accepts_own_hash_and_rejects_single_flip() {
    let profile = full_profile();
    let hash = profile_hash(&profile).unwrap();
    assert!(verify_profile(&profile, &hash).unwrap());
    assert!(verify_profile(&profile, &hash.to_ascii_uppercase()).unwrap());

    let mut flipped: Vec<char> = hash.chars().collect();
    flipped[10] = if flipped[10] == '0' { '1' } else { '0' };
    let flipped: String = flipped.into_iter().collect();
    assert!(!verify_profile(&profile, &flipped).unwrap());
}

#[test]
fn verify_data_integrity_covers_arbitrary_payloads() {
    let payload = serde_json::json!({ "uan": "100200300400", "balance": 125000 });
    let hash = data_hash(&payload).unwrap();
    assert!(verify_data_integrity(&payload, &hash).unwrap());
    assert!(!verify_data_integrity(&payload, "").unwrap());
}

#[test]
fn merkle_root_degenerate_cases() {
    let empty: [&str; 0] = [];
    assert_eq!(merkle_root(&empty).unwrap(), "");
    let h = profile_hash(&full_profile()).unwrap();
    assert_eq!(merkle_root(&[h.as_str()]).unwrap(), h);
}

#[test]
fn merkle_root_hashes_flat_concatenation_in_order() {
    let h1 = profile_hash(&full_profile()).unwrap();
    let h2 = profile_hash(&empty_profile()).unwrap();

    let root = merkle_root(&[h1.clone(), h2.clone()]).unwrap();
    assert_eq!(root, data_hash(&format!("{h1}{h2}")).unwrap());
    assert_eq!(root, sha256_hex(format!("\"{h1}{h2}\"").as_bytes()));
    assert_ne!(root, merkle_root(&[h2, h1]).unwrap());
}

#[test]
fn missing_structural_fields_are_rejected() {
    let err = EmployeeProfile::from_json(r#"{"workExperience": []}"#).unwrap_err();
    assert!(matches!(err, ProfileError::Malformed(_)));
}

#[test]
fn stored_blob_with_optional_sections_missing_parses() {
    let raw = r#"{
        "personalDetails": {
            "firstName": "Asha", "lastName": "Rao", "dateOfBirth": "1992-04-18",
            "gender": "Female", "email": "asha@example.in", "phone": "9876543210",
            "address": {"street": "", "city": "Pune", "state": "", "pinCode": "", "country": "India"}
        },
        "verificationStatus": {
            "backgroundCheck": {"status": "in-progress"},
            "criminalRecord": {"status": "issues-found"},
            "documentVerification": {"status": "pending", "verifiedDocuments": []}
        },
        "createdAt": "2024-11-20T09:30:00Z",
        "updatedAt": "2024-11-20T09:30:00Z"
    }"#;
    let profile = EmployeeProfile::from_json(raw).unwrap();
    assert!(profile.work_experience.is_empty());
    assert!(profile.epf_details.is_none());
    assert_eq!(
        profile.verification_status.background_check.status,
        CheckStatus::InProgress
    );
    assert_eq!(profile_completion(&profile), 30);
}

#[test]
fn personal_patch_keeps_absent_fields() {
    let prior = asha_rao();
    let patch = PersonalDetailsPatch {
        photo: Some("photo.png".into()),
        address: Some(AddressPatch {
            city: Some("Mysuru".into()),
            ..AddressPatch::default()
        }),
        ..PersonalDetailsPatch::default()
    };
    let merged = patch.apply(&prior);
    assert_eq!(merged.photo.as_deref(), Some("photo.png"));
    assert_eq!(merged.address.city, "Mysuru");
    assert_eq!(merged.address.street, prior.address.street);
    assert_eq!(merged.first_name, prior.first_name);
    assert_eq!(merged.aadhaar_number, prior.aadhaar_number);
}

#[test]
fn profile_patch_replaces_sections_and_keeps_metadata() {
    let prior = EmployeeProfile::new(asha_rao(), fixed_now());
    let patch = ProfilePatch {
        work_experience: Some(vec![work_entry("w1")]),
        verification_status: Some(VerificationPatch {
            criminal_record: Some(CriminalRecordCheck {
                status: CriminalRecordStatus::Clear,
                ..CriminalRecordCheck::default()
            }),
            ..VerificationPatch::default()
        }),
        ..ProfilePatch::default()
    };
    assert!(!patch.is_empty());
    let merged = patch.apply(&prior);
    assert_eq!(merged.work_experience.len(), 1);
    assert!(merged.education.is_empty());
    assert_eq!(
        merged.verification_status.criminal_record.status,
        CriminalRecordStatus::Clear
    );
    assert_eq!(
        merged.verification_status.background_check,
        prior.verification_status.background_check
    );
    assert_eq!(merged.created_at, prior.created_at);
    assert_eq!(merged.personal_details, prior.personal_details);
    assert!(ProfilePatch::default().is_empty());
}

#[test]
fn edc_numbers_generate_validate_and_format() {
    let generated = generate_edc_number();
    assert!(validate_edc_number(&generated), "{generated}");

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let n = generate_edc_number_with(&mut rng, 2024);
        assert!(n.starts_with("EDC-2024-"));
        assert!(validate_edc_number(&n));
    }

    assert_eq!(format_edc_number("EDC-2024-12345678"), "EDC-2024-1234 5678");
    assert_eq!(format_edc_number("not-a-card"), "not-a-card");
    assert_eq!(format_edc_number(""), "");
    assert!(!validate_edc_number("EDC-24-12345678"));
    assert!(!validate_edc_number("EDC-2024-1234567"));
    assert!(parse_edc_number("EDC-2024-1234567x").is_err());
}

#[test]
fn check_digit_weights_by_position() {
    assert_eq!(check_digit("123"), 4);
    assert_eq!(check_digit("EDC-2024"), 6);
    assert_eq!(check_digit(""), 0);
}

#[test]
fn check_digit_is_total_on_long_input() {
    assert_eq!(check_digit(&"9".repeat(40_000)), 0);
    assert_eq!(check_digit(&"7".repeat(123_457)), 1);
    assert_eq!(check_digit(&format!("EDC-{}", "8".repeat(99_999))), 8);
}

#[test]
fn personal_details_validation() {
    assert!(validate_personal_details(&asha_rao()).is_valid());

    let mut spaced = asha_rao();
    spaced.phone = "98765-43210".into();
    spaced.aadhaar_number = Some("1234 5678 9012".into());
    assert!(validate_personal_details(&spaced).is_valid());

    let mut bad = PersonalDetails {
        email: "asha@example".into(),
        phone: "12345".into(),
        aadhaar_number: Some("123".into()),
        ..PersonalDetails::default()
    };
    let report = validate_personal_details(&bad);
    assert_eq!(report.errors["firstName"], "First name is required");
    assert_eq!(report.errors["lastName"], "Last name is required");
    assert_eq!(report.errors["email"], "Invalid email format");
    assert_eq!(report.errors["phone"], "Phone number must be 10 digits");
    assert_eq!(report.errors["dateOfBirth"], "Date of birth is required");
    assert_eq!(report.errors["aadhaarNumber"], "Aadhaar must be 12 digits");

    bad.email.clear();
    let err = validate_personal_details(&bad).into_result().unwrap_err();
    assert!(err.to_string().contains("email: Email is required"));
}
