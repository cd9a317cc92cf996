use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E2001.to_string(), "E2001");
    assert_eq!(ErrorCode::E6003.as_str(), "E6003");
}

#[test]
fn test_phase_classification() {
    assert!(ErrorCode::E2008.is_construction_error());
    assert!(!ErrorCode::E2008.is_eval_error());
    assert!(ErrorCode::E6001.is_eval_error());
    assert!(ErrorCode::W2002.is_warning());
    assert!(!ErrorCode::W2002.is_construction_error());
}

#[test]
fn test_from_str_round_trips_all_codes() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
    assert_eq!("e6002".parse::<ErrorCode>(), Ok(ErrorCode::E6002));
    assert!("E9999".parse::<ErrorCode>().is_err());
}

#[test]
fn test_all_codes_unique() {
    let mut seen = std::collections::HashSet::new();
    for code in ErrorCode::ALL {
        assert!(seen.insert(code.as_str()), "duplicate code {code}");
    }
}
