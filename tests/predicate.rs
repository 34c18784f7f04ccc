use querytop::{passes, Action, Check, CheckType, Compliance};

fn survivors<'a>(c: Option<&Compliance>, items: &[&'a str]) -> Vec<&'a str> {
    items.iter().copied().filter(|i| passes(c, i)).collect()
}

/// Exact membership with set {"a","b"}:
///   - `delete` drops members → ["c","d"]
///   - `save` keeps only members → ["a","b"]
#[test]
fn exact_membership_delete_and_save() {
    let items = ["a", "c", "b", "d"];
    let set = CheckType::ExactMembership { items: vec!["a".into(), "b".into()] };

    let delete = Compliance::new(Check::compile(&set).unwrap(), Action::Delete);
    assert_eq!(survivors(Some(&delete), &items), vec!["c", "d"]);

    let save = Compliance::new(Check::compile(&set).unwrap(), Action::Save);
    assert_eq!(survivors(Some(&save), &items), vec!["a", "b"]);
}

/// Exact membership is case-sensitive; normalization happens before the check.
#[test]
fn exact_membership_is_literal() {
    let check = Check::compile(&CheckType::ExactMembership { items: vec!["Rust".into()] }).unwrap();
    assert!(check.matches("Rust"));
    assert!(!check.matches("rust"));
    assert!(!check.matches("Rust "));
}

/// Pattern search is case-insensitive and unanchored; the exception vetoes a match.
#[test]
fn pattern_with_exception() {
    let check = Check::compile(&CheckType::PatternMatch {
        pattern: "porn|casino".into(),
        exception: Some("casino royale".into()),
    })
    .unwrap();

    assert!(check.matches("best CASINO online"));
    assert!(check.matches("Porn"));
    assert!(!check.matches("Casino Royale trailer"));
    assert!(!check.matches("weather"));
}

#[test]
fn pattern_without_exception() {
    let check = Check::compile(&CheckType::PatternMatch { pattern: r"^\d+$".into(), exception: None }).unwrap();
    let save = Compliance::new(check, Action::Save);
    assert_eq!(survivors(Some(&save), &["123", "12a", "", "7"]), vec!["123", "7"]);
}

/// Without a compliance test every item passes.
#[test]
fn no_compliance_keeps_everything() {
    assert_eq!(survivors(None, &["a", "", "b"]), vec!["a", "", "b"]);
}

#[test]
fn invalid_pattern_is_a_config_error() {
    let err = Check::compile(&CheckType::PatternMatch { pattern: "(".into(), exception: None })
        .err()
        .unwrap();
    assert_eq!(err.kind(), querytop::ErrorKind::Config);
}

/// An empty exception is the same as no exception: `save` on "casino" keeps it.
#[test]
fn empty_exception_is_unset() {
    let check = CheckType::PatternMatch { pattern: "casino".into(), exception: Some(String::new()) };
    let save = Compliance::new(Check::compile(&check).unwrap(), Action::Save);
    assert_eq!(survivors(Some(&save), &["casino", "news"]), vec!["casino"]);
}
