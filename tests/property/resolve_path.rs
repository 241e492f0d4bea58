use proptest::prelude::*;
use valdn::path::{is_descendant, join, parent, resolve, wildcard_key};
use valdn::{Rules, rules};

fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9]{1,4}", 0..5).prop_map(|segs| segs.join("."))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn parent_inverts_join(p in arb_path(), seg in "[a-z0-9]{1,4}") {
        let child = join(&p, &seg);
        prop_assert_eq!(parent(&child), p.as_str());
        prop_assert!(is_descendant(&child, &p));
        prop_assert!(!is_descendant(&p, &child));
    }

    #[test]
    fn wildcard_key_targets_direct_parent(p in arb_path(), seg in "[a-z0-9]{1,4}") {
        let child = join(&p, &seg);
        let expected = if p.is_empty() { "*".to_string() } else { format!("{}.*", p) };
        prop_assert_eq!(wildcard_key(&child), expected);
    }

    #[test]
    fn exact_entry_always_wins(p in arb_path(), seg in "[a-z0-9]{1,4}") {
        let child = join(&p, &seg);
        let mut rules = Rules::new();
        rules.insert(child.clone(), vec!["exact".to_string()]);
        rules.insert(wildcard_key(&child), vec!["wild".to_string()]);
        prop_assert_eq!(resolve(&rules, &child), &["exact".to_string()][..]);

        rules.remove(&child);
        prop_assert_eq!(resolve(&rules, &child), &["wild".to_string()][..]);
    }

    #[test]
    fn sibling_prefix_is_not_descendant(p in "[a-z]{1,4}", extra in "[a-z]{1,3}") {
        let sibling = format!("{}{}", p, extra);
        prop_assert!(!is_descendant(&sibling, &p));
    }

    #[test]
    fn resolve_never_panics(path in "\\PC{0,20}") {
        let rules = rules! { "*" => ["required"], "a.*" => ["min:1"] };
        let _ = resolve(&rules, &path);
    }
}

#[test]
fn root_only_matches_explicit_entry() {
    let rules = rules! { "*" => ["required"] };
    assert!(resolve(&rules, "").is_empty());

    let rules = rules! { "" => ["required"] };
    assert_eq!(resolve(&rules, ""), &["required".to_string()][..]);
}
