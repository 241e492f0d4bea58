use super::common::{arb_json, arb_object, extract_paths};
use proptest::prelude::*;
use valdn::path::is_descendant;
use valdn::{Config, Registry, Rules, Session, Value};

const RULE_POOL: &[&str] = &["required", "min:2", "max:1", "numeric", "alpha", "len:0", "in:a,1"];

/// Builds a rule table by assigning pool rules to paths of `json`, plus a
/// few paths that do not exist in it.
fn assign_rules(json: &serde_json::Value, picks: &[(usize, usize)]) -> Rules {
    let mut paths = Vec::new();
    extract_paths(json, "", &mut paths);
    paths.extend(["missing".to_string(), "missing.deep".to_string()]);
    for p in paths.clone() {
        paths.push(format!("{}.*", p));
    }

    let mut rules = Rules::new();
    for &(path_idx, rule_idx) in picks {
        let path = &paths[path_idx % paths.len()];
        rules
            .entry(path.clone())
            .or_default()
            .push(RULE_POOL[rule_idx % RULE_POOL.len()].to_string());
    }
    rules
}

fn run(value: &Value, rules: &Rules) -> (valdn::Errors, std::collections::HashSet<String>) {
    let registry = Registry::with_defaults();
    let config = Config::default();
    let mut session = Session::new(&registry, &config, rules);
    session.run(value).expect("pool rules are well formed");
    let visited = session.visited().clone();
    (session.into_errors(), visited)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn no_rules_no_errors(json in arb_json(3)) {
        let errors = valdn::validate_value(&Value::from(json), &Rules::new()).unwrap();
        prop_assert!(errors.is_empty());
    }

    #[test]
    fn failed_nodes_hide_their_subtree(
        json in arb_object(3),
        picks in prop::collection::vec((any::<usize>(), any::<usize>()), 0..12),
    ) {
        let rules = assign_rules(&json, &picks);
        let (errors, visited) = run(&Value::from(json), &rules);
        for failed in errors.keys().filter(|p| visited.contains(*p)) {
            for other in errors.keys() {
                prop_assert!(!is_descendant(other, failed), "{} reported below failed {}", other, failed);
            }
            for seen in &visited {
                prop_assert!(!is_descendant(seen, failed), "{} visited below failed {}", seen, failed);
            }
        }
    }

    #[test]
    fn errors_are_visited_or_required(
        json in arb_object(3),
        picks in prop::collection::vec((any::<usize>(), any::<usize>()), 0..12),
    ) {
        let rules = assign_rules(&json, &picks);
        let (errors, visited) = run(&Value::from(json), &rules);
        for path in errors.keys() {
            let required_absent = rules
                .get(path)
                .is_some_and(|spec| spec.iter().any(|r| r == "required"));
            prop_assert!(
                visited.contains(path) || required_absent,
                "{} neither visited nor required", path
            );
            prop_assert!(!path.ends_with('*'), "wildcard key {} reported", path);
        }
    }

    #[test]
    fn validation_is_repeatable(
        json in arb_object(3),
        picks in prop::collection::vec((any::<usize>(), any::<usize>()), 0..12),
    ) {
        let rules = assign_rules(&json, &picks);
        let before = rules.clone();
        let value = Value::from(json);
        let first = valdn::validate_value(&value, &rules).unwrap();
        let second = valdn::validate_value(&value, &rules).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(rules, before);
    }
}
