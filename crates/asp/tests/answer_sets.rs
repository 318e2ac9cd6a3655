//! End-to-end tests: text in, answer sets out

use asp::{Engine, EngineConfig};
use asp::asp_grounding::{GroundingOptions, OptLevel};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn answer_sets_with(config: EngineConfig, text: &str) -> Vec<Vec<String>> {
    init_logging();
    let mut engine = Engine::new(config);
    let mut sets: Vec<Vec<String>> = engine
        .answer_sets(text)
        .unwrap()
        .into_iter()
        .map(|set| set.atoms().to_vec())
        .collect();
    sets.sort();
    sets
}

fn answer_sets(text: &str) -> Vec<Vec<String>> {
    answer_sets_with(EngineConfig::default(), text)
}

#[test]
fn test_builtin_filter_grounds_to_facts() {
    init_logging();
    let mut engine = Engine::default();
    let program = engine
        .load("a(1). a(2). b(X) :- a(X), X != 1. #maxint = 2.")
        .unwrap();
    let ground = engine.ground(&program).unwrap();
    assert!(ground.idb.is_empty());
    let facts: Vec<String> = ground
        .edb
        .iter()
        .map(|atom| engine.registry().display(atom).to_string())
        .collect();
    assert_eq!(facts.len(), 3);
    assert!(facts.contains(&"b(2)".to_string()));
    assert!(!facts.contains(&"b(1)".to_string()));
}

#[test]
fn test_disjunction_with_constraint_has_two_answer_sets() {
    assert_eq!(
        answer_sets("a v b. :- not a, not b."),
        vec![vec!["a".to_string()], vec!["b".to_string()]]
    );
}

#[test]
fn test_transitive_closure() {
    let sets = answer_sets(
        "edge(a,b). edge(b,c).
         reach(X,Y) :- edge(X,Y).
         reach(X,Z) :- reach(X,Y), edge(Y,Z).",
    );
    assert_eq!(sets.len(), 1);
    assert!(sets[0].contains(&"reach(a,c)".to_string()));
    assert_eq!(sets[0].len(), 5);
}

#[test]
fn test_constants_and_arithmetic() {
    let sets = answer_sets(
        "#const n = 3. #maxint = 6.
         num(X) :- #int(X), X <= n.
         double(X, Y) :- num(X), Y = X * 2.",
    );
    assert_eq!(sets.len(), 1);
    assert!(sets[0].contains(&"double(3,6)".to_string()));
    assert!(!sets[0].iter().any(|a| a.starts_with("num(4")));
}

#[test]
fn test_hamiltonian_style_choice() {
    let sets = answer_sets(
        "node(1). node(2). node(3).
         in(X) v out(X) :- node(X).
         :- in(X), in(Y), X < Y.
         some :- in(X).
         :- not some.",
    );
    // exactly one node chosen
    assert_eq!(sets.len(), 3);
    for set in &sets {
        assert_eq!(set.iter().filter(|a| a.starts_with("in(")).count(), 1);
    }
}

#[test]
fn test_head_cycle_minimality() {
    assert_eq!(
        answer_sets("a v b :- c. a :- b. b :- a. c v d."),
        vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string()]
        ]
    );
}

#[test]
fn test_optimization_levels_agree() {
    let text = "p(1). p(2). p(3).
                q(X) v r(X) :- p(X), X > 1.
                s(Z) :- q(X), q(Y), X < Y, Z = X + Y.
                :- s(5), not r(1).
                #maxint = 6.";
    let full = answer_sets(text);
    for level in [OptLevel::None, OptLevel::Builtin] {
        let config = EngineConfig {
            grounding: GroundingOptions {
                maxint: None,
                optimization: level,
            },
            ..Default::default()
        };
        assert_eq!(answer_sets_with(config, text), full, "{:?}", level);
    }
}

#[test]
fn test_threaded_generation_matches() {
    let text = "n(1). n(2). n(3). in(X) v out(X) :- n(X). :- in(1), in(2).";
    let config = EngineConfig {
        queue_capacity: Some(1),
        ..Default::default()
    };
    assert_eq!(answer_sets_with(config, text), answer_sets(text));
}

/// A propositional rule: head atoms and (atom, negated) body literals
#[derive(Debug, Clone)]
struct PropRule {
    head: Vec<usize>,
    body: Vec<(usize, bool)>,
}

const ATOMS: usize = 4;

fn render(rules: &[PropRule]) -> String {
    let mut text = String::new();
    for rule in rules {
        let head: Vec<String> = rule.head.iter().map(|a| format!("p{}", a)).collect();
        let body: Vec<String> = rule
            .body
            .iter()
            .map(|(a, neg)| if *neg { format!("not p{}", a) } else { format!("p{}", a) })
            .collect();
        text.push_str(&head.join(" v "));
        if !body.is_empty() {
            text.push_str(" :- ");
            text.push_str(&body.join(", "));
        }
        text.push_str(".\n");
    }
    text
}

/// Answer sets by checking every subset against the reduct
fn brute_force(rules: &[PropRule]) -> Vec<Vec<String>> {
    let model_of_reduct = |candidate: u32, reference: u32| {
        rules.iter().all(|rule| {
            let blocked = rule
                .body
                .iter()
                .any(|(a, neg)| *neg && reference & (1 << a) != 0);
            let body_holds = rule
                .body
                .iter()
                .filter(|(_, neg)| !neg)
                .all(|(a, _)| candidate & (1 << a) != 0);
            blocked || !body_holds || rule.head.iter().any(|a| candidate & (1 << a) != 0)
        })
    };

    let mut sets = Vec::new();
    for set in 0u32..(1 << ATOMS) {
        if !model_of_reduct(set, set) {
            continue;
        }
        let minimal = (0..set)
            .filter(|smaller| smaller & !set == 0)
            .all(|smaller| !model_of_reduct(smaller, set));
        if minimal {
            let atoms: BTreeSet<String> = (0..ATOMS)
                .filter(|a| set & (1 << a) != 0)
                .map(|a| format!("p{}", a))
                .collect();
            sets.push(atoms.into_iter().collect());
        }
    }
    sets.sort();
    sets
}

fn arb_rule() -> impl Strategy<Value = PropRule> {
    (
        proptest::collection::vec(0..ATOMS, 0..3),
        proptest::collection::vec((0..ATOMS, any::<bool>()), 0..3),
    )
        .prop_filter("rule needs a head or a body", |(head, body)| {
            !head.is_empty() || !body.is_empty()
        })
        .prop_map(|(head, body)| PropRule { head, body })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_answer_sets_match_reduct_definition(
        rules in proptest::collection::vec(arb_rule(), 1..6)
    ) {
        let text = render(&rules);
        prop_assert_eq!(answer_sets(&text), brute_force(&rules), "program:\n{}", text);
    }
}
