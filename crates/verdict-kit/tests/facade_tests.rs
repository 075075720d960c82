//! End-to-end tests through the public solving API.

use verdict_kit::{race, solve, Instance, SatResult, SolverKind};

fn solve_text(text: &str, kind: SolverKind) -> SatResult {
    let instance = Instance::from_str(text).expect("test input must parse");
    solve(&instance, kind)
}

fn assert_model_satisfies(instance: &Instance, model: &[bool]) {
    for clause in instance.clauses() {
        assert!(
            clause
                .iter()
                .any(|lit| model[lit.var().index()] == lit.is_positive()),
            "clause {clause:?} not satisfied",
        );
    }
}

// =============================================================================
// Concrete scenarios, all configurations
// =============================================================================

#[test]
fn single_positive_unit() {
    for kind in SolverKind::ALL {
        match solve_text("p cnf 1 1\n1 0\n", kind) {
            SatResult::Sat(model) => assert_eq!(model, vec![true]),
            other => panic!("{kind}: expected SAT, got {other:?}"),
        }
    }
}

#[test]
fn contradicting_units() {
    for kind in SolverKind::ALL {
        assert_eq!(
            solve_text("p cnf 1 2\n1 0\n-1 0\n", kind),
            SatResult::Unsat,
            "{kind}"
        );
    }
}

#[test]
fn three_variable_chain() {
    let text = "p cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n";
    let instance = Instance::from_str(text).unwrap();
    for kind in SolverKind::ALL {
        match solve(&instance, kind) {
            SatResult::Sat(model) => assert_model_satisfies(&instance, &model),
            other => panic!("{kind}: expected SAT, got {other:?}"),
        }
    }
}

#[test]
fn all_eight_clauses_over_three_variables() {
    let mut text = String::from("p cnf 3 8\n");
    for mask in 0..8 {
        for v in 1..=3 {
            let lit = if mask >> (v - 1) & 1 == 1 { -v } else { v };
            text.push_str(&format!("{lit} "));
        }
        text.push_str("0\n");
    }
    for kind in SolverKind::ALL {
        assert_eq!(solve_text(&text, kind), SatResult::Unsat, "{kind}");
    }
}

#[test]
fn pigeonhole_three_into_two() {
    // Variables p*2 + h + 1: pigeon p sits in hole h.
    let text = "p cnf 6 9\n\
                1 2 0\n3 4 0\n5 6 0\n\
                -1 -3 0\n-1 -5 0\n-3 -5 0\n\
                -2 -4 0\n-2 -6 0\n-4 -6 0\n";
    for kind in SolverKind::ALL {
        assert_eq!(solve_text(text, kind), SatResult::Unsat, "{kind}");
    }
}

#[test]
fn free_variables_default_to_true() {
    // Variable 2 is mentioned nowhere.
    match solve_text("p cnf 2 1\n1 0\n", SolverKind::CdclVsidsLuby) {
        SatResult::Sat(model) => assert_eq!(model, vec![true, true]),
        other => panic!("expected SAT, got {other:?}"),
    }
}

// =============================================================================
// Cross-configuration agreement on random 3-SAT
// =============================================================================

fn random_3sat(seed: u64, num_vars: usize, num_clauses: usize) -> Instance {
    use verdict_base::utils::XorShift64;
    use verdict_base::{Lit, Var};

    let mut rng = XorShift64::new(seed);
    let mut instance = Instance::new(num_vars);
    for _ in 0..num_clauses {
        let mut clause: Vec<Lit> = Vec::with_capacity(3);
        while clause.len() < 3 {
            let var = Var::new(rng.next_below(num_vars as u64) as u32);
            if clause.iter().any(|l| l.var() == var) {
                continue;
            }
            clause.push(Lit::new(var, rng.next_bool()));
        }
        instance.push_clause(clause);
    }
    instance
}

fn assert_agreement(instance: &Instance, kinds: &[SolverKind]) {
    let verdicts: Vec<bool> = kinds
        .iter()
        .map(|&kind| match solve(instance, kind) {
            SatResult::Sat(model) => {
                assert_model_satisfies(instance, &model);
                true
            }
            SatResult::Unsat => false,
            SatResult::Interrupted => panic!("no stop flag was set"),
        })
        .collect();
    assert!(
        verdicts.iter().all(|&v| v == verdicts[0]),
        "configurations disagree: {verdicts:?}"
    );
}

#[test]
fn all_configurations_agree_on_small_random_3sat() {
    for seed in [0x3a7, 0x3a8, 0x3a9] {
        // 25 variables at ratio 4.2; small enough for plain DPLL.
        let instance = random_3sat(seed, 25, 105);
        assert_agreement(&instance, &SolverKind::ALL);
    }
}

#[test]
fn cdcl_configurations_agree_on_phase_transition_3sat() {
    for seed in [0xc0de, 0xc0df, 0xc0e0] {
        // 50 variables at ratio 4.2, the classic hard region.
        let instance = random_3sat(seed, 50, 210);
        assert_agreement(
            &instance,
            &[SolverKind::CdclBasic, SolverKind::CdclVsids, SolverKind::CdclVsidsLuby],
        );
    }
}

// =============================================================================
// Racing
// =============================================================================

#[test]
fn race_solves_and_names_the_winner() {
    let instance = Instance::from_str("p cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n").unwrap();
    let outcome = race(&instance, &SolverKind::ALL, None).expect("must finish");
    match outcome.result {
        SatResult::Sat(model) => assert_model_satisfies(&instance, &model),
        other => panic!("expected SAT, got {other:?}"),
    }
}
