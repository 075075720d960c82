//! Performance sanity: VSIDS + Luby on uniform random 3-SAT at the phase
//! transition must stay comfortably inside a wall-clock budget.

use criterion::{criterion_group, criterion_main, Criterion};
use verdict_base::utils::XorShift64;
use verdict_base::{Lit, Var};
use verdict_cdcl::{CdclConfig, CdclSolver, SatResult};
use verdict_format::Instance;

fn random_3sat(seed: u64, num_vars: usize, num_clauses: usize) -> Instance {
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

fn bench_vsids_luby(c: &mut Criterion) {
    let instances: Vec<Instance> = (0..8).map(|i| random_3sat(1000 + i, 100, 420)).collect();

    c.bench_function("vsids_luby_random3sat_100v", |b| {
        b.iter(|| {
            for instance in &instances {
                let result = CdclSolver::with_config(instance, CdclConfig::vsids_luby()).solve();
                assert!(matches!(result, SatResult::Sat(_) | SatResult::Unsat));
            }
        });
    });
}

criterion_group!(benches, bench_vsids_luby);
criterion_main!(benches);
