use cdclsat::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Random 3-SAT near the satisfiability threshold of 4.26 clauses per variable
fn random_3sat(rng: &mut impl Rng, num_vars: usize) -> Formula {
    let num_clauses = num_vars * 426 / 100;
    let clauses = (0..num_clauses)
        .map(|_| {
            let mut vars = Vec::with_capacity(3);
            while vars.len() < 3 {
                let var = rng.gen_range(1, num_vars + 1);
                if !vars.contains(&var) {
                    vars.push(var);
                }
            }
            Clause::new(vars.into_iter().map(|var| Literal::new(var, rng.gen::<bool>())))
        })
        .collect::<Vec<_>>();
    Formula::new(clauses)
}

pub fn cdcl(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5a7);
    let mut group = c.benchmark_group("random 3-sat");
    for num_vars in [10, 20, 30] {
        let formula = random_3sat(&mut rng, num_vars);
        group.bench_with_input(BenchmarkId::new("cdcl", num_vars), &formula, |b, formula| {
            b.iter(|| solve(formula))
        });
        group.bench_with_input(BenchmarkId::new("dpll", num_vars), &formula, |b, formula| {
            b.iter(|| DpllSolver::new().solve(formula))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = cdcl
}
criterion_main!(benches);
