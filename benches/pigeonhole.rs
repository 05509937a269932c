use cdclsat::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// `holes + 1` pigeons in `holes` holes, which is unsatisfiable. Variable
/// `pigeon * holes + hole` places a pigeon in a hole.
fn pigeonhole(holes: usize) -> Formula {
    let var = |pigeon: usize, hole: usize| pigeon * holes + hole;
    let mut clauses = Vec::new();
    for pigeon in 0..=holes {
        clauses.push(Clause::new((0..holes).map(|hole| Literal::positive(var(pigeon, hole)))));
    }
    for hole in 0..holes {
        for first in 0..=holes {
            for second in first + 1..=holes {
                clauses.push(Clause::new(vec![
                    Literal::negative(var(first, hole)),
                    Literal::negative(var(second, hole)),
                ]));
            }
        }
    }
    Formula::new(clauses)
}

pub fn cdcl(c: &mut Criterion) {
    let mut group = c.benchmark_group("pigeonhole");
    for holes in [2, 3, 4] {
        let formula = pigeonhole(holes);
        group.bench_with_input(BenchmarkId::new("cdcl", holes), &formula, |b, formula| {
            b.iter(|| assert!(solve(formula).is_none()))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = cdcl
}
criterion_main!(benches);
