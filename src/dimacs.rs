//! Loading and writing formulas in DIMACS CNF.
//!
//! ```text
//! c comments may appear anywhere
//! p cnf 3 2
//! 1 -2 0
//! 2 3 -1 0
//! ```
//!
//! Literal `k` is variable `k`, `-k` its negation. Variable 0 has no DIMACS form.

use crate::{Clause, Formula, Literal, ParseError};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

/// Parses DIMACS CNF lines.
///
/// Exactly as many clause lines as the header declares are read; anything after them
/// (such as a `%` trailer) is ignored. Repeated literals within a clause are merged,
/// and a clause containing both polarities of a variable is dropped. Every literal must
/// name a variable between 1 and the declared count.
pub fn parse(lines: impl IntoIterator<Item = impl AsRef<str>>) -> Result<Formula, ParseError> {
    let mut lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| {
            let line = line.as_ref().trim();
            !line.is_empty() && !line.starts_with('c')
        });

    let (_, header) = lines.next().ok_or(ParseError::MissingHeader)?;
    let (num_vars, expected) = parse_header(header.as_ref())?;

    let mut clauses = Vec::new();
    for found in 0..expected {
        let (number, line) = lines
            .next()
            .ok_or(ParseError::MissingClause { expected, found })?;
        if let Some(clause) = parse_clause(number, line.as_ref(), num_vars)? {
            clauses.push(clause);
        }
    }

    Ok(Formula::new(clauses))
}

/// Returns the declared numbers of variables and clauses
fn parse_header(line: &str) -> Result<(usize, usize), ParseError> {
    let invalid = || ParseError::InvalidHeader(line.to_string());
    match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["p", "cnf", vars, clauses] => {
            let vars: usize = vars.parse().map_err(|_| invalid())?;
            if vars > Literal::MAX_VAR {
                return Err(invalid());
            }
            Ok((vars, clauses.parse().map_err(|_| invalid())?))
        }
        ["p", ..] => Err(invalid()),
        _ => Err(ParseError::MissingHeader),
    }
}

fn parse_clause(
    number: usize,
    line: &str,
    num_vars: usize,
) -> Result<Option<Clause>, ParseError> {
    let invalid = || ParseError::InvalidClauseLine {
        line: number,
        text: line.to_string(),
    };
    let values = line
        .split_whitespace()
        .map(isize::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    let literals = match values.split_last() {
        Some((0, literals)) if !literals.contains(&0) => literals,
        _ => return Err(invalid()),
    };
    if let Some(var) = literals
        .iter()
        .map(|value| value.unsigned_abs())
        .find(|var| *var > num_vars)
    {
        return Err(ParseError::UndeclaredVariable { line: number, var });
    }
    Ok(Clause::normalized(literals.iter().copied().map(Literal::from)))
}

pub fn parse_reader(reader: impl BufRead) -> Result<Formula, ParseError> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    parse(lines)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<Formula, ParseError> {
    parse_reader(BufReader::new(File::open(path)?))
}

/// Writes `formula` in DIMACS CNF.
///
/// Panics if the formula mentions variable 0.
pub fn to_dimacs(formula: &Formula) -> String {
    let mut out = format!(
        "p cnf {} {}\n",
        formula.max_variable().unwrap_or(0),
        formula.clauses().len()
    );
    for clause in formula.clauses() {
        for literal in clause.literals() {
            assert_ne!(literal.var(), 0, "x0 has no DIMACS form");
            out.push_str(&literal.to_dimacs().to_string());
            out.push(' ');
        }
        out.push_str("0\n");
    }
    out
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s.lines())
    }
}

#[cfg(test)]
const QUINN: &str = "c an example from the DIMACS format description
c
p cnf 4 3
1 -2 0
c a comment between clauses

2 3 -1 0
-4 0
";

#[test]
fn parsing_formulas() {
    let formula = QUINN.parse::<Formula>().expect("valid input");
    assert_eq!(
        formula,
        Formula::from(vec![vec![1isize, -2], vec![2, 3, -1], vec![-4]])
    );
    assert_eq!(formula.to_string(), "(x1 ∨ ¬x2) ∧ (x2 ∨ x3 ∨ ¬x1) ∧ (¬x4)");
}

#[test]
fn writing_formulas() {
    let formula = QUINN.parse::<Formula>().expect("valid input");
    let written = to_dimacs(&formula);
    assert_eq!(written, "p cnf 4 3\n1 -2 0\n2 3 -1 0\n-4 0\n");
    assert_eq!(written.parse::<Formula>().ok(), Some(formula));
}

#[test]
fn parsing_normalizes_clauses() {
    let formula = parse(["p cnf 3 3", "1 1 -2 0", "2 -2 3 0", "0"]).expect("valid input");
    assert_eq!(
        formula,
        Formula::new(vec![
            Clause::new(vec![Literal::positive(1), Literal::negative(2)]),
            Clause::empty(),
        ])
    );
    assert!(formula.is_trivially_unsatisfiable());
}

#[test]
fn parsing_stops_after_the_declared_clauses() {
    let formula = parse(["p cnf 2 1", "1 2 0", "%", "0", ""]).expect("valid input");
    assert_eq!(formula.clauses().len(), 1);
}

#[test]
fn parsing_reports_missing_headers() {
    assert!(matches!(parse(Vec::<&str>::new()), Err(ParseError::MissingHeader)));
    assert!(matches!(
        parse(["c only comments", ""]),
        Err(ParseError::MissingHeader)
    ));
    assert!(matches!(parse(["1 2 0"]), Err(ParseError::MissingHeader)));
}

#[test]
fn parsing_reports_invalid_headers() {
    for header in ["p cnf 3", "p dnf 3 1", "p cnf three 1", "p cnf 3 -1 0"] {
        match parse([header, "1 2 0"]) {
            Err(ParseError::InvalidHeader(text)) => assert_eq!(text, header),
            other => panic!("{:?} parsed as {:?}", header, other),
        }
    }
}

#[test]
fn parsing_reports_invalid_clauses() {
    for clause in ["1 2", "1 0 2 0", "1 two 0", "1 2 0 0"] {
        match parse(["c", "p cnf 2 1", clause]) {
            Err(ParseError::InvalidClauseLine { line, text }) => {
                assert_eq!(line, 3);
                assert_eq!(text, clause);
            }
            other => panic!("{:?} parsed as {:?}", clause, other),
        }
    }
}

#[test]
fn parsing_rejects_undeclared_variables() {
    for clause in [
        "3 0",
        "1 -3 0",
        "-9223372036854775808 0",
        "9223372036854775807 0",
        "4611686018427387000 0",
    ] {
        match parse(["p cnf 2 1", clause]) {
            Err(ParseError::UndeclaredVariable { line, var }) => {
                assert_eq!(line, 2);
                assert!(var > 2);
            }
            other => panic!("{:?} parsed as {:?}", clause, other),
        }
    }
}

#[test]
fn parsing_rejects_headers_beyond_the_literal_range() {
    let header = format!("p cnf {} 1", Literal::MAX_VAR + 1);
    assert!(matches!(
        parse([header.as_str(), "1 0"]),
        Err(ParseError::InvalidHeader(_))
    ));
    assert!(parse([format!("p cnf {} 1", Literal::MAX_VAR), "1 0".to_string()]).is_ok());
}

#[test]
fn parsing_does_not_trust_the_declared_clause_count() {
    assert!(matches!(
        parse(["p cnf 1 4611686018427387000", "1 0"]),
        Err(ParseError::MissingClause { found: 1, .. })
    ));
}

#[test]
fn parsing_reports_missing_clauses() {
    match parse(["p cnf 3 3", "1 2 0", "c", "-3 0"]) {
        Err(ParseError::MissingClause { expected, found }) => {
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("parsed as {:?}", other),
    }
}

#[test]
fn loading_missing_files_fails() {
    assert!(matches!(
        load_file("/nonexistent/formula.cnf"),
        Err(ParseError::Io(_))
    ));
}
