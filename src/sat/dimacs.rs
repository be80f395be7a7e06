/*!
A DIMACS CNF reader.

Bare CNF is, per SPEC_FULL.md §4, a first-class input to the solver core
independent of the relational translator — mirroring `otter_sat`'s own
`builder/dimacs.rs`, which treats DIMACS as the library's primary ingestion
format.

```text
c a comment
p cnf 3 2
1 -2 0
2 3 0
```
*/

use crate::error::DimacsError;
use crate::sat::literal::Literal;

/// The result of parsing a DIMACS file: the declared variable/clause counts
/// (for sanity checking) and the clauses themselves.
pub struct DimacsFormula {
    pub num_variables: usize,
    pub num_clauses: usize,
    pub clauses: Vec<Vec<Literal>>,
}

/// Parse a DIMACS CNF document from its textual contents.
pub fn parse(input: &str) -> Result<DimacsFormula, DimacsError> {
    let mut problem: Option<(usize, usize)> = None;
    let mut clauses = Vec::new();
    let mut current: Vec<Literal> = Vec::new();
    let mut body_started = false;

    for (line_no, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('p') {
            if body_started {
                return Err(DimacsError::MisplacedProblemLine(line_no + 1));
            }
            let mut tokens = rest.split_whitespace();
            let format = tokens.next();
            if format != Some("cnf") {
                return Err(DimacsError::MissingProblemLine);
            }
            let vars: usize = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or(DimacsError::MissingProblemLine)?;
            let num_clauses: usize = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or(DimacsError::MissingProblemLine)?;
            problem = Some((vars, num_clauses));
            continue;
        }

        body_started = true;
        for token in line.split_whitespace() {
            let value: i32 = token.parse().map_err(|_| DimacsError::BadLiteral(line_no + 1))?;
            if value == 0 {
                clauses.push(std::mem::take(&mut current));
            } else {
                current.push(Literal::from(value));
            }
        }
    }

    if !current.is_empty() {
        clauses.push(current);
    }

    let (num_variables, num_clauses) = problem.ok_or(DimacsError::MissingProblemLine)?;
    Ok(DimacsFormula {
        num_variables,
        num_clauses,
        clauses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_formula() {
        let text = "c comment\np cnf 3 2\n1 -2 0\n2 3 0\n";
        let formula = parse(text).unwrap();
        assert_eq!(formula.num_variables, 3);
        assert_eq!(formula.num_clauses, 2);
        assert_eq!(formula.clauses.len(), 2);
        assert_eq!(formula.clauses[0][0].as_int(), 1);
        assert_eq!(formula.clauses[0][1].as_int(), -2);
    }

    #[test]
    fn rejects_missing_problem_line() {
        let text = "1 -2 0\n";
        assert_eq!(parse(text).unwrap_err(), DimacsError::MissingProblemLine);
    }

    #[test]
    fn allows_clause_spanning_multiple_lines() {
        let text = "p cnf 2 1\n1\n-2\n0\n";
        let formula = parse(text).unwrap();
        assert_eq!(formula.clauses.len(), 1);
        assert_eq!(formula.clauses[0].len(), 2);
    }
}
