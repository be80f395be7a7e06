/*!
Fixed-width two's-complement arithmetic and cardinality, built as bit-vector
networks over [crate::cnf::builder::CnfBuilder] (spec §4.2). Bit vectors are
little-endian (`bits[0]` is the least-significant bit) and every operator
truncates its result to the configured width — overflow is the translator's
concern (spec §7's "integer overflow certain" diagnostic), not this layer's.
*/

use std::rc::Rc;

use crate::cnf::builder::CnfBuilder;
use crate::cnf::formula::BooleanFormula;
use crate::sat::literal::Literal;

use super::matrix::BooleanMatrix;

/// A fixed-width, little-endian two's-complement bit vector.
pub type BitVector = Vec<Literal>;

fn mux_bit(builder: &mut CnfBuilder, cond: Literal, then_bit: Literal, else_bit: Literal) -> Literal {
    let f = BooleanFormula::ite(
        BooleanFormula::literal(cond),
        BooleanFormula::literal(then_bit),
        BooleanFormula::literal(else_bit),
    );
    builder.encode(&f)
}

fn full_adder(builder: &mut CnfBuilder, a: Literal, b: Literal, cin: Literal) -> (Literal, Literal) {
    let fa = BooleanFormula::literal(a);
    let fb = BooleanFormula::literal(b);
    let fc = BooleanFormula::literal(cin);
    let ab_xor = BooleanFormula::not(BooleanFormula::iff(Rc::clone(&fa), Rc::clone(&fb)));
    let sum = BooleanFormula::not(BooleanFormula::iff(Rc::clone(&ab_xor), Rc::clone(&fc)));
    let and_ab = BooleanFormula::and([fa, fb]);
    let and_c_xor = BooleanFormula::and([ab_xor, fc]);
    let cout = BooleanFormula::or([and_ab, and_c_xor]);
    (builder.encode(&sum), builder.encode(&cout))
}

/// `a + b`, truncated to `width` bits (the carry out of the top bit is dropped).
pub fn add(builder: &mut CnfBuilder, a: &BitVector, b: &BitVector, width: usize) -> BitVector {
    let mut carry = builder.constant_literal(false);
    let mut out = Vec::with_capacity(width);
    for i in 0..width {
        let ai = a.get(i).copied().unwrap_or_else(|| builder.constant_literal(false));
        let bi = b.get(i).copied().unwrap_or_else(|| builder.constant_literal(false));
        let (sum, cout) = full_adder(builder, ai, bi, carry);
        out.push(sum);
        carry = cout;
    }
    out
}

/// Two's-complement negation: invert every bit and add one.
pub fn negate(builder: &mut CnfBuilder, a: &BitVector, width: usize) -> BitVector {
    let inverted: BitVector = a.iter().map(|&l| l.negate()).collect();
    let one = one_bitvector(builder, width);
    add(builder, &inverted, &one, width)
}

/// `a - b = a + (-b)`.
pub fn subtract(builder: &mut CnfBuilder, a: &BitVector, b: &BitVector, width: usize) -> BitVector {
    let neg_b = negate(builder, b, width);
    add(builder, a, &neg_b, width)
}

fn one_bitvector(builder: &mut CnfBuilder, width: usize) -> BitVector {
    let mut v = vec![builder.constant_literal(false); width];
    if width > 0 {
        v[0] = builder.constant_literal(true);
    }
    v
}

/// Shift `a` left by the constant `amount`, filling with zero bits. Purely
/// structural — reuses existing literals, allocating nothing.
pub fn shift_left_const(builder: &mut CnfBuilder, a: &BitVector, amount: usize, width: usize) -> BitVector {
    (0..width)
        .map(|i| {
            if i >= amount && i - amount < a.len() {
                a[i - amount]
            } else {
                builder.constant_literal(false)
            }
        })
        .collect()
}

/// Logical shift right by the constant `amount`.
pub fn shift_right_const(builder: &mut CnfBuilder, a: &BitVector, amount: usize, width: usize) -> BitVector {
    (0..width)
        .map(|i| {
            let src = i + amount;
            if src < a.len() {
                a[src]
            } else {
                builder.constant_literal(false)
            }
        })
        .collect()
}

fn barrel_shift(
    builder: &mut CnfBuilder,
    bits: &BitVector,
    amount: &BitVector,
    width: usize,
    left: bool,
) -> BitVector {
    let mut current = bits.clone();
    current.resize(width, builder.constant_literal(false));
    for (stage, &amt_bit) in amount.iter().enumerate() {
        let shift_amt = 1usize << stage;
        if shift_amt >= width {
            break;
        }
        let shifted = if left {
            shift_left_const(builder, &current, shift_amt, width)
        } else {
            shift_right_const(builder, &current, shift_amt, width)
        };
        current = (0..width).map(|i| mux_bit(builder, amt_bit, shifted[i], current[i])).collect();
    }
    current
}

/// Shift left by a variable (formula-valued) amount.
pub fn shift_left(builder: &mut CnfBuilder, a: &BitVector, amount: &BitVector, width: usize) -> BitVector {
    barrel_shift(builder, a, amount, width, true)
}

/// Logical shift right by a variable (formula-valued) amount.
pub fn shift_right(builder: &mut CnfBuilder, a: &BitVector, amount: &BitVector, width: usize) -> BitVector {
    barrel_shift(builder, a, amount, width, false)
}

/// `a * b` via a shift-add network: each bit of `b` gates a shifted copy of `a`.
pub fn multiply(builder: &mut CnfBuilder, a: &BitVector, b: &BitVector, width: usize) -> BitVector {
    let mut acc = vec![builder.constant_literal(false); width];
    for (i, &bi) in b.iter().enumerate().take(width) {
        let shifted = shift_left_const(builder, a, i, width);
        let gated: BitVector = shifted
            .iter()
            .map(|&bit| mux_bit(builder, bi, bit, builder.constant_literal(false)))
            .collect();
        acc = add(builder, &acc, &gated, width);
    }
    acc
}

/// Unsigned bitwise `a >= b`, computed from the most significant bit down.
pub fn bits_ge(builder: &mut CnfBuilder, a: &BitVector, b: &BitVector, width: usize) -> Literal {
    let mut higher_eq = BooleanFormula::constant(true);
    let mut greater = BooleanFormula::constant(false);
    for i in (0..width).rev() {
        let ai = BooleanFormula::literal(a[i]);
        let bi = BooleanFormula::literal(b[i]);
        let bit_gt = BooleanFormula::and([Rc::clone(&higher_eq), Rc::clone(&ai), BooleanFormula::not(Rc::clone(&bi))]);
        greater = BooleanFormula::or([greater, bit_gt]);
        let bit_eq = BooleanFormula::iff(ai, bi);
        higher_eq = BooleanFormula::and([higher_eq, bit_eq]);
    }
    let ge = BooleanFormula::or([greater, higher_eq]);
    builder.encode(&ge)
}

/// `a == b`, bitwise.
pub fn bits_eq(builder: &mut CnfBuilder, a: &BitVector, b: &BitVector, width: usize) -> Literal {
    let conjuncts: Vec<_> = (0..width)
        .map(|i| BooleanFormula::iff(BooleanFormula::literal(a[i]), BooleanFormula::literal(b[i])))
        .collect();
    builder.encode(&BooleanFormula::and(conjuncts))
}

/// Unsigned division and remainder via restoring division. Division by a
/// provably-zero divisor is the translator's concern (spec §7); this layer
/// assumes the divisor is non-zero.
pub fn divide_remainder(
    builder: &mut CnfBuilder,
    dividend: &BitVector,
    divisor: &BitVector,
    width: usize,
) -> (BitVector, BitVector) {
    let mut remainder = vec![builder.constant_literal(false); width];
    let mut quotient = vec![builder.constant_literal(false); width];
    for i in (0..width).rev() {
        remainder = shift_left_const(builder, &remainder, 1, width);
        remainder[0] = dividend[i];
        let ge = bits_ge(builder, &remainder, divisor, width);
        let subtracted = subtract(builder, &remainder, divisor, width);
        remainder = (0..width).map(|k| mux_bit(builder, ge, subtracted[k], remainder[k])).collect();
        quotient[i] = ge;
    }
    (quotient, remainder)
}

/// Encode a Rust integer as a constant bit vector of the given width.
pub fn bitvector_from_int(builder: &mut CnfBuilder, value: i64, width: usize) -> BitVector {
    (0..width).map(|i| builder.constant_literal(((value >> i) & 1) != 0)).collect()
}

/// `#r`: the cardinality of a relation's tuple set, as a `width`-bit adder
/// tree over its membership bits (spec §4.2).
pub fn cardinality(matrix: &BooleanMatrix, width: usize, builder: &mut CnfBuilder) -> BitVector {
    let mut acc = vec![builder.constant_literal(false); width];
    for t in matrix.tuples() {
        let bit = builder.encode(&matrix.contains_formula(t));
        let mut addend = vec![builder.constant_literal(false); width];
        addend[0] = bit;
        acc = add(builder, &acc, &addend, width);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sat::report::Report;
    use crate::sat::solver::Solver;

    fn solved_model(builder: CnfBuilder, high: usize) -> Vec<bool> {
        let mut solver = Solver::new(high, Config::default());
        for clause in builder.into_clauses() {
            solver.add_clause(clause);
        }
        match solver.solve() {
            Report::Satisfiable(model) => model,
            other => panic!("expected SAT, got {other}"),
        }
    }

    fn decode(bits: &BitVector, model: &[bool]) -> u32 {
        bits.iter().enumerate().fold(0u32, |acc, (i, l)| acc | ((l.evaluate(model) as u32) << i))
    }

    #[test]
    fn addition_matches_arithmetic() {
        let mut builder = CnfBuilder::new();
        let a = bitvector_from_int(&mut builder, 3, 4);
        let b = bitvector_from_int(&mut builder, 4, 4);
        let sum = add(&mut builder, &a, &b, 4);
        let top = builder.encode(&BooleanFormula::constant(true));
        builder.add_clause(vec![top]);
        let high = builder.variable_high_watermark() as usize;
        let model = solved_model(builder, high);
        assert_eq!(decode(&sum, &model), 7);
    }

    #[test]
    fn multiplication_matches_arithmetic() {
        let mut builder = CnfBuilder::new();
        let a = bitvector_from_int(&mut builder, 3, 4);
        let b = bitvector_from_int(&mut builder, 2, 4);
        let product = multiply(&mut builder, &a, &b, 4);
        let top = builder.encode(&BooleanFormula::constant(true));
        builder.add_clause(vec![top]);
        let high = builder.variable_high_watermark() as usize;
        let model = solved_model(builder, high);
        assert_eq!(decode(&product, &model), 6);
    }

    #[test]
    fn division_and_remainder_match_arithmetic() {
        let mut builder = CnfBuilder::new();
        let a = bitvector_from_int(&mut builder, 13, 5);
        let b = bitvector_from_int(&mut builder, 4, 5);
        let (q, r) = divide_remainder(&mut builder, &a, &b, 5);
        let top = builder.encode(&BooleanFormula::constant(true));
        builder.add_clause(vec![top]);
        let high = builder.variable_high_watermark() as usize;
        let model = solved_model(builder, high);
        assert_eq!(decode(&q, &model), 3);
        assert_eq!(decode(&r, &model), 1);
    }

    #[test]
    fn cardinality_counts_membership_bits() {
        use crate::relational::universe::AtomTuple;
        use crate::relational::matrix::BooleanValue;

        let mut builder = CnfBuilder::new();
        let matrix = BooleanMatrix::from_parts(
            1,
            vec![AtomTuple::new(vec![0]), AtomTuple::new(vec![1]), AtomTuple::new(vec![2])],
            vec![
                BooleanValue::Constant(true),
                BooleanValue::Constant(true),
                BooleanValue::Constant(false),
            ],
        );
        let count = cardinality(&matrix, 4, &mut builder);
        let top = builder.encode(&BooleanFormula::constant(true));
        builder.add_clause(vec![top]);
        let high = builder.variable_high_watermark() as usize;
        let model = solved_model(builder, high);
        assert_eq!(decode(&count, &model), 2);
    }
}
