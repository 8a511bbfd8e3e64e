//! End-to-end tests on small resource allocation models.

use approx::assert_relative_eq;
use monobound::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-10;

// ============================================================================
// Literal examples
// ============================================================================

#[test]
fn test_constant_addition_ignores_arguments() {
    let mut graph = Graph::new();
    let a = graph.parameter(vec![1.0, 2.0, 3.0]).unwrap();
    let b = graph.parameter(vec![4.0, 5.0, 6.0]).unwrap();
    let s = graph.add(a, b).unwrap();
    assert_eq!(graph.evaluate(s, &[], &[]).unwrap(), &[5.0, 7.0, 9.0]);
    assert_eq!(graph.evaluate(s, &[3.0], &[-8.0]).unwrap(), &[5.0, 7.0, 9.0]);
}

#[test]
fn test_mixed_vector_fails_both_inequalities() {
    let mut graph = Graph::new();
    let x = graph.variable(1, Tag::Nn).unwrap();
    let obj = graph.sum(x).unwrap();
    let p = graph.parameter(vec![-1.0, 0.0, 2.0]).unwrap();
    let constraints = [Constraint::nonpos(p), Constraint::nonneg(p)];
    let mut program = graph.compile(obj, &constraints).unwrap();
    assert!(!program.fulfilled(0, &[1.0], &[1.0]).unwrap());
    assert!(!program.fulfilled(1, &[1.0], &[1.0]).unwrap());
    assert!(!program.all_fulfilled(&[1.0], &[1.0]).unwrap());
}

// ============================================================================
// Two-user interference channel
// ============================================================================

const ALPHA: [f64; 2] = [2.0, 1.5];
const SIGMA: [f64; 2] = [0.5, 1.0];
const BETA: [[f64; 2]; 2] = [[0.0, 0.3], [0.6, 0.0]];
/// Gains with self-interference on the diagonal.
const BETA_SELF: [[f64; 2]; 2] = [[0.4, 0.3], [0.6, 0.25]];
const LB: [f64; 2] = [0.2, 0.1];
const UB: [f64; 2] = [1.0, 2.0];

/// Per-user rate arguments `1 + alpha_i p_i / (sigma_i + beta_i . p)`.
fn rate_terms(graph: &mut Graph, p: NodeId, gains: &[[f64; 2]; 2]) -> Vec<NodeId> {
    let one = graph.scalar(1.0);
    (0..2)
        .map(|i| {
            let pi = graph.component(p, i).unwrap();
            let alpha = graph.scalar(ALPHA[i]);
            let signal = graph.mul(alpha, pi).unwrap();
            let beta = graph.parameter(gains[i].to_vec()).unwrap();
            let interference = graph.dot(beta, p).unwrap();
            let sigma = graph.scalar(SIGMA[i]);
            let noise = graph.add(interference, sigma).unwrap();
            let sinr = graph.div(signal, noise).unwrap();
            graph.add(one, sinr).unwrap()
        })
        .collect()
}

/// Sum rate `log2(prod_i (1 + sinr_i))`.
fn sum_rate_program() -> Program {
    sum_rate_program_with(&BETA)
}

fn sum_rate_program_with(gains: &[[f64; 2]; 2]) -> Program {
    let mut graph = Graph::new();
    let p = graph.bounded_variable(LB, UB).unwrap();
    let terms = rate_terms(&mut graph, p, gains);
    let packed = graph.list(&terms).unwrap();
    let product = graph.prod(packed).unwrap();
    let rate = graph.log2(product).unwrap();
    graph.compile(rate, &[]).unwrap()
}

/// Hand-coded dual evaluation of the sum rate: signal at `x`, interference
/// at `y`, the own contribution to the denominator at `x`.
///
/// The graph routes the whole denominator to `y`, so the two agree only when
/// the gains have a zero diagonal.
fn sum_rate_bound(gains: &[[f64; 2]; 2], x: &[f64], y: &[f64]) -> f64 {
    (0..2)
        .map(|i| {
            let interference: f64 = (0..2).map(|j| gains[i][j] * y[j]).sum();
            let own = gains[i][i] * (x[i] - y[i]);
            1.0 + ALPHA[i] * x[i] / (SIGMA[i] + interference + own)
        })
        .product::<f64>()
        .log2()
}

fn closed_form_sum_rate(p: &[f64]) -> f64 {
    closed_form_rate_with(&BETA, p)
}

/// `sum_i log2(1 + alpha_i p_i / (sigma_i + beta_i . p))`.
fn closed_form_rate_with(gains: &[[f64; 2]; 2], p: &[f64]) -> f64 {
    (0..2)
        .map(|i| {
            let noise = SIGMA[i] + gains[i][0] * p[0] + gains[i][1] * p[1];
            (1.0 + ALPHA[i] * p[i] / noise).log2()
        })
        .sum()
}

fn sample_box(rng: &mut StdRng, lb: &[f64], ub: &[f64]) -> Vec<f64> {
    lb.iter()
        .zip(ub)
        .map(|(l, u)| rng.random_range(*l..*u))
        .collect()
}

#[test]
fn test_sum_rate_at_lower_corner() {
    let mut program = sum_rate_program();
    let value = program.evaluate_me(&LB, &LB).unwrap();
    assert_relative_eq!(value, closed_form_sum_rate(&LB), epsilon = TOL);
}

#[test]
fn test_sum_rate_matches_hand_coded_model() {
    let mut program = sum_rate_program();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        let x = sample_box(&mut rng, &LB, &UB);
        let y = sample_box(&mut rng, &LB, &UB);
        let got = program.evaluate_me(&x, &y).unwrap();
        assert_relative_eq!(got, sum_rate_bound(&BETA, &x, &y), epsilon = TOL);
    }
}

#[test]
fn test_self_interference_at_lower_corner() {
    let mut program = sum_rate_program_with(&BETA_SELF);
    let value = program.evaluate_me(&LB, &LB).unwrap();
    assert_relative_eq!(value, closed_form_rate_with(&BETA_SELF, &LB), epsilon = TOL);
    assert_relative_eq!(
        value,
        sum_rate_bound(&BETA_SELF, &LB, &LB),
        epsilon = TOL
    );
}

#[test]
fn test_self_interference_on_the_diagonal() {
    let mut program = sum_rate_program_with(&BETA_SELF);
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..100 {
        let p = sample_box(&mut rng, &LB, &UB);
        let value = program.evaluate_me(&p, &p).unwrap();
        assert_relative_eq!(value, closed_form_rate_with(&BETA_SELF, &p), epsilon = TOL);
    }
}

#[test]
fn test_self_interference_bound_is_valid_and_looser() {
    // The hand-coded model keeps the own term at x, which is tighter than
    // routing the whole denominator to y. Both cover the box.
    let mut program = sum_rate_program_with(&BETA_SELF);
    let upper = program.evaluate_me(&UB, &LB).unwrap();
    let hand = sum_rate_bound(&BETA_SELF, &UB, &LB);
    assert!(upper >= hand - TOL);
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..200 {
        let p = sample_box(&mut rng, &LB, &UB);
        let value = closed_form_rate_with(&BETA_SELF, &p);
        assert!(value <= hand + TOL);
        assert!(value <= upper + TOL);
    }
}

#[test]
fn test_sum_rate_bound_covers_box() {
    let mut program = sum_rate_program();
    let (lb, ub) = program.declared_bounds().unwrap();
    let upper = program.objective(&ub, &lb).unwrap();
    let lower = program.objective(&lb, &ub).unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..200 {
        let p = sample_box(&mut rng, &lb, &ub);
        let value = closed_form_sum_rate(&p);
        assert!(value <= upper + TOL);
        assert!(value >= lower - TOL);
    }
}

#[test]
fn test_proportional_fair_rate() {
    // prod_i log2(1 + sinr_i): the logs are Unknown, so the product is
    // bounded by interval folding.
    let mut graph = Graph::new();
    let p = graph.bounded_variable(LB, UB).unwrap();
    let terms = rate_terms(&mut graph, p, &BETA);
    let rates: Vec<NodeId> = terms.iter().map(|&t| graph.log2(t).unwrap()).collect();
    let packed = graph.list(&rates).unwrap();
    let utility = graph.prod(packed).unwrap();
    assert_eq!(graph.tag(utility).unwrap(), Tag::Unknown);
    let mut program = graph.compile(utility, &[]).unwrap();

    let plain = |p: &[f64]| {
        let r0 = (1.0 + ALPHA[0] * p[0] / (SIGMA[0] + BETA[0][1] * p[1])).log2();
        let r1 = (1.0 + ALPHA[1] * p[1] / (SIGMA[1] + BETA[1][0] * p[0])).log2();
        r0 * r1
    };
    let mut rng = StdRng::seed_from_u64(29);
    let upper = program.evaluate_me(&UB, &LB).unwrap();
    for _ in 0..100 {
        let z = sample_box(&mut rng, &LB, &UB);
        assert_relative_eq!(program.evaluate_me(&z, &z).unwrap(), plain(&z), epsilon = TOL);
        assert!(plain(&z) <= upper + TOL);
    }
}

// ============================================================================
// Slotted ALOHA
// ============================================================================

const WEIGHTS: [f64; 3] = [1.0, 2.0, 0.5];
const RMIN: [f64; 3] = [0.01, 0.01, 0.01];

/// Throughput `c_k x_k prod_{j != k} (1 - x_j)` of every user, packed.
fn throughput(graph: &mut Graph, x: NodeId) -> NodeId {
    let one = graph.scalar(1.0);
    let idle = graph.sub(one, x).unwrap();
    let rates: Vec<NodeId> = (0..3)
        .map(|k| {
            let others: Vec<NodeId> = (0..3)
                .filter(|&j| j != k)
                .map(|j| graph.component(idle, j).unwrap())
                .collect();
            let others = graph.list(&others).unwrap();
            let silence = graph.prod(others).unwrap();
            let xk = graph.component(x, k).unwrap();
            let c = graph.scalar(WEIGHTS[k]);
            let attempt = graph.mul(c, xk).unwrap();
            graph.mul(attempt, silence).unwrap()
        })
        .collect();
    graph.list(&rates).unwrap()
}

fn aloha_plain(x: &[f64]) -> Vec<f64> {
    (0..3)
        .map(|k| {
            let silence: f64 = (0..3).filter(|&j| j != k).map(|j| 1.0 - x[j]).product();
            WEIGHTS[k] * x[k] * silence
        })
        .collect()
}

#[test]
fn test_aloha_log_utility() {
    let lb = [0.1, 0.1, 0.1];
    let ub = [0.5, 0.5, 0.5];
    let mut graph = Graph::new();
    let x = graph.bounded_variable(lb, ub).unwrap();
    let r = throughput(&mut graph, x);
    assert_eq!(graph.tag(r).unwrap(), Tag::Unknown);
    let logs = graph.ln(r).unwrap();
    let utility = graph.sum(logs).unwrap();
    let rmin = graph.parameter(RMIN.to_vec()).unwrap();
    let qos = graph.ge(r, rmin).unwrap();
    let mut program = graph.compile(utility, &[qos]).unwrap();

    let plain = |z: &[f64]| aloha_plain(z).iter().map(|v| v.ln()).sum::<f64>();
    let upper = program.evaluate_me(&ub, &lb).unwrap();
    let mut rng = StdRng::seed_from_u64(41);
    for _ in 0..100 {
        let z = sample_box(&mut rng, &lb, &ub);
        assert_relative_eq!(program.evaluate_me(&z, &z).unwrap(), plain(&z), epsilon = TOL);
        assert!(plain(&z) <= upper + TOL);
        assert!(program.fulfilled(0, &z, &z).unwrap());
    }

    // The lower corner gives everyone too little air time for 0.2.
    let mut strict = Graph::new();
    let x = strict.bounded_variable(lb, ub).unwrap();
    let r = throughput(&mut strict, x);
    let high = strict.parameter(vec![0.2; 3]).unwrap();
    let qos = strict.ge(r, high).unwrap();
    let s = strict.sum(r).unwrap();
    let mut program = strict.compile(s, &[qos]).unwrap();
    assert!(!program.all_fulfilled(&lb, &lb).unwrap());
    let start = program.feasible_point(&lb, &ub);
    assert_eq!(start, lb.to_vec());
}

// ============================================================================
// Sharing and compaction
// ============================================================================

#[test]
fn test_diamond_is_compacted_to_one_slot() {
    let mut graph = Graph::new();
    let x = graph.variable(1, Tag::Nn).unwrap();
    let one = graph.scalar(1.0);
    let shared = graph.add(x, one).unwrap();
    let left = graph.ln(shared).unwrap();
    let right = graph.neg(shared).unwrap();
    let root = graph.add(left, right).unwrap();
    let _unused = graph.mul(shared, shared).unwrap();

    let mut program = graph.compile(root, &[]).unwrap();
    assert_eq!(program.len(), 6);
    let copies = program.nodes().iter().filter(|n| n.id() == shared).count();
    assert_eq!(copies, 1);

    // ln(1 + x) - (1 + y)
    let value = program.evaluate_me(&[2.0], &[0.5]).unwrap();
    assert_relative_eq!(value, 3f64.ln() - 1.5, epsilon = TOL);
}

#[test]
fn test_program_dump_lists_every_node() {
    let mut program = sum_rate_program();
    program.evaluate_me(&LB, &LB).unwrap();
    let text = program.dump();
    assert_eq!(text.matches("ID ").count(), program.len());
    assert!(text.contains("log2 (dim=1, tag=U)"));
    assert!(text.contains("variable (dim=2, tag=NN)"));
}

#[test]
fn test_programs_evaluate_on_worker_threads() {
    fn assert_send_clone<T: Send + Clone>() {}
    assert_send_clone::<Program>();

    let program = sum_rate_program();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut local = program.clone();
            std::thread::spawn(move || {
                let t = i as f64 / 4.0;
                let point: Vec<f64> = LB.iter().zip(&UB).map(|(l, u)| l + t * (u - l)).collect();
                (point.clone(), local.evaluate_me(&point, &point).unwrap())
            })
        })
        .collect();
    for handle in handles {
        let (point, value) = handle.join().unwrap();
        assert_relative_eq!(value, closed_form_sum_rate(&point), epsilon = TOL);
    }
}
