use criterion::{black_box, criterion_group, criterion_main, Criterion};
use latex_drill::{
    analyze_latex_complexity, hover::instrument, normalize_latex, HoverConfig, PreviewRenderer,
};

const MAXWELL: &str = r"\nabla \times \mathbf{B} = \mu_0 \left( \mathbf{J} + \varepsilon_0 \frac{\partial \mathbf{E}}{\partial t} \right)";

const MATRIX: &str = r"\begin{pmatrix} a_{11} & a_{12} & a_{13} \\ a_{21} & a_{22} & a_{23} \\ a_{31} & a_{32} & a_{33} \end{pmatrix}";

fn instrument_greek(c: &mut Criterion) {
    let config = HoverConfig::default();
    c.bench_function("instrument greek", |b| {
        b.iter(|| {
            instrument(
                &PreviewRenderer,
                &config,
                black_box(
                    r"\alpha \beta \gamma \delta \epsilon \zeta \eta \theta
\iota \kappa \lambda \mu \nu \xi \pi \rho \sigma \tau \upsilon \phi \chi \psi \omega
\Gamma \Delta \Theta \Lambda \Xi \Pi \Sigma \Upsilon \Phi \Psi \Omega",
                ),
            )
        })
    });
}

fn instrument_subscript_torture(c: &mut Criterion) {
    let config = HoverConfig::default();
    c.bench_function("instrument subscript torture", |b| {
        b.iter(|| {
            instrument(
                &PreviewRenderer,
                &config,
                black_box("a_{5_{5_{5_{5_{5_{5_{5_{5_{5_{5_{5_5}}}}}}}}}}}"),
            )
        })
    });
}

fn instrument_matrix(c: &mut Criterion) {
    let config = HoverConfig::default();
    c.bench_function("instrument matrix", |b| {
        b.iter(|| instrument(&PreviewRenderer, &config, black_box(MATRIX)))
    });
}

fn normalize(c: &mut Criterion) {
    c.bench_function("normalize maxwell", |b| {
        b.iter(|| normalize_latex(black_box(MAXWELL)))
    });
}

fn complexity(c: &mut Criterion) {
    c.bench_function("complexity maxwell", |b| {
        b.iter(|| analyze_latex_complexity(black_box(MAXWELL)))
    });
    c.bench_function("complexity matrix", |b| {
        b.iter(|| analyze_latex_complexity(black_box(MATRIX)))
    });
}

criterion_group!(
    benches,
    instrument_greek,
    instrument_subscript_torture,
    instrument_matrix,
    normalize,
    complexity
);
criterion_main!(benches);
