use latex_drill::normalize_latex;
use proptest::prelude::*;

#[test]
fn equivalent_spellings() {
    let pairs = [
        (r"x^2 + y^2", r"x^{2}+y^{2}"),
        (r"\frac{a}{b}", r"\frac {a} {b}"),
        (r"a \leq b", r"a\le b"),
        (r"f \colon A \to B", r"f\colon A\rightarrow B"),
        (r"\{ x \mid x > 0 \}", r"\lbrace x\mid x>0\rbrace"),
        (r"a\,b\;c\quad d", "abcd"),
        (r"\sum_i x_i", r"\sum_{i}x_{i}"),
    ];
    for (left, right) in pairs {
        assert_eq!(normalize_latex(left), normalize_latex(right), "{left:?} / {right:?}");
    }
}

#[test]
fn distinct_expressions() {
    let pairs = [
        (r"x^2", r"x_2"),
        (r"\alpha b", r"\alphab"),
        (r"\text{a b}", r"\text{ab}"),
        (r"\frac{a}{b}", r"\frac{b}{a}"),
        (r"x^{2}y", r"x^{2y}"),
    ];
    for (left, right) in pairs {
        assert_ne!(normalize_latex(left), normalize_latex(right), "{left:?} / {right:?}");
    }
}

#[test]
fn unbalanced_input_is_kept() {
    assert_eq!(normalize_latex(r"\frac{a}{"), r"\frac{a}{");
    assert_eq!(normalize_latex(r"x}"), r"x}");
    assert_eq!(normalize_latex(r"x \"), "x");
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-c0-9]",
        Just("+".to_owned()),
        Just("=".to_owned()),
        Just("^".to_owned()),
        Just("_".to_owned()),
        Just("{".to_owned()),
        Just("}".to_owned()),
        Just("&".to_owned()),
        Just("*".to_owned()),
        Just(r"\alpha".to_owned()),
        Just(r"\frac".to_owned()),
        Just(r"\sqrt".to_owned()),
        Just(r"\text".to_owned()),
        Just(r"\to".to_owned()),
        Just(r"\le".to_owned()),
        Just(r"\lbrace".to_owned()),
        Just(r"\,".to_owned()),
        Just(r"\quad".to_owned()),
        Just(r"\%".to_owned()),
        Just(r"\\".to_owned()),
    ]
}

proptest! {
    #[test]
    fn normalization_is_idempotent(tokens in prop::collection::vec(token(), 0..24)) {
        let markup = tokens.concat();
        let once = normalize_latex(&markup);
        prop_assert_eq!(normalize_latex(&once), once);
    }

    #[test]
    fn spaced_normalization_is_idempotent(tokens in prop::collection::vec(token(), 0..24)) {
        let markup = tokens.join(" ");
        let once = normalize_latex(&markup);
        prop_assert_eq!(normalize_latex(&once), once);
    }

    #[test]
    fn whitespace_runs_are_equivalent(tokens in prop::collection::vec(token(), 0..24)) {
        let narrow = tokens.join(" ");
        let wide = tokens.join("  \n ");
        prop_assert_eq!(normalize_latex(&narrow), normalize_latex(&wide));
    }
}
