use latex_drill::{
    dataset::{
        load_expressions, load_expressions_from_json, ComplexityDistribution, DatasetError,
        Expression,
    },
    Difficulty,
};
use serde_json::{json, Value};

fn record(id: &str, latex: &str, band: &str, score: u32) -> Value {
    json!({
        "id": id,
        "latex": latex,
        "name": id,
        "difficulty": band,
        "complexityBand": band,
        "complexityScore": score,
        "topics": ["algebra"],
        "subtopics": ["fundamentals"],
    })
}

#[test]
fn load_payload() -> anyhow::Result<()> {
    let payload = json!({
        "expressions": [
            record("square", "x^2", "beginner", 5),
            record("quadratic", r"x = \frac{-b \pm \sqrt{b^2 - 4ac}}{2a}", "intermediate", 40),
        ],
    });
    let expressions = load_expressions_from_json(&payload.to_string())?;
    assert_eq!(expressions.len(), 2);
    assert_eq!(expressions[1].id, "quadratic");
    assert_eq!(expressions[1].difficulty, Difficulty::Intermediate);
    Ok(())
}

#[test]
fn rejected_payloads() {
    assert!(matches!(
        load_expressions_from_json("{"),
        Err(DatasetError::Json(_))
    ));
    assert!(matches!(
        load_expressions(&json!({ "items": [] })),
        Err(DatasetError::MissingExpressions)
    ));
    assert!(matches!(
        load_expressions(&json!([])),
        Err(DatasetError::MissingExpressions)
    ));

    let duplicated = json!({
        "expressions": [
            record("square", "x^2", "beginner", 5),
            record("square", "y^2", "beginner", 5),
        ],
    });
    match load_expressions(&duplicated) {
        Err(DatasetError::DuplicateId(id)) => assert_eq!(id, "square"),
        other => panic!("unexpected result: {other:?}"),
    }

    let invalid = json!({
        "expressions": [
            record("square", "x^2", "beginner", 5),
            record("cube", "x^3", "beginner", 500),
        ],
    });
    match load_expressions(&invalid) {
        Err(DatasetError::InvalidRecord { index, .. }) => assert_eq!(index, 1),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn analyzed_expressions_validate() -> anyhow::Result<()> {
    let expression = Expression::analyzed(
        "binomial-square",
        "Square of a sum",
        "(a+b)^2 = a^2 + 2ab + b^2",
        vec!["algebra".to_owned()],
        vec!["identities".to_owned()],
    );
    let payload = json!({ "expressions": [serde_json::to_value(&expression)?] });
    let loaded = load_expressions(&payload)?;
    assert_eq!(loaded, [expression]);
    Ok(())
}

#[test]
fn distribution() {
    let expressions: Vec<Expression> = [
        ("a", "a", "beginner", 0),
        ("b", "b", "beginner", 20),
        ("c", "c", "intermediate", 40),
        ("d", "d", "advanced", 80),
    ]
    .into_iter()
    .map(|(id, latex, band, score)| {
        let payload = json!({ "expressions": [record(id, latex, band, score)] });
        load_expressions(&payload).unwrap().remove(0)
    })
    .collect();

    let distribution = ComplexityDistribution::from_expressions(&expressions);
    assert_eq!(distribution.total, 4);
    assert_eq!(distribution.count(Difficulty::Beginner), 2);
    assert_eq!(distribution.ratio(Difficulty::Advanced), 0.25);
    assert_eq!(distribution.min_score, 0.);
    assert_eq!(distribution.max_score, 80.);
    // Floor of `p * (n - 1)`: indices 0, 1 and 2.
    assert_eq!(distribution.p10, 0.);
    assert_eq!(distribution.p50, 20.);
    assert_eq!(distribution.p90, 40.);

    let empty = ComplexityDistribution::from_expressions(&Vec::<Expression>::new());
    assert_eq!(empty.total, 0);
    assert_eq!(empty.ratio(Difficulty::Beginner), 0.);
    assert_eq!(empty.p50, 0.);
}
