use conversion_cardinality::{
    sum_conv_action_count, union_conv_action_count, Estimator, Error, Value,
};

fn row(conversion_type: &str, action_count: i64, users: std::ops::Range<u64>) -> Vec<Value> {
    let mut estimator = Estimator::new();
    for user in users {
        estimator.insert(&user);
    }
    vec![
        Value::Null,
        conversion_type.into(),
        Value::Null,
        action_count.into(),
        estimator.to_bytes().into(),
        Value::Null,
    ]
}

fn main() -> Result<(), Error> {
    let rows = vec![
        row("purchase", 120, 0..100),
        row("signup", 40, 50..90),
        row("purchase", 75, 80..5_000),
        row("visit", 9_000, 0..50_000),
    ];
    let goals = ["purchase", "signup"];

    let actions = sum_conv_action_count(&rows, &goals)?;
    println!("actions = {}", actions);

    let bytes = union_conv_action_count(&rows, &goals)?;
    let unique = Estimator::from_bytes(&bytes)?;
    println!(
        "unique actions = {} ({:?}, {} bytes encoded)",
        unique.estimate(),
        unique.layout(),
        bytes.len()
    );
    Ok(())
}
