use smart_tfidf::{Pivot, TermId, TfidfConfig, TfidfEngine};

fn main() -> smart_tfidf::Result<()> {
    env_logger::init();

    // term ids as handed out by some vocabulary
    let corpus: Vec<Vec<(TermId, u32)>> = vec![
        vec![(0, 2), (1, 1), (2, 1)],
        vec![(1, 1), (3, 1), (4, 3)],
        vec![(0, 1), (4, 1), (5, 1), (6, 1)],
    ];

    let mut engine = TfidfEngine::new(TfidfConfig::new().with_smartirs("nfc"));
    for (i, doc) in engine.fit_transform(&corpus)?.iter().enumerate() {
        println!("nfc doc{i}: {doc}");
    }

    let config = TfidfConfig::new()
        .with_smartirs("ltu")
        .with_pivot(Pivot::Auto)
        .with_slope(0.25);
    let mut engine = TfidfEngine::new(config);
    engine.fit(&corpus)?;
    println!("pivot: {:?}", engine.model()?.statistics().pivot());
    println!("ltu query: {}", engine.transform_one(&[(4u32, 2u32), (6, 1), (99, 1)])?);

    Ok(())
}
