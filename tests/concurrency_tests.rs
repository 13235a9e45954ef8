//! Concurrency behavior of the batch engine: shared-engine safety and
//! concurrency-level independence of results.

use std::sync::Arc;

use cartwise::{
    CatalogProduct, Category, ColorClass, Engine, EngineConfig, IdentifierKind, InMemoryCatalog,
    ItemIdentifier, LineItem, StubEmbedder, StubExtractor, YieldClass,
};

fn product(sku: &str, page_yield: u32, list_price: f64) -> CatalogProduct {
    CatalogProduct {
        sku: sku.into(),
        oem_code: None,
        dealer_code: None,
        alt_codes: Vec::new(),
        name: format!("Brother {sku} Toner"),
        description: String::new(),
        brand: "Brother".into(),
        category: Category::Toner,
        color: ColorClass::Black,
        yield_class: YieldClass::Standard,
        page_yield: Some(page_yield),
        unit_price: None,
        wholesale_cost: None,
        list_price: Some(list_price),
        family: Some("TN7xx".into()),
        compat_group: None,
        model_pattern: None,
        active_priority: 0,
        embedding: None,
    }
}

fn catalog() -> Vec<CatalogProduct> {
    let mut upgrade = product("TN750", 3000, 90.0);
    upgrade.yield_class = YieldClass::High;
    vec![product("TN730", 1200, 50.0), upgrade]
}

fn engine_with_concurrency(max_concurrency: usize) -> Engine {
    let cfg = EngineConfig {
        max_concurrency,
        ..EngineConfig::default()
    };
    Engine::new(
        Arc::new(InMemoryCatalog::new(catalog())),
        Arc::new(StubEmbedder::default()),
        Arc::new(StubExtractor),
        cfg,
    )
    .expect("engine construction")
}

fn item(id: &str, ident: &str, quantity: u32, unit_price: f64) -> LineItem {
    LineItem {
        id: id.into(),
        raw_name: "toner cartridge".into(),
        identifiers: vec![ItemIdentifier::new(IdentifierKind::Primary, ident)],
        quantity,
        unit_price: Some(unit_price),
        confidence: 1.0,
    }
}

fn batch(n: usize) -> Vec<LineItem> {
    (0..n)
        .map(|i| {
            if i % 3 == 0 {
                item(&format!("item-{i}"), "UNKNOWN-SKU", 1, 12.5)
            } else {
                item(&format!("item-{i}"), "TN730", 3, 50.0)
            }
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_engine_handles_concurrent_items() {
    let engine = Arc::new(engine_with_concurrency(8));
    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .process_item(item(&format!("item-{i}"), "TN730", 3, 50.0))
                .await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.expect("task join"));
    }

    let first = &outcomes[0];
    for outcome in &outcomes {
        assert_eq!(outcome.status, first.status);
        assert_eq!(
            outcome.recommendation.total_savings,
            first.recommendation.total_savings
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrency_level_does_not_change_results() {
    let serial = engine_with_concurrency(1)
        .process_batch(batch(24))
        .await
        .expect("serial batch");
    let parallel = engine_with_concurrency(8)
        .process_batch(batch(24))
        .await
        .expect("parallel batch");

    assert_eq!(serial.summary, parallel.summary);
    assert_eq!(serial.outcomes.len(), parallel.outcomes.len());
    for (id, outcome) in &serial.outcomes {
        assert_eq!(Some(outcome), parallel.outcomes.get(id));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn large_batch_completes_without_loss() {
    let engine = engine_with_concurrency(8);
    let result = engine.process_batch(batch(100)).await.expect("batch");

    assert_eq!(result.outcomes.len(), 100);
    assert_eq!(result.summary.items_total, 100);
    assert_eq!(result.progress.completed, 100);
    assert!(result.progress.is_complete());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn repeated_batches_over_one_engine_agree() {
    let engine = Arc::new(engine_with_concurrency(4));
    let first = engine.process_batch(batch(12)).await.expect("first run");
    let second = engine.process_batch(batch(12)).await.expect("second run");
    assert_eq!(first.summary, second.summary);
}
