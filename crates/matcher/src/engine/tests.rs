use super::*;

use catalog::InMemoryCatalog;
use embedding::StubEmbedder;
use extract::StubExtractor;

use crate::types::{IdentifierKind, ItemIdentifier, LineItem};

fn product(sku: &str, name: &str, brand: &str) -> CatalogProduct {
    CatalogProduct {
        sku: sku.into(),
        oem_code: None,
        dealer_code: None,
        alt_codes: Vec::new(),
        name: name.into(),
        description: String::new(),
        brand: brand.into(),
        category: Category::Toner,
        color: ColorClass::Black,
        yield_class: YieldClass::Standard,
        page_yield: Some(1200),
        unit_price: Some(40.0),
        wholesale_cost: None,
        list_price: None,
        family: None,
        compat_group: None,
        model_pattern: None,
        active_priority: 0,
        embedding: None,
    }
}

fn item(name: &str, identifiers: Vec<ItemIdentifier>) -> LineItem {
    LineItem {
        id: "item-1".into(),
        raw_name: name.into(),
        identifiers,
        quantity: 1,
        unit_price: None,
        confidence: 1.0,
    }
}

fn matcher(products: Vec<CatalogProduct>) -> TieredMatcher {
    TieredMatcher::new(
        Arc::new(InMemoryCatalog::new(products)),
        Arc::new(StubEmbedder::default()),
        Arc::new(StubExtractor),
        MatcherConfig::default(),
    )
    .expect("construct matcher")
}

#[tokio::test]
async fn exact_identifier_scores_one() {
    let mut tn730 = product("TN730", "Brother TN730 Toner", "Brother");
    tn730.oem_code = Some("TN-730".into());
    let m = matcher(vec![tn730]);

    let candidate = m
        .resolve(&item(
            "some toner",
            vec![ItemIdentifier::new(IdentifierKind::Manufacturer, "tn-730")],
        ))
        .await
        .expect("resolve")
        .expect("candidate");

    assert_eq!(candidate.method, MatchMethod::ExactIdentifier);
    assert_eq!(candidate.score, 1.0);
    assert_eq!(candidate.product.sku, "TN730");
}

#[tokio::test]
async fn identifiers_are_tried_in_kind_priority_order() {
    let m = matcher(vec![
        product("VEND-1", "Vendor coded toner", "Brother"),
        product("OEM-1", "Manufacturer coded toner", "Brother"),
    ]);

    let candidate = m
        .resolve(&item(
            "toner",
            vec![
                ItemIdentifier::new(IdentifierKind::Vendor, "VEND-1"),
                ItemIdentifier::new(IdentifierKind::Manufacturer, "OEM-1"),
            ],
        ))
        .await
        .expect("resolve")
        .expect("candidate");

    assert_eq!(candidate.product.sku, "OEM-1");
}

#[tokio::test]
async fn exact_name_match_ignores_case() {
    let m = matcher(vec![product("TN730", "Brother TN730 Toner", "Brother")]);

    let candidate = m
        .resolve(&item("BROTHER tn730 TONER", Vec::new()))
        .await
        .expect("resolve")
        .expect("candidate");

    assert_eq!(candidate.method, MatchMethod::ExactName);
    assert_eq!(candidate.score, 1.0);
}

#[tokio::test]
async fn exact_identifier_wins_over_exact_name() {
    let m = matcher(vec![
        product("BY-CODE", "Coded toner", "Brother"),
        product("BY-NAME", "Plain toner", "Brother"),
    ]);

    let candidate = m
        .resolve(&item(
            "Plain toner",
            vec![ItemIdentifier::new(IdentifierKind::Primary, "BY-CODE")],
        ))
        .await
        .expect("resolve")
        .expect("candidate");

    assert_eq!(candidate.method, MatchMethod::ExactIdentifier);
    assert_eq!(candidate.product.sku, "BY-CODE");
}

#[tokio::test]
async fn fuzzy_identifier_equality_after_squashing_scores_high() {
    let m = matcher(vec![product("TN730", "Brother TN730 Toner", "Brother")]);

    // Interior whitespace defeats the normalized exact-identifier index but
    // not the squashed form.
    let candidate = m
        .resolve(&item(
            "unrelated text",
            vec![ItemIdentifier::new(IdentifierKind::Primary, "TN 730")],
        ))
        .await
        .expect("resolve")
        .expect("candidate");

    assert_eq!(candidate.method, MatchMethod::FuzzyIdentifier);
    assert!((candidate.score - 0.95).abs() < 1e-6);
}

#[tokio::test]
async fn fuzzy_identifier_containment_scores_within_band() {
    let m = matcher(vec![product("TN730", "Brother TN730 Toner", "Brother")]);

    let candidate = m
        .tier_fuzzy_identifier(&item(
            "",
            vec![ItemIdentifier::new(IdentifierKind::Primary, "TN730-XL")],
        ))
        .await
        .expect("tier")
        .expect("candidate");

    assert!(candidate.score >= 0.85 && candidate.score < 0.95);
}

#[tokio::test]
async fn combined_text_score_stays_in_band() {
    let m = matcher(vec![product(
        "TN750",
        "Brother TN750 High Yield Toner",
        "Brother",
    )]);

    let candidate = m
        .tier_combined_text(&item(
            "high yield toner",
            vec![ItemIdentifier::new(IdentifierKind::Primary, "TN750")],
        ))
        .await
        .expect("tier")
        .expect("candidate");

    assert_eq!(candidate.method, MatchMethod::CombinedText);
    assert!(candidate.score >= 0.70 && candidate.score <= 0.95);
}

#[tokio::test]
async fn substring_tier_scores_whole_name_equality_as_perfect() {
    let m = matcher(vec![product("TN730", "Brother TN730 Toner", "Brother")]);

    let candidate = m
        .tier_substring(&item("brother tn730 toner", Vec::new()))
        .await
        .expect("tier")
        .expect("candidate");

    assert_eq!(candidate.method, MatchMethod::Substring);
    assert_eq!(candidate.score, 1.0);
}

#[tokio::test]
async fn substring_tier_scales_partial_containment_by_length() {
    let m = matcher(vec![product("TN730", "Brother TN730 Toner", "Brother")]);

    let candidate = m
        .tier_substring(&item("tn730 toner", Vec::new()))
        .await
        .expect("tier")
        .expect("candidate");

    assert!(candidate.score > 0.0 && candidate.score < 1.0);
}

#[tokio::test]
async fn description_tier_finds_identifier_in_long_text() {
    let mut p = product("GEN-1", "Generic cartridge", "Brother");
    p.description = "Replacement for printers using the XYZ1234 cartridge".into();
    let m = matcher(vec![p]);

    let candidate = m
        .tier_description(&item(
            "",
            vec![ItemIdentifier::new(IdentifierKind::Primary, "XYZ1234")],
        ))
        .await
        .expect("tier")
        .expect("candidate");

    assert_eq!(candidate.method, MatchMethod::Description);
    assert!(candidate.score >= 0.60 && candidate.score <= 0.85);
}

#[tokio::test]
async fn semantic_tier_matches_identical_text_embedding() {
    let embedder = StubEmbedder::default();
    let embedding = embedder
        .embed("magenta ink cartridge")
        .await
        .expect("embed");
    let mut p = product("INK-M", "Magenta refill", "HP");
    p.embedding = Some(embedding.vector);
    let m = matcher(vec![p]);

    let candidate = m
        .tier_semantic(&item("magenta ink cartridge", Vec::new()))
        .await
        .expect("tier")
        .expect("candidate");

    assert_eq!(candidate.method, MatchMethod::Semantic);
    assert!(candidate.score >= 0.95);
}

#[tokio::test]
async fn semantic_tier_drops_neighbors_below_floor() {
    let embedder = StubEmbedder::default();
    let embedding = embedder
        .embed("magenta ink cartridge")
        .await
        .expect("embed");
    let opposite: Vec<f32> = embedding.vector.iter().map(|v| -v).collect();
    let mut p = product("INK-M", "Magenta refill", "HP");
    p.embedding = Some(opposite);
    let m = matcher(vec![p]);

    let candidate = m
        .tier_semantic(&item("magenta ink cartridge", Vec::new()))
        .await
        .expect("tier");

    assert!(candidate.is_none());
}

#[tokio::test]
async fn attribute_tier_scores_weighted_overlap() {
    let mut p = product("HP64XL", "HP 64XL Black Ink Cartridge", "HP");
    p.category = Category::Ink;
    p.yield_class = YieldClass::High;
    let m = matcher(vec![p]);

    let candidate = m
        .tier_attribute_assisted(&item("HP 64XL black ink", Vec::new()))
        .await
        .expect("tier")
        .expect("candidate");

    assert_eq!(candidate.method, MatchMethod::AttributeAssisted);
    assert!(candidate.score >= 0.65 && candidate.score <= 0.95);
}

#[tokio::test]
async fn resolve_returns_none_for_empty_item() {
    let m = matcher(vec![product("TN730", "Brother TN730 Toner", "Brother")]);
    let candidate = m.resolve(&item("", Vec::new())).await.expect("resolve");
    assert!(candidate.is_none());
}

#[tokio::test]
async fn tie_breaks_prefer_inferred_brand() {
    let m = matcher(vec![
        product("A-1", "black toner cartridge", "Xerox"),
        product("Z-9", "black toner cartridge", "Brother"),
    ]);

    let candidate = m
        .tier_full_text(&item("Brother black toner cartridge", Vec::new()))
        .await
        .expect("tier")
        .expect("candidate");

    assert_eq!(candidate.product.brand, "Brother");
}

#[tokio::test]
async fn tie_breaks_prefer_higher_catalog_priority() {
    let mut low = product("A-1", "black toner cartridge", "Brother");
    low.active_priority = 1;
    let mut high = product("Z-9", "black toner cartridge", "Brother");
    high.active_priority = 5;
    let m = matcher(vec![low, high]);

    let candidate = m
        .tier_full_text(&item("black toner cartridge", Vec::new()))
        .await
        .expect("tier")
        .expect("candidate");

    assert_eq!(candidate.product.sku, "Z-9");
}

#[test]
fn attribute_overlap_rewards_full_agreement() {
    let mut p = product("HP64XL", "HP 64XL Black Ink", "HP");
    p.category = Category::Ink;
    p.yield_class = YieldClass::High;

    let full = ExtractedAttributes {
        brand: Some("hp".into()),
        product_type: Some("ink".into()),
        model: Some("64xl".into()),
        color: Some("black".into()),
        size: Some("xl".into()),
    };
    assert!((TieredMatcher::attribute_overlap(&full, &p).expect("overlap") - 1.0).abs() < 1e-6);

    let wrong_brand = ExtractedAttributes {
        brand: Some("canon".into()),
        ..full.clone()
    };
    let partial = TieredMatcher::attribute_overlap(&wrong_brand, &p).expect("overlap");
    assert!(partial < 1.0);
}

#[test]
fn attribute_overlap_is_none_when_nothing_extracted() {
    let p = product("TN730", "Brother TN730 Toner", "Brother");
    let empty = ExtractedAttributes {
        brand: None,
        product_type: None,
        model: None,
        color: None,
        size: None,
    };
    assert!(TieredMatcher::attribute_overlap(&empty, &p).is_none());
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let cfg = MatcherConfig {
        semantic_floor: 1.5,
        ..MatcherConfig::default()
    };
    let err = TieredMatcher::new(
        Arc::new(InMemoryCatalog::new(Vec::new())),
        Arc::new(StubEmbedder::default()),
        Arc::new(StubExtractor),
        cfg,
    );
    assert!(matches!(err, Err(MatchError::InvalidConfig(_))));
}
