//! End-to-end shopper journeys: browse, filter, sort, cart, and checkout,
//! with the catalog served over HTTP and the cart persisted through a real
//! `SQLite`-backed store.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;

use clothify_core::{
    Destination, Facet, FilterState, Gender, LineIdentity, Price, ProductId, ShippingMethod,
    ShippingSelection, SortKey, sort_products,
};
use clothify_storefront::cart::CartStore;
use clothify_storefront::config::StorefrontConfig;
use clothify_storefront::state::AppState;
use clothify_storefront::store::{DurableStore, MemoryStore, SqliteStore};

// =============================================================================
// Catalog source stub
// =============================================================================

#[derive(Clone)]
struct CatalogStub {
    body: String,
    hits: Arc<AtomicUsize>,
}

async fn serve_catalog(State(stub): State<CatalogStub>) -> impl IntoResponse {
    stub.hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        stub.body,
    )
}

async fn spawn_stub(body: &str) -> String {
    let stub = CatalogStub {
        body: body.to_owned(),
        hits: Arc::new(AtomicUsize::new(0)),
    };
    let app = Router::new()
        .route("/catalog.json", get(serve_catalog))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve catalog stub");
    });
    format!("http://{addr}/catalog.json")
}

fn config(catalog_url: String) -> StorefrontConfig {
    StorefrontConfig {
        catalog_url,
        database_url: "sqlite::memory:".to_owned(),
        fetch_retries: 1,
        fetch_timeout_secs: 5,
    }
}

/// Build a price from a decimal literal, for totals that do not land on
/// whole cents times whole quantities.
fn price(literal: &str) -> Price {
    let amount: rust_decimal::Decimal = literal.parse().expect("decimal literal");
    Price::try_from(amount).expect("non-negative price")
}

const CATALOG_JSON: &str = r##"[
    {
        "id": "w1",
        "name": "Wrap Dress",
        "price": 89.5,
        "category": "Dresses",
        "gender": "womens",
        "sizes": ["S", "M", "L"],
        "colors": [{"name": "Navy", "hex": "#1f2a44"}]
    },
    {
        "id": "w2",
        "name": "Slip Dress",
        "price": 120,
        "category": "Dresses",
        "gender": "womens",
        "sizes": ["S", "M"]
    },
    {
        "id": "w3",
        "name": "Silk Scarf",
        "price": 45,
        "category": "Accessories",
        "gender": "womens"
    },
    {
        "id": "m1",
        "name": "Crew Tee",
        "price": 25,
        "category": "Tops",
        "gender": "mens",
        "sizes": ["M", "L"]
    }
]"##;

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_browse_filter_sort_add_and_checkout() {
    clothify_integration_tests::init_tracing();
    let url = spawn_stub(CATALOG_JSON).await;
    let state = AppState::with_store(config(url), Arc::new(MemoryStore::new()))
        .await
        .expect("build app state");

    // Browse: womens dresses, cheapest first.
    state.catalog().load().await.expect("load catalog");
    let mut filters = FilterState::new();
    filters.insert(Facet::Gender, "womens");
    filters.insert(Facet::Category, "Dresses");

    let matching: Vec<_> = state
        .catalog()
        .all_products()
        .into_iter()
        .filter(|product| filters.matches(product))
        .collect();
    let display = sort_products(&matching, SortKey::Price);

    let names: Vec<_> = display.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Wrap Dress", "Slip Dress"]);

    // Add the cheaper dress in two sizes; same identity merges.
    let dress = display.first().expect("a dress to add");
    state
        .cart()
        .add_item(dress, 1, Some("M".to_owned()), Some("Navy".to_owned()))
        .await
        .expect("add dress");
    state
        .cart()
        .add_item(dress, 1, Some("M".to_owned()), Some("Navy".to_owned()))
        .await
        .expect("add dress again");
    state
        .cart()
        .add_item(dress, 1, Some("S".to_owned()), Some("Navy".to_owned()))
        .await
        .expect("add small dress");

    assert_eq!(state.cart().lines().len(), 2);
    assert_eq!(state.cart().total_item_count(), 3);

    // Summary preview: 3 x $89.50 = $268.50, US standard shipping $15.
    let preview = state
        .cart()
        .totals(&ShippingSelection::new(Destination::Us, ShippingMethod::Standard));
    assert_eq!(preview.merchandise_total, Price::from_minor(26_850));
    assert_eq!(preview.shipping_cost, Price::from_major(15));
    assert_eq!(preview.tax, Price::zero());
    assert_eq!(preview.grand_total, Price::from_minor(28_350));

    // Checkout to Canada: express shipping plus 5% tax, then the cart
    // empties.
    let selection = ShippingSelection::new(Destination::Ca, ShippingMethod::Express);
    let totals = state.cart().checkout(&selection).await.expect("checkout");
    assert_eq!(totals.merchandise_total, Price::from_minor(26_850));
    assert_eq!(totals.shipping_cost, Price::from_major(25));
    assert_eq!(totals.tax, price("13.425"));
    assert_eq!(totals.grand_total, price("306.925"));
    assert!(state.cart().is_empty());
}

#[tokio::test]
async fn test_sized_product_rejected_without_size_selection() {
    let url = spawn_stub(CATALOG_JSON).await;
    let state = AppState::with_store(config(url), Arc::new(MemoryStore::new()))
        .await
        .expect("build app state");
    state.catalog().load().await.expect("load catalog");

    let tee = state
        .catalog()
        .get_by_id(&ProductId::new("m1"))
        .expect("tee present");
    let err = state
        .cart()
        .add_item(&tee, 1, None, None)
        .await
        .expect_err("size is mandatory");
    assert!(err.to_string().contains("requires a size selection"));
    assert!(state.cart().is_empty());

    // The unsized scarf needs no selection.
    let scarf = state
        .catalog()
        .get_by_id(&ProductId::new("w3"))
        .expect("scarf present");
    state
        .cart()
        .add_item(&scarf, 1, None, None)
        .await
        .expect("add scarf");
    assert_eq!(state.cart().total_item_count(), 1);
}

#[tokio::test]
async fn test_cart_round_trip_through_sqlite() {
    let url = spawn_stub(CATALOG_JSON).await;
    let store: Arc<dyn DurableStore> = Arc::new(
        SqliteStore::connect("sqlite::memory:")
            .await
            .expect("open sqlite store"),
    );
    let state = AppState::with_store(config(url), Arc::clone(&store))
        .await
        .expect("build app state");
    state.catalog().load().await.expect("load catalog");

    let dress = state
        .catalog()
        .get_by_id(&ProductId::new("w2"))
        .expect("dress present");
    state
        .cart()
        .add_item(&dress, 2, Some("S".to_owned()), None)
        .await
        .expect("add dress");
    let scarf = state
        .catalog()
        .get_by_id(&ProductId::new("w3"))
        .expect("scarf present");
    state
        .cart()
        .add_item(&scarf, 1, None, None)
        .await
        .expect("add scarf");

    // A new session over the same database sees identical lines.
    let reopened = CartStore::open(Arc::clone(&store)).await.expect("reopen cart");
    let lines = reopened.lines();
    let summary: Vec<_> = lines
        .iter()
        .map(|line| {
            (
                line.identity.product_id.as_str(),
                line.identity.size.as_deref(),
                line.quantity,
                line.price,
                line.name.as_str(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("w2", Some("S"), 2, Price::from_major(120), "Slip Dress"),
            ("w3", None, 1, Price::from_major(45), "Silk Scarf"),
        ]
    );

    // Quantity changes persist too: dropping the scarf to zero removes its
    // line for the next session as well.
    let identity = LineIdentity::new(ProductId::new("w3"), None, None);
    reopened
        .change_quantity(&identity, -1)
        .await
        .expect("drop scarf");
    assert_eq!(reopened.total_item_count(), 2);

    let final_view = CartStore::open(Arc::clone(&store)).await.expect("third session");
    assert_eq!(final_view.lines().len(), 1);
    assert_eq!(final_view.total_item_count(), 2);
}

#[tokio::test]
async fn test_gender_browsing_helpers() {
    let url = spawn_stub(CATALOG_JSON).await;
    let state = AppState::with_store(config(url), Arc::new(MemoryStore::new()))
        .await
        .expect("build app state");
    state.catalog().load().await.expect("load catalog");

    assert_eq!(state.catalog().by_gender(Gender::Womens).len(), 3);
    assert_eq!(
        state.catalog().categories_for_gender(Gender::Womens),
        vec!["Accessories".to_owned(), "Dresses".to_owned()]
    );

    let representative = state
        .catalog()
        .first_in_category(Gender::Womens, "dresses")
        .expect("dress representative");
    assert_eq!(representative.id, ProductId::new("w1"));

    let related = state
        .catalog()
        .related_products(&ProductId::new("w1"), 4);
    let ids: Vec<_> = related.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["w2", "w3"]);
}
