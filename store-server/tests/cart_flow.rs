//! Cart service integration tests against a throwaway embedded database

use std::sync::Arc;
use store_server::db::DbService;
use store_server::db::models::{CartAddress, CartItem, CartItemPatch, StockFlag};
use store_server::{CartAddOutcome, CartService, KeyedMutex};

const BUYER: &str = "buyer@shop.test";

async fn test_service() -> (CartService, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db = DbService::new(tmp.path()).await.unwrap().db;
    let service = CartService::new(db, Arc::new(KeyedMutex::new()));
    (service, tmp)
}

fn line_item(product_id: &str, stock: StockFlag, available: i64) -> CartItem {
    CartItem {
        product_id: product_id.to_string(),
        quantity: 1,
        price: 25.0,
        price_fixed: 25.0,
        discount: 0.0,
        discount_amount_fixed: 0.0,
        discount_amount_total: 0.0,
        price_total: 25.0,
        stock,
        available,
        modified_at: "2024-06-01T00:00:00Z".to_string(),
    }
}

fn address(address_id: i64) -> CartAddress {
    let mut fields = serde_json::Map::new();
    fields.insert("name".into(), serde_json::Value::from("Jordan Doe"));
    fields.insert("city".into(), serde_json::Value::from("Dhaka"));
    CartAddress {
        address_id,
        select_address: false,
        fields,
    }
}

#[tokio::test]
async fn first_add_creates_cart_and_duplicate_add_signals() {
    let (service, _tmp) = test_service().await;

    let outcome = service
        .add_line_item(BUYER, line_item("p1", StockFlag::In, 4))
        .await
        .unwrap();
    let CartAddOutcome::Added(cart) = outcome else {
        panic!("expected item to be added");
    };
    assert_eq!(cart.user_email, BUYER);
    assert_eq!(cart.product.len(), 1);

    // Same product id again: signal, no mutation
    let outcome = service
        .add_line_item(BUYER, line_item("p1", StockFlag::In, 4))
        .await
        .unwrap();
    assert!(matches!(outcome, CartAddOutcome::AlreadyInCart));

    let cart = service.fetch(BUYER).await.unwrap().unwrap();
    assert_eq!(cart.product.len(), 1);
}

#[tokio::test]
async fn out_of_stock_items_never_enter_the_cart() {
    let (service, _tmp) = test_service().await;

    let outcome = service
        .add_line_item(BUYER, line_item("p1", StockFlag::Out, 0))
        .await
        .unwrap();
    assert!(matches!(outcome, CartAddOutcome::OutOfStock));

    // A stale "in" flag with zero units is refused as well
    let outcome = service
        .add_line_item(BUYER, line_item("p2", StockFlag::In, 0))
        .await
        .unwrap();
    assert!(matches!(outcome, CartAddOutcome::OutOfStock));

    assert!(service.fetch(BUYER).await.unwrap().is_none());
}

#[tokio::test]
async fn update_line_item_patches_only_supplied_fields() {
    let (service, _tmp) = test_service().await;
    service
        .add_line_item(BUYER, line_item("p1", StockFlag::In, 4))
        .await
        .unwrap();

    let patch = CartItemPatch {
        quantity: Some(3),
        price: None,
        price_fixed: None,
        discount: None,
        discount_amount_fixed: None,
        discount_amount_total: Some(5.0),
        price_total: Some(70.0),
        stock: None,
        available: None,
        modified_at: None,
    };
    let cart = service.update_line_item(BUYER, "p1", patch).await.unwrap();

    let item = &cart.product[0];
    assert_eq!(item.quantity, 3);
    assert_eq!(item.price_total, 70.0);
    assert_eq!(item.discount_amount_total, 5.0);
    // Untouched fields keep their values
    assert_eq!(item.price, 25.0);
    assert_eq!(item.stock, StockFlag::In);
}

#[tokio::test]
async fn remove_line_item_pulls_by_product_id() {
    let (service, _tmp) = test_service().await;
    service
        .add_line_item(BUYER, line_item("p1", StockFlag::In, 4))
        .await
        .unwrap();
    service
        .add_line_item(BUYER, line_item("p2", StockFlag::In, 2))
        .await
        .unwrap();

    let cart = service.remove_line_item(BUYER, "p1").await.unwrap();
    assert_eq!(cart.product.len(), 1);
    assert_eq!(cart.product[0].product_id, "p2");
}

#[tokio::test]
async fn select_address_keeps_at_most_one_selection() {
    let (service, _tmp) = test_service().await;
    service.add_address(BUYER, address(1)).await.unwrap();
    service.add_address(BUYER, address(2)).await.unwrap();
    service.add_address(BUYER, address(3)).await.unwrap();

    let cart = service.select_address(BUYER, 2).await.unwrap();
    let selected: Vec<i64> = cart
        .address
        .iter()
        .filter(|a| a.select_address)
        .map(|a| a.address_id)
        .collect();
    assert_eq!(selected, vec![2]);

    // Switching the selection moves the single flag
    let cart = service.select_address(BUYER, 3).await.unwrap();
    let selected: Vec<i64> = cart
        .address
        .iter()
        .filter(|a| a.select_address)
        .map(|a| a.address_id)
        .collect();
    assert_eq!(selected, vec![3]);
}

#[tokio::test]
async fn update_and_remove_address_by_id() {
    let (service, _tmp) = test_service().await;
    service.add_address(BUYER, address(1)).await.unwrap();
    service.add_address(BUYER, address(2)).await.unwrap();

    let mut replacement = address(2);
    replacement
        .fields
        .insert("city".into(), serde_json::Value::from("Chattogram"));
    let cart = service.update_address(BUYER, replacement).await.unwrap();
    assert_eq!(
        cart.address[1].fields.get("city"),
        Some(&serde_json::Value::from("Chattogram"))
    );

    let cart = service.remove_address(BUYER, 1).await.unwrap();
    assert_eq!(cart.address.len(), 1);
    assert_eq!(cart.address[0].address_id, 2);
}

#[tokio::test]
async fn fetch_sweeps_out_of_stock_line_items() {
    let (service, _tmp) = test_service().await;
    service
        .add_line_item(BUYER, line_item("p1", StockFlag::In, 4))
        .await
        .unwrap();
    service
        .add_line_item(BUYER, line_item("p2", StockFlag::In, 2))
        .await
        .unwrap();

    // p2 goes out of stock after it was added
    let patch = CartItemPatch {
        quantity: None,
        price: None,
        price_fixed: None,
        discount: None,
        discount_amount_fixed: None,
        discount_amount_total: None,
        price_total: None,
        stock: Some(StockFlag::Out),
        available: Some(0),
        modified_at: None,
    };
    service.update_line_item(BUYER, "p2", patch).await.unwrap();

    let cart = service.fetch(BUYER).await.unwrap().unwrap();
    assert_eq!(cart.product.len(), 1);
    assert_eq!(cart.product[0].product_id, "p1");

    // The sweep persisted
    let cart = service.fetch(BUYER).await.unwrap().unwrap();
    assert_eq!(cart.product.len(), 1);
}
