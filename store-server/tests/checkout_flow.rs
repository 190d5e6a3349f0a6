//! Full cart-to-order lifecycle against a throwaway embedded database:
//! stock a product, fill the cart, check out, ship, and verify the
//! inventory and ledger side effects land exactly once.

use std::sync::Arc;
use store_server::db::DbService;
use store_server::db::models::{
    CartItemPatch, OrderCreate, OrderStatus, ProductCreate, StockFlag, TransitionPayload,
};
use store_server::db::repository::{ProductRepository, UserRepository};
use store_server::{CartAddOutcome, CartService, KeyedMutex, OrderEngine};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const OWNER: &str = "owner@shop.test";
const SELLER: &str = "seller@shop.test";
const BUYER: &str = "buyer@shop.test";

async fn seed_owner(db: &Surreal<Db>) {
    db.query(
        "UPSERT type::thing('user', $email) \
         SET email = $email, role = 'owner', total_earn = 0",
    )
    .bind(("email", OWNER.to_string()))
    .await
    .unwrap()
    .check()
    .unwrap();
}

#[tokio::test]
async fn stock_flag_follows_every_available_mutation() {
    let tmp = tempfile::tempdir().unwrap();
    let db = DbService::new(tmp.path()).await.unwrap().db;
    let products = ProductRepository::new(db.clone());

    let product = products
        .create(ProductCreate {
            title: "Ceramic Mug".to_string(),
            description: None,
            category: None,
            image: None,
            price: Some(9.5),
            discount: Some(0.0),
            seller: SELLER.to_string(),
            available: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(product.stock, StockFlag::In);
    let key = product.id.unwrap().key().to_string();

    let update = |available| store_server::db::models::ProductUpdate {
        title: None,
        description: None,
        category: None,
        image: None,
        price: None,
        discount: None,
        available: Some(available),
    };

    let product = products.update(&key, update(0)).await.unwrap();
    assert_eq!(product.stock, StockFlag::Out);

    let product = products.update(&key, update(5)).await.unwrap();
    assert_eq!(product.stock, StockFlag::In);
    assert_eq!(product.available, 5);
}

#[tokio::test]
async fn cart_to_shipped_order_applies_every_side_effect_once() {
    let tmp = tempfile::tempdir().unwrap();
    let db = DbService::new(tmp.path()).await.unwrap().db;
    let locks = Arc::new(KeyedMutex::new());
    seed_owner(&db).await;

    // Seller stocks a product; the stock flag derives from `available`
    let products = ProductRepository::new(db.clone());
    let product = products
        .create(ProductCreate {
            title: "Walnut Desk Shelf".to_string(),
            description: Some("Two-tier monitor riser".to_string()),
            category: Some("furniture".to_string()),
            image: None,
            price: Some(40.0),
            discount: Some(0.0),
            seller: SELLER.to_string(),
            available: Some(10),
        })
        .await
        .unwrap();
    assert_eq!(product.stock, StockFlag::In);
    let product_key = product.id.unwrap().key().to_string();

    // Buyer puts it in the cart and bumps the quantity to 3
    let carts = CartService::new(db.clone(), locks.clone());
    let snapshot = {
        let item = store_server::db::models::CartItem {
            product_id: product_key.clone(),
            quantity: 1,
            price: 40.0,
            price_fixed: 40.0,
            discount: 0.0,
            discount_amount_fixed: 0.0,
            discount_amount_total: 0.0,
            price_total: 40.0,
            stock: StockFlag::In,
            available: 10,
            modified_at: "2024-06-01T00:00:00Z".to_string(),
        };
        let CartAddOutcome::Added(_) = carts.add_line_item(BUYER, item).await.unwrap() else {
            panic!("expected item to be added");
        };
        let patch = CartItemPatch {
            quantity: Some(3),
            price: None,
            price_fixed: None,
            discount: None,
            discount_amount_fixed: None,
            discount_amount_total: None,
            price_total: Some(120.0),
            stock: None,
            available: None,
            modified_at: None,
        };
        carts.update_line_item(BUYER, &product_key, patch).await.unwrap()
    };

    // Checkout: the cart snapshot becomes a placed order entry
    let engine = OrderEngine::new(db.clone(), locks.clone());
    let entry = engine
        .place_order(
            BUYER,
            OrderCreate {
                order_id: 1001,
                seller: SELLER.to_string(),
                product: snapshot.product.clone(),
                address: None,
                price_total: 120.0,
                discount_amount_total: 0.0,
            },
        )
        .await
        .unwrap();
    assert_eq!(entry.status, OrderStatus::Placed);

    // Seller ships: one transaction moves status, credits both ledgers
    // and debits inventory
    let shipped = engine
        .transition_status(
            BUYER,
            1001,
            OrderStatus::Shipped,
            TransitionPayload {
                owner_commission: Some(12.0),
                total_earn: Some(108.0),
                seller_email: Some(SELLER.to_string()),
                product_id: Some(product_key.clone()),
                quantity: Some(3),
                cancel_reason: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let product = products.find_by_id(&product_key).await.unwrap().unwrap();
    assert_eq!(product.available, 7);
    assert_eq!(product.stock, StockFlag::In);
    assert_eq!(product.top_sell, 3);

    let users = UserRepository::new(db.clone());
    assert_eq!(users.owner_total().await.unwrap(), 12.0);
    assert_eq!(users.total_earned(SELLER).await.unwrap(), 108.0);

    // The flattened seller view sees exactly this order
    let seller_orders = engine.list_by_seller(Some(SELLER)).await.unwrap();
    assert_eq!(seller_orders.len(), 1);
    assert_eq!(seller_orders[0].user_email, BUYER);
    assert_eq!(seller_orders[0].orders.order_id, 1001);
    assert_eq!(seller_orders[0].orders.status, OrderStatus::Shipped);
}
