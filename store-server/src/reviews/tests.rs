use super::*;
use crate::db::DbService;
use crate::db::models::ProductCreate;
use crate::db::repository::ProductRepository;

const REVIEWER: &str = "buyer@shop.test";

async fn test_service() -> (ReviewService, Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(tmp.path()).await.unwrap();
    let db = service.db;
    let reviews = ReviewService::new(db.clone(), Arc::new(KeyedMutex::new()));
    (reviews, db, tmp)
}

async fn seed_product(db: &Surreal<Db>) -> String {
    let repo = ProductRepository::new(db.clone());
    let product = repo
        .create(ProductCreate {
            title: "Espresso Grinder".to_string(),
            description: None,
            category: None,
            image: None,
            price: Some(129.0),
            discount: Some(0.0),
            seller: "seller@shop.test".to_string(),
            available: Some(5),
        })
        .await
        .unwrap();
    product.id.unwrap().key().to_string()
}

fn entry(rating_id: &str, product_id: &str, point: u8) -> ReviewEntry {
    ReviewEntry {
        rating_id: rating_id.to_string(),
        product_id: product_id.to_string(),
        rating_point: point,
        fields: serde_json::Map::new(),
    }
}

async fn histogram_of(db: &Surreal<Db>, key: &str) -> crate::db::models::RatingHistogram {
    ProductRepository::new(db.clone())
        .find_by_id(key)
        .await
        .unwrap()
        .unwrap()
        .rating
}

#[tokio::test]
async fn accepted_review_bumps_its_weight_bucket() {
    let (reviews, db, _tmp) = test_service().await;
    let key = seed_product(&db).await;

    let outcome = reviews.submit(REVIEWER, entry("r1", &key, 5)).await.unwrap();
    assert!(matches!(outcome, ReviewOutcome::Accepted(_)));

    let histogram = histogram_of(&db, &key).await;
    assert_eq!(histogram.count_for(5), 1);
    assert_eq!(histogram.count_for(4), 0);
    assert_eq!(histogram.total(), 1);
}

#[tokio::test]
async fn duplicate_rating_id_leaves_histogram_unchanged() {
    let (reviews, db, _tmp) = test_service().await;
    let key = seed_product(&db).await;

    reviews.submit(REVIEWER, entry("r1", &key, 4)).await.unwrap();
    let after_first = histogram_of(&db, &key).await;

    // Second submission with the same rating_id is a no-op
    let outcome = reviews.submit(REVIEWER, entry("r1", &key, 4)).await.unwrap();
    assert!(matches!(outcome, ReviewOutcome::AlreadyReviewed));

    assert_eq!(histogram_of(&db, &key).await, after_first);

    let mine = reviews.reviews_by_user(REVIEWER).await.unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn bucket_counts_sum_to_accepted_reviews() {
    let (reviews, db, _tmp) = test_service().await;
    let key = seed_product(&db).await;

    reviews.submit(REVIEWER, entry("r1", &key, 5)).await.unwrap();
    reviews.submit(REVIEWER, entry("r2", &key, 5)).await.unwrap();
    reviews.submit(REVIEWER, entry("r3", &key, 2)).await.unwrap();
    reviews
        .submit("second-buyer@shop.test", entry("r1", &key, 3))
        .await
        .unwrap();
    // Rejected duplicate must not count
    reviews.submit(REVIEWER, entry("r2", &key, 1)).await.unwrap();

    let histogram = histogram_of(&db, &key).await;
    assert_eq!(histogram.total(), 4);
    assert_eq!(histogram.count_for(5), 2);
    assert_eq!(histogram.count_for(3), 1);
    assert_eq!(histogram.count_for(2), 1);
    assert_eq!(histogram.count_for(1), 0);

    let product_reviews = reviews.reviews_by_product(&key).await.unwrap();
    assert_eq!(product_reviews.len() as u64, histogram.total());
}

#[tokio::test]
async fn unknown_product_records_nothing() {
    let (reviews, _db, _tmp) = test_service().await;

    let err = reviews
        .submit(REVIEWER, entry("r1", "missing", 5))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    // The entry was not kept either
    assert!(reviews.reviews_by_user(REVIEWER).await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_point_is_rejected() {
    let (reviews, db, _tmp) = test_service().await;
    let key = seed_product(&db).await;

    let err = reviews.submit(REVIEWER, entry("r1", &key, 6)).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    assert_eq!(histogram_of(&db, &key).await.total(), 0);
}
