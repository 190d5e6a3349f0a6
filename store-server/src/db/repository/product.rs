//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Product, ProductCreate, ProductUpdate, RatingHistogram, StockFlag};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY title")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let key = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, key)).await?;
        Ok(product)
    }

    /// Create a new product
    ///
    /// The stored `stock` flag is derived from `available`; the rating
    /// histogram starts with all five buckets at zero.
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let available = data.available.unwrap_or(0);
        if available < 0 {
            return Err(RepoError::Validation("available cannot be negative".into()));
        }

        let product = Product {
            id: None,
            title: data.title,
            description: data.description,
            category: data.category,
            image: data.image,
            price: data.price.unwrap_or(0.0),
            discount: data.discount.unwrap_or(0.0),
            seller: data.seller,
            available,
            stock: StockFlag::from_available(available),
            top_sell: 0,
            rating: RatingHistogram::new(),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    ///
    /// Whenever `available` is part of the payload the `stock` flag is
    /// rederived in the same statement.
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let key = strip_table_prefix(PRODUCT_TABLE, id).to_string();

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = Vec::new();

        if data.title.is_some() {
            set_parts.push("title = $title");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.discount.is_some() {
            set_parts.push("discount = $discount");
        }
        if data.available.is_some() {
            set_parts.push("available = $available");
            set_parts.push("stock = $stock");
        }

        if set_parts.is_empty() {
            // No fields to update
            return self
                .find_by_id(&key)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }

        let query_str = format!(
            "UPDATE type::thing('product', $key) SET {} RETURN AFTER",
            set_parts.join(", ")
        );

        let mut query = self.base.db().query(query_str).bind(("key", key));

        if let Some(v) = data.title {
            query = query.bind(("title", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.discount {
            query = query.bind(("discount", v));
        }
        if let Some(v) = data.available {
            if v < 0 {
                return Err(RepoError::Validation("available cannot be negative".into()));
            }
            query = query
                .bind(("available", v))
                .bind(("stock", StockFlag::from_available(v)));
        }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;

        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let key = strip_table_prefix(PRODUCT_TABLE, id);
        let result: Option<Product> = self.base.db().delete((PRODUCT_TABLE, key)).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }
}
