//! 测试共用的内存仓储

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use errors::{AppError, AppResult};
use futures::stream::{self, BoxStream, StreamExt};
use product_service::domain::entities::{Product, ProductDraft, ProductId};
use product_service::domain::repositories::ProductRepository;

#[derive(Default)]
struct State {
    rows: BTreeMap<i32, Product>,
    next_id: i32,
    inserts: usize,
}

/// 内存仓储
///
/// 与 products 表一致：名称唯一，ID 自增且不复用
#[derive(Default)]
pub struct InMemoryProductRepository {
    state: Mutex<State>,
    fail_reads: bool,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有读操作都返回数据库错误
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn with_products(drafts: &[ProductDraft]) -> Self {
        let repo = Self::new();
        {
            let mut state = repo.state.lock().unwrap();
            for draft in drafts {
                state.next_id += 1;
                let id = state.next_id;
                state.rows.insert(id, Product::new(ProductId(id), draft.clone()));
            }
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    pub fn names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.rows.values().map(|p| p.name.clone()).collect()
    }

    /// 包含失败的插入次数
    pub fn insert_attempts(&self) -> usize {
        self.state.lock().unwrap().inserts
    }

    pub fn get(&self, id: i32) -> Option<Product> {
        self.state.lock().unwrap().rows.get(&id).cloned()
    }

    fn read_guard(&self) -> AppResult<()> {
        if self.fail_reads {
            return Err(AppError::database("connection reset by peer"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, draft: &ProductDraft) -> AppResult<ProductId> {
        let mut state = self.state.lock().unwrap();
        state.inserts += 1;
        if state.rows.values().any(|p| p.name == draft.name) {
            return Err(AppError::database(format!(
                "duplicate key value violates unique constraint \"products_name_key\": {}",
                draft.name
            )));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.rows.insert(id, Product::new(ProductId(id), draft.clone()));
        Ok(ProductId(id))
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        self.read_guard()?;
        Ok(self.get(id.0))
    }

    async fn update(&self, id: ProductId, draft: &ProductDraft) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        if state
            .rows
            .iter()
            .any(|(other, p)| *other != id.0 && p.name == draft.name)
        {
            return Err(AppError::database("duplicate key value violates unique constraint"));
        }
        match state.rows.get_mut(&id.0) {
            Some(row) => {
                *row = Product::new(id, draft.clone());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: ProductId) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        Ok(state.rows.remove(&id.0).map_or(0, |_| 1))
    }

    fn stream_by_name(&self) -> BoxStream<'_, AppResult<Product>> {
        if self.fail_reads {
            return stream::iter(vec![Err(AppError::database("connection reset by peer"))]).boxed();
        }
        let mut products: Vec<Product> = self.state.lock().unwrap().rows.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        stream::iter(products.into_iter().map(Ok)).boxed()
    }
}

pub fn draft(name: &str, category: &str, amount: i32) -> ProductDraft {
    ProductDraft::new(name, format!("{} description", name), category, amount)
}
