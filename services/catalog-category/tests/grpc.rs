//! End-to-end gRPC tests
//!
//! Boots the real tonic server on an ephemeral port, backed by the
//! in-memory repository, and drives it with the generated client.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use catalog_errors::{AppError, AppResult};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::Code;
use tonic::transport::{Channel, Server};

use catalog_category::api::CategoryServiceImpl;
use catalog_category::application::ServiceHandler;
use catalog_category::domain::entities::Category;
use catalog_category::domain::repositories::CategoryRepository;
use catalog_category::domain::value_objects::CategoryId;
use catalog_category::infrastructure::persistence::InMemoryCategoryRepository;
use catalog_category::proto::category_service_client::CategoryServiceClient;
use catalog_category::proto::category_service_server::CategoryServiceServer;
use catalog_category::proto::{
    CreateCategoryRequest, GetCategoryByIdRequest, ListCategoriesRequest,
};

/// Fails every create once `fail_after` successful creates have happened
struct FlakyRepository {
    inner: Arc<InMemoryCategoryRepository>,
    fail_after: usize,
    creates: AtomicUsize,
}

impl FlakyRepository {
    fn new(inner: Arc<InMemoryCategoryRepository>, fail_after: usize) -> Self {
        Self {
            inner,
            fail_after,
            creates: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CategoryRepository for FlakyRepository {
    async fn create(&self, name: &str, description: &str) -> AppResult<Category> {
        if self.creates.fetch_add(1, Ordering::SeqCst) >= self.fail_after {
            return Err(AppError::database("storage unavailable"));
        }
        self.inner.create(name, description).await
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>> {
        self.inner.find_by_id(id).await
    }
}

async fn start_server(repo: Arc<dyn CategoryRepository>) -> CategoryServiceClient<Channel> {
    let handler = Arc::new(ServiceHandler::new(repo));
    let service = CategoryServiceImpl::new(handler);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        Server::builder()
            .add_service(CategoryServiceServer::new(service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    CategoryServiceClient::connect(format!("http://{}", addr))
        .await
        .expect("client should connect")
}

fn create_request(name: &str, description: &str) -> CreateCategoryRequest {
    CreateCategoryRequest {
        name: name.to_string(),
        description: description.to_string(),
    }
}

#[tokio::test]
async fn test_create_category() {
    let mut client = start_server(Arc::new(InMemoryCategoryRepository::new())).await;

    let out = client
        .create_category(create_request("test name", "test description"))
        .await
        .unwrap()
        .into_inner();

    assert!(!out.id.is_empty());
    assert_eq!(out.name, "test name");
    assert_eq!(out.description, "test description");
}

#[tokio::test]
async fn test_create_category_with_empty_name() {
    let mut client = start_server(Arc::new(InMemoryCategoryRepository::new())).await;

    let status = client
        .create_category(create_request("", "test description"))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn test_identical_creates_get_distinct_ids() {
    let mut client = start_server(Arc::new(InMemoryCategoryRepository::new())).await;

    let first = client
        .create_category(create_request("dup", "same"))
        .await
        .unwrap()
        .into_inner();
    let second = client
        .create_category(create_request("dup", "same"))
        .await
        .unwrap()
        .into_inner();

    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_list_categories_on_empty_store() {
    let mut client = start_server(Arc::new(InMemoryCategoryRepository::new())).await;

    let out = client
        .list_categories(ListCategoriesRequest {})
        .await
        .unwrap()
        .into_inner();

    assert!(out.categories.is_empty());
}

#[tokio::test]
async fn test_list_categories() {
    let mut client = start_server(Arc::new(InMemoryCategoryRepository::new())).await;

    client
        .create_category(create_request("nam", "desc"))
        .await
        .unwrap();
    client
        .create_category(create_request("foo", "bar"))
        .await
        .unwrap();

    let out = client
        .list_categories(ListCategoriesRequest {})
        .await
        .unwrap()
        .into_inner();

    assert_eq!(out.categories.len(), 2);
    let names: Vec<_> = out.categories.iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"nam"));
    assert!(names.contains(&"foo"));
}

#[tokio::test]
async fn test_get_category_by_id() {
    let repo = Arc::new(InMemoryCategoryRepository::new());
    let mut client = start_server(repo.clone()).await;

    let created = repo.create("test name", "desc").await.unwrap();

    let out = client
        .get_category_by_id(GetCategoryByIdRequest {
            id: created.id.to_string(),
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(out.id, created.id.to_string());
    assert_eq!(out.name, "test name");
    assert_eq!(out.description, "desc");
}

#[tokio::test]
async fn test_get_category_by_unknown_id() {
    let mut client = start_server(Arc::new(InMemoryCategoryRepository::new())).await;

    let status = client
        .get_category_by_id(GetCategoryByIdRequest {
            id: CategoryId::new().to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_get_category_by_malformed_id() {
    let mut client = start_server(Arc::new(InMemoryCategoryRepository::new())).await;

    let status = client
        .get_category_by_id(GetCategoryByIdRequest {
            id: "not-a-uuid".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn test_create_category_stream() {
    let mut client = start_server(Arc::new(InMemoryCategoryRepository::new())).await;

    let requests: Vec<_> = (0..3)
        .map(|i| create_request(&format!("test name {}", i), &format!("test description {}", i)))
        .collect();

    let out = client
        .create_category_stream(tokio_stream::iter(requests))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(out.categories.len(), 3);
    for (i, category) in out.categories.iter().enumerate() {
        assert!(!category.id.is_empty());
        assert_eq!(category.name, format!("test name {}", i));
        assert_eq!(category.description, format!("test description {}", i));
    }

    let ids: std::collections::HashSet<_> =
        out.categories.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_create_category_stream_bidirectional() {
    let mut client = start_server(Arc::new(InMemoryCategoryRepository::new())).await;

    let requests: Vec<_> = (0..3)
        .map(|i| create_request(&format!("test name {}", i), &format!("test description {}", i)))
        .collect();

    let mut stream = client
        .create_category_stream_bidirectional(tokio_stream::iter(requests))
        .await
        .unwrap()
        .into_inner();

    let mut out = Vec::new();
    while let Some(category) = stream.message().await.unwrap() {
        out.push(category);
    }

    assert_eq!(out.len(), 3);
    for (i, category) in out.iter().enumerate() {
        assert!(!category.id.is_empty());
        assert_eq!(category.name, format!("test name {}", i));
    }
}

#[tokio::test]
async fn test_create_category_stream_aborts_on_store_failure() {
    let inner = Arc::new(InMemoryCategoryRepository::new());
    let repo = Arc::new(FlakyRepository::new(inner.clone(), 2));
    let mut client = start_server(repo).await;

    let requests: Vec<_> = (0..3)
        .map(|i| create_request(&format!("test name {}", i), ""))
        .collect();

    let status = client
        .create_category_stream(tokio_stream::iter(requests))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Internal);
    // Items persisted before the failure are not rolled back.
    assert_eq!(inner.find_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_bidirectional_stream_aborts_on_store_failure() {
    let inner = Arc::new(InMemoryCategoryRepository::new());
    let repo = Arc::new(FlakyRepository::new(inner.clone(), 2));
    let mut client = start_server(repo).await;

    let requests: Vec<_> = (0..3)
        .map(|i| create_request(&format!("test name {}", i), ""))
        .collect();

    let mut stream = client
        .create_category_stream_bidirectional(tokio_stream::iter(requests))
        .await
        .unwrap()
        .into_inner();

    let mut received = Vec::new();
    let error = loop {
        match stream.message().await {
            Ok(Some(category)) => received.push(category),
            Ok(None) => panic!("stream ended without the expected error"),
            Err(status) => break status,
        }
    };

    assert_eq!(received.len(), 2);
    assert_eq!(error.code(), Code::Internal);
    assert_eq!(inner.find_all().await.unwrap().len(), 2);
}
