//! gRPC service implementation
//!
//! Pure translation layer between the wire contract and the
//! [`ServiceHandler`]: no business logic of its own, errors propagate
//! unchanged.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use catalog_bootstrap::record_grpc_request;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::debug;

use super::conversions::{category_to_proto, parse_category_id};
use crate::application::ServiceHandler;
use crate::application::commands::CreateCategoryCommand;
use crate::application::queries::{GetCategoryQuery, ListCategoriesQuery};
use crate::proto;
use crate::proto::category_service_server::CategoryService;

const SERVICE_NAME: &str = "catalog.category.v1.CategoryService";

pub struct CategoryServiceImpl {
    handler: Arc<ServiceHandler>,
}

impl CategoryServiceImpl {
    pub fn new(handler: Arc<ServiceHandler>) -> Self {
        Self { handler }
    }
}

fn status_label<T>(result: &Result<T, Status>) -> String {
    match result {
        Ok(_) => "Ok".to_string(),
        Err(status) => format!("{:?}", status.code()),
    }
}

fn observe<T>(method: &str, started: Instant, result: &Result<T, Status>) {
    record_grpc_request(
        SERVICE_NAME,
        method,
        &status_label(result),
        started.elapsed().as_secs_f64() * 1000.0,
    );
}

#[tonic::async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn create_category(
        &self,
        request: Request<proto::CreateCategoryRequest>,
    ) -> Result<Response<proto::Category>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        let result = self
            .handler
            .create_category(CreateCategoryCommand {
                name: req.name,
                description: req.description,
            })
            .await
            .map(|category| category_to_proto(&category))
            .map_err(Status::from);

        observe("CreateCategory", started, &result);
        result.map(Response::new)
    }

    async fn list_categories(
        &self,
        _request: Request<proto::ListCategoriesRequest>,
    ) -> Result<Response<proto::CategoryList>, Status> {
        let started = Instant::now();

        let result = self
            .handler
            .list_categories(ListCategoriesQuery)
            .await
            .map(|categories| proto::CategoryList {
                categories: categories.iter().map(category_to_proto).collect(),
            })
            .map_err(Status::from);

        observe("ListCategories", started, &result);
        result.map(Response::new)
    }

    async fn get_category_by_id(
        &self,
        request: Request<proto::GetCategoryByIdRequest>,
    ) -> Result<Response<proto::Category>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        let result = async {
            let id = parse_category_id(&req.id)?;
            let category = self.handler.get_category(GetCategoryQuery { id }).await?;
            Ok::<_, catalog_errors::AppError>(category_to_proto(&category))
        }
        .await
        .map_err(Status::from);

        observe("GetCategoryById", started, &result);
        result.map(Response::new)
    }

    async fn create_category_stream(
        &self,
        request: Request<Streaming<proto::CreateCategoryRequest>>,
    ) -> Result<Response<proto::CategoryList>, Status> {
        let started = Instant::now();
        let mut stream = request.into_inner();

        // Strictly sequential: the next request is not read until the
        // current one has been persisted. The first failure aborts the
        // whole call; categories persisted before it stay persisted.
        let result = async {
            let mut categories = Vec::new();
            while let Some(req) = stream.message().await? {
                let category = self
                    .handler
                    .create_category(CreateCategoryCommand {
                        name: req.name,
                        description: req.description,
                    })
                    .await?;
                categories.push(category_to_proto(&category));
            }
            debug!(count = categories.len(), "Create stream completed");
            Ok(proto::CategoryList { categories })
        }
        .await;

        observe("CreateCategoryStream", started, &result);
        result.map(Response::new)
    }

    type CreateCategoryStreamBidirectionalStream =
        Pin<Box<dyn Stream<Item = Result<proto::Category, Status>> + Send + 'static>>;

    async fn create_category_stream_bidirectional(
        &self,
        request: Request<Streaming<proto::CreateCategoryRequest>>,
    ) -> Result<Response<Self::CreateCategoryStreamBidirectionalStream>, Status> {
        let started = Instant::now();
        let mut stream = request.into_inner();
        let handler = Arc::clone(&self.handler);

        let (tx, rx) = mpsc::channel(16);

        // One response per request, in receipt order; persistence of item
        // n+1 does not start before item n's response has been queued.
        tokio::spawn(async move {
            loop {
                let req = match stream.message().await {
                    Ok(Some(req)) => req,
                    Ok(None) => break,
                    Err(status) => {
                        let _ = tx.send(Err(status)).await;
                        break;
                    }
                };

                let created = handler
                    .create_category(CreateCategoryCommand {
                        name: req.name,
                        description: req.description,
                    })
                    .await;

                match created {
                    Ok(category) => {
                        if tx.send(Ok(category_to_proto(&category))).await.is_err() {
                            // Caller went away; stop processing.
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(Status::from(e))).await;
                        break;
                    }
                }
            }
        });

        let result: Result<(), Status> = Ok(());
        observe("CreateCategoryStreamBidirectional", started, &result);

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }
}
