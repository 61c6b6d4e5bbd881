use crate::domain::model::{
    Customer, CustomerInput, MessageResponse, Order, OrderInput, OrderLine, OrderStatus, Product,
    ProductInput,
};
use crate::transport::http::handlers::{customers, health, orders, products};
use crate::transport::http::types::{AppState, HealthResponse};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::server::Server;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_JSON_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Order Catalogue API Documentation",
        version = "1.0.0",
        description = "CRUD APIs for the customers, products and orders of the ordering catalogue."
    ),
    paths(
        health::healthcheck_handler,
        customers::create_customer_handler,
        customers::list_customers_handler,
        customers::get_customer_handler,
        customers::update_customer_handler,
        customers::delete_customer_handler,
        products::create_product_handler,
        products::list_products_handler,
        products::get_product_handler,
        products::update_product_handler,
        products::delete_product_handler,
        orders::create_order_handler,
        orders::list_orders_handler,
        orders::get_order_handler,
        orders::update_order_handler,
        orders::delete_order_handler
    ),
    components(schemas(
        Customer,
        CustomerInput,
        Product,
        ProductInput,
        Order,
        OrderInput,
        OrderLine,
        OrderStatus,
        MessageResponse,
        HealthResponse
    )),
    tags(
        (name = "Customers", description = "Customer management APIs"),
        (name = "Products", description = "Product management APIs"),
        (name = "Orders", description = "Order management APIs"),
        (name = "Health", description = "Liveness of the service and its store")
    ),
    modifiers(&BearerAuthAddon)
)]
pub struct ApiDoc;

/// Declares the `bearerAuth` scheme in the document. Nothing on the router checks it.
struct BearerAuthAddon;

impl Modify for BearerAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// The generated document, with the resource mount point as its server URL.
pub fn api_doc(base_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let url = if base_path.is_empty() { "/" } else { base_path };
    doc.servers = Some(vec![Server::new(url)]);
    doc
}

/// Resource routes (mounted under `base_path`) plus `/health`.
pub fn create_router(app_state: AppState, base_path: &str) -> Router {
    let resources = Router::new()
        .route(
            "/customers",
            get(customers::list_customers_handler).post(customers::create_customer_handler),
        )
        .route(
            "/customers/:id",
            get(customers::get_customer_handler)
                .put(customers::update_customer_handler)
                .delete(customers::delete_customer_handler),
        )
        .route(
            "/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/products/:id",
            get(products::get_product_handler)
                .put(products::update_product_handler)
                .delete(products::delete_product_handler),
        )
        .route(
            "/orders",
            get(orders::list_orders_handler).post(orders::create_order_handler),
        )
        .route(
            "/orders/:id",
            get(orders::get_order_handler)
                .put(orders::update_order_handler)
                .delete(orders::delete_order_handler),
        );

    let router = if base_path.is_empty() {
        resources
    } else {
        Router::new().nest(base_path, resources)
    };

    router
        .route("/health", get(health::healthcheck_handler))
        .with_state(app_state)
}

/// The full application: routes, Swagger UI, request tracing and CORS.
pub fn create_app(app_state: AppState, base_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    create_router(app_state, base_path)
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON_PATH, api_doc(base_path)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
