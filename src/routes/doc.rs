use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddItemParams, SetQuantityParams},
        orders::{AddressDto, CheckoutItem, CheckoutRequest, CheckoutResponse, OrderDto, OrderLineDto, OrderList},
        products::ProductList,
    },
    models::{Order, OrderItem, PricedCart, PricedLine, Product},
    response::{ApiResponse, Meta},
    routes::{cart, checkout, health, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        cart::get_cart,
        cart::add_item,
        cart::set_quantity,
        cart::remove_item,
        cart::clear_cart,
        checkout::checkout,
        checkout::handle_webhook,
        orders::list_orders
    ),
    components(
        schemas(
            Product,
            PricedCart,
            PricedLine,
            Order,
            OrderItem,
            ProductList,
            OrderList,
            OrderDto,
            OrderLineDto,
            AddressDto,
            CheckoutItem,
            CheckoutRequest,
            CheckoutResponse,
            AddItemParams,
            SetQuantityParams,
            params::Pagination,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<PricedCart>,
            ApiResponse<OrderList>,
            ApiResponse<CheckoutResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Read-only product catalog"),
        (name = "Cart", description = "Session-scoped cart endpoints"),
        (name = "Checkout", description = "Checkout and payment webhook"),
        (name = "Orders", description = "Order history"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
