use super::FieldMapping;
use crate::platform::{Platform, ResourceType};

static SHOPIFY_ORDERS: &[FieldMapping] = fields![
    "order_id" => [col!("id"), col!("order_id")],
    "order_number" => [col!("order_number"), col!("name")],
    "customer_id" => [col!("customer_id"), col!("customer.id")],
    "customer_email" => [col!("email"), col!("contact_email"), col!("customer.email")],
    "status" => [col!("financial_status"), col!("fulfillment_status")],
    "currency" => [col!("currency"), col!("presentment_currency")],
    "subtotal" => [col!("subtotal_price"), col!("current_subtotal_price")],
    "tax" => [col!("total_tax"), col!("current_total_tax")],
    "shipping" => [
        col!("total_shipping_price_set.shop_money.amount"),
        col!("total_shipping_price"),
        col!("shipping_lines_price"),
    ],
    "discount" => [col!("total_discounts"), col!("current_total_discounts")],
    "total" => [col!("total_price"), col!("current_total_price")],
    "item_count" => [col!("line_items_count"), col!("number_of_items"), col!("quantity")],
    "created_date" => [col!("created_at"), col!("processed_at")],
    "updated_date" => [col!("updated_at")],
];

static SHOPIFY_CUSTOMERS: &[FieldMapping] = fields![
    "customer_id" => [col!("id"), col!("customer_id")],
    "email" => [col!("email")],
    "first_name" => [col!("first_name")],
    "last_name" => [col!("last_name")],
    "phone" => [col!("phone"), col!("default_address.phone")],
    "country" => [col!("default_address.country_code"), col!("default_address_country_code"), col!("country")],
    "orders_count" => [col!("orders_count"), col!("number_of_orders")],
    "total_spent" => [col!("total_spent"), col!("amount_spent.amount")],
    "created_date" => [col!("created_at")],
    "updated_date" => [col!("updated_at")],
];

static SHOPIFY_PRODUCTS: &[FieldMapping] = fields![
    "product_id" => [col!("id"), col!("product_id")],
    "sku" => [col!("sku"), col!("variants.sku"), col!("variant_sku")],
    "title" => [col!("title")],
    "vendor" => [col!("vendor")],
    "category" => [col!("product_type"), col!("category")],
    "price" => [col!("price"), col!("variants.price"), col!("variant_price")],
    "inventory_quantity" => [col!("inventory_quantity"), col!("total_inventory")],
    "status" => [col!("status")],
    "created_date" => [col!("created_at")],
    "updated_date" => [col!("updated_at")],
];

static WOOCOMMERCE_ORDERS: &[FieldMapping] = fields![
    "order_id" => [col!("id")],
    "order_number" => [col!("number"), col!("order_key")],
    "customer_id" => [col!("customer_id")],
    "customer_email" => [col!("billing.email"), col!("billing_email")],
    "status" => [col!("status")],
    "currency" => [col!("currency")],
    "subtotal" => [col!("subtotal"), col!("cart_subtotal")],
    "tax" => [col!("total_tax"), col!("cart_tax")],
    "shipping" => [col!("shipping_total")],
    "discount" => [col!("discount_total")],
    "total" => [col!("total")],
    "item_count" => [col!("line_items_count"), col!("item_count")],
    "created_date" => [col!("date_created_gmt"), col!("date_created")],
    "updated_date" => [col!("date_modified_gmt"), col!("date_modified")],
];

static WOOCOMMERCE_CUSTOMERS: &[FieldMapping] = fields![
    "customer_id" => [col!("id")],
    "email" => [col!("email"), col!("billing.email")],
    "first_name" => [col!("first_name"), col!("billing.first_name")],
    "last_name" => [col!("last_name"), col!("billing.last_name")],
    "phone" => [col!("billing.phone"), col!("billing_phone")],
    "country" => [col!("billing.country"), col!("billing_country")],
    "orders_count" => [col!("orders_count")],
    "total_spent" => [col!("total_spent")],
    "created_date" => [col!("date_created_gmt"), col!("date_created")],
    "updated_date" => [col!("date_modified_gmt"), col!("date_modified")],
];

static WOOCOMMERCE_PRODUCTS: &[FieldMapping] = fields![
    "product_id" => [col!("id")],
    "sku" => [col!("sku")],
    "title" => [col!("name")],
    "vendor" => [col!("brand"), col!("brands.name")],
    "category" => [col!("categories.name"), col!("category")],
    "price" => [col!("price"), col!("regular_price")],
    "inventory_quantity" => [col!("stock_quantity")],
    "status" => [col!("status"), col!("stock_status")],
    "created_date" => [col!("date_created_gmt"), col!("date_created")],
    "updated_date" => [col!("date_modified_gmt"), col!("date_modified")],
];

static BIGCOMMERCE_ORDERS: &[FieldMapping] = fields![
    "order_id" => [col!("id")],
    "customer_id" => [col!("customer_id")],
    "customer_email" => [col!("billing_address.email"), col!("billing_address_email")],
    "status" => [col!("status"), col!("custom_status")],
    "currency" => [col!("currency_code"), col!("default_currency_code")],
    "subtotal" => [col!("subtotal_ex_tax"), col!("subtotal_inc_tax")],
    "tax" => [col!("total_tax")],
    "shipping" => [col!("shipping_cost_ex_tax"), col!("shipping_cost_inc_tax")],
    "discount" => [col!("discount_amount"), col!("coupon_discount")],
    "total" => [col!("total_inc_tax"), col!("total_ex_tax")],
    "item_count" => [col!("items_total")],
    "created_date" => [col!("date_created")],
    "updated_date" => [col!("date_modified")],
];

static BIGCOMMERCE_CUSTOMERS: &[FieldMapping] = fields![
    "customer_id" => [col!("id")],
    "email" => [col!("email")],
    "first_name" => [col!("first_name")],
    "last_name" => [col!("last_name")],
    "phone" => [col!("phone")],
    "country" => [col!("addresses.country_code"), col!("country_code")],
    "orders_count" => [col!("order_count"), col!("orders_count")],
    "total_spent" => [col!("total_spent"), col!("store_credit_amounts")],
    "created_date" => [col!("date_created")],
    "updated_date" => [col!("date_modified")],
];

static BIGCOMMERCE_PRODUCTS: &[FieldMapping] = fields![
    "product_id" => [col!("id")],
    "sku" => [col!("sku")],
    "title" => [col!("name")],
    "vendor" => [col!("brand_name"), col!("brand_id")],
    "category" => [col!("categories"), col!("category")],
    "price" => [col!("price"), col!("calculated_price")],
    "inventory_quantity" => [col!("inventory_level")],
    "status" => [col!("availability"), col!("is_visible")],
    "created_date" => [col!("date_created")],
    "updated_date" => [col!("date_modified")],
];

pub(super) fn fields(
    platform: Platform,
    resource: ResourceType,
) -> Option<&'static [FieldMapping]> {
    match (platform, resource) {
        (Platform::Shopify, ResourceType::Orders) => Some(SHOPIFY_ORDERS),
        (Platform::Shopify, ResourceType::Customers) => Some(SHOPIFY_CUSTOMERS),
        (Platform::Shopify, ResourceType::Products) => Some(SHOPIFY_PRODUCTS),
        (Platform::Woocommerce, ResourceType::Orders) => Some(WOOCOMMERCE_ORDERS),
        (Platform::Woocommerce, ResourceType::Customers) => Some(WOOCOMMERCE_CUSTOMERS),
        (Platform::Woocommerce, ResourceType::Products) => Some(WOOCOMMERCE_PRODUCTS),
        (Platform::Bigcommerce, ResourceType::Orders) => Some(BIGCOMMERCE_ORDERS),
        (Platform::Bigcommerce, ResourceType::Customers) => Some(BIGCOMMERCE_CUSTOMERS),
        (Platform::Bigcommerce, ResourceType::Products) => Some(BIGCOMMERCE_PRODUCTS),
        _ => None,
    }
}
