//! Diesel table definitions for the catalog schema.

diesel::table! {
    products (id) {
        id -> Int8,
        #[max_length = 255]
        product_id -> Varchar,
        #[max_length = 255]
        name -> Varchar,
        description -> Text,
        price -> Float8,
        #[max_length = 255]
        category -> Varchar,
        image_url -> Nullable<Text>,
        in_stock -> Bool,
    }
}

diesel::table! {
    orders (id) {
        id -> Int8,
        #[max_length = 255]
        order_id -> Varchar,
        #[max_length = 255]
        user_id -> Nullable<Varchar>,
        total_amount -> Float8,
        #[max_length = 50]
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    order_items (id) {
        id -> Int8,
        #[max_length = 255]
        order_id -> Varchar,
        #[max_length = 255]
        product_id -> Varchar,
        quantity -> Int4,
    }
}

diesel::allow_tables_to_appear_in_same_query!(orders, order_items);
