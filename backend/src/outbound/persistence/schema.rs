//! Diesel table definitions for the review store.
//!
//! Kept in lockstep with the SQL in `migrations/`. The case-insensitive
//! uniqueness of `users.username` lives in a `COLLATE NOCASE` index rather
//! than on the column, so lookups stay case-sensitive by default.

diesel::table! {
    users (id) {
        id -> Text,
        username -> Text,
        password_hash -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    books (isbn) {
        isbn -> Text,
        title -> Text,
        author -> Text,
        year -> Integer,
    }
}

diesel::table! {
    reviews (id) {
        id -> Text,
        isbn -> Text,
        user_id -> Text,
        rating -> Integer,
        comment -> Text,
        created_at -> Timestamp,
    }
}

diesel::joinable!(reviews -> users (user_id));
diesel::joinable!(reviews -> books (isbn));

diesel::allow_tables_to_appear_in_same_query!(users, books, reviews);
