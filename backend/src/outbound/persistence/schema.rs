//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations exactly. When a
//! migration changes a table, update the matching block here (or regenerate
//! with `diesel print-schema`).

diesel::table! {
    /// Registered identities and their credential digests.
    users (user_id) {
        user_id -> Uuid,
        name -> Varchar,
        surname -> Varchar,
        /// Unique, stored as supplied.
        email -> Varchar,
        is_active -> Bool,
        hashed_password -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    categories (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 100]
        slug -> Varchar,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Live articles.
    ///
    /// `category_id` has no foreign key: deleting a category leaves
    /// referencing articles in place.
    articles (id) {
        id -> Int4,
        #[max_length = 255]
        title -> Varchar,
        content -> Text,
        excerpt -> Nullable<Text>,
        category_id -> Int4,
        author_id -> Uuid,
        #[max_length = 500]
        image_url -> Nullable<Varchar>,
        is_published -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only snapshots of deleted articles.
    deleted_articles (id) {
        id -> Int4,
        original_id -> Int4,
        #[max_length = 255]
        title -> Varchar,
        content -> Text,
        excerpt -> Nullable<Text>,
        category_id -> Int4,
        author_id -> Uuid,
        #[max_length = 500]
        image_url -> Nullable<Varchar>,
        is_published -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Email work queue polled by the email worker.
    email_jobs (id) {
        id -> Int8,
        queue -> Varchar,
        payload -> Jsonb,
        /// One of `pending`, `running`, `done`, `failed`.
        status -> Varchar,
        /// Failed deliveries so far.
        attempts -> Int4,
        /// Next due time; for `running` jobs, when the claim lapses.
        run_at -> Timestamptz,
        last_error -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(articles -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(
    articles,
    categories,
    deleted_articles,
    email_jobs,
    users,
);
