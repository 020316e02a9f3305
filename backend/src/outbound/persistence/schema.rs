//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Enumerations
//! (`role`, `kind`, `status`) are stored as text guarded by `CHECK`
//! constraints.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Text,
        password_hash -> Text,
        /// `USER` or `ADMIN`.
        role -> Text,
        is_banned -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One profile per account.
    profiles (user_id) {
        user_id -> Uuid,
        location -> Varchar,
        profile_photo_url -> Text,
        availability -> Varchar,
        is_public -> Bool,
    }
}

diesel::table! {
    /// Skill catalogue; names are unique ignoring case.
    skills (id) {
        id -> Uuid,
        name -> Varchar,
        is_approved -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Offered and wanted skill lists. `position` preserves insertion order.
    profile_skills (user_id, kind, skill_id) {
        user_id -> Uuid,
        skill_id -> Uuid,
        /// `offered` or `wanted`.
        kind -> Text,
        position -> Int8,
    }
}

diesel::table! {
    swaps (id) {
        id -> Uuid,
        requester_id -> Uuid,
        receiver_id -> Uuid,
        skill_offered_id -> Uuid,
        skill_wanted_id -> Uuid,
        status -> Text,
        message -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// At most one entry per swap.
    feedback (id) {
        id -> Uuid,
        swap_id -> Uuid,
        rater_id -> Uuid,
        rated_user_id -> Uuid,
        rating -> Int2,
        comment -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(profiles -> users (user_id));
diesel::joinable!(profile_skills -> skills (skill_id));
diesel::joinable!(feedback -> swaps (swap_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    profiles,
    skills,
    profile_skills,
    swaps,
    feedback,
);
