/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/

pub mod sql_types {
    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "programstatus"))]
    pub struct Programstatus;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "payoutfrequency"))]
    pub struct Payoutfrequency;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "offervisibility"))]
    pub struct Offervisibility;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "creativetype"))]
    pub struct Creativetype;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "affiliatestatus"))]
    pub struct Affiliatestatus;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "eventtype"))]
    pub struct Eventtype;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "batchstatus"))]
    pub struct Batchstatus;
}

table! {
    programs (id) {
        id -> Int8,
        company_id -> Varchar,
        default_rate -> Numeric,
        payout_frequency -> crate::schema::sql_types::Payoutfrequency,
        cookie_window -> Int4,
        status -> crate::schema::sql_types::Programstatus,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    offers (id) {
        id -> Int8,
        program_id -> Int8,
        experience_id -> Nullable<Varchar>,
        name -> Varchar,
        description -> Text,
        terms -> Nullable<Text>,
        visibility -> crate::schema::sql_types::Offervisibility,
        start_at -> Nullable<Timestamptz>,
        end_at -> Nullable<Timestamptz>,
        rate_override -> Nullable<Numeric>,
        is_published -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    creatives (id) {
        id -> Int8,
        offer_id -> Int8,
        ctype -> crate::schema::sql_types::Creativetype,
        url -> Varchar,
        title -> Varchar,
        notes -> Nullable<Text>,
        metadata -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    affiliates (id) {
        id -> Int8,
        program_id -> Int8,
        user_id -> Varchar,
        status -> crate::schema::sql_types::Affiliatestatus,
        custom_rate -> Nullable<Numeric>,
        tier -> Varchar,
        rate_expiry -> Nullable<Timestamptz>,
        applied_at -> Timestamptz,
        approved_at -> Nullable<Timestamptz>,
        rejected_at -> Nullable<Timestamptz>,
        updated_at -> Timestamptz,
    }
}

table! {
    earnings_events (id) {
        id -> Int8,
        affiliate_id -> Int8,
        etype -> crate::schema::sql_types::Eventtype,
        amount -> Numeric,
        currency -> Varchar,
        source_ref -> Nullable<Varchar>,
        settled -> Bool,
        created_at -> Timestamptz,
    }
}

table! {
    payout_batches (id) {
        id -> Int8,
        program_id -> Int8,
        total -> Numeric,
        count -> Int4,
        status -> crate::schema::sql_types::Batchstatus,
        metadata -> Jsonb,
        processed_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

allow_tables_to_appear_in_same_query!(
    programs,
    offers,
    creatives,
    affiliates,
    earnings_events,
    payout_batches,
);
