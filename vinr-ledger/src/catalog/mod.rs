/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
#![allow(clippy::extra_unused_lifetimes)]

pub mod api;
pub use api::*;

use crate::error::LedgerError;
use crate::schema::{creatives, offers, programs};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::*;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Programstatus"]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
    #[db_rename = "active"]
    Active,
    #[db_rename = "inactive"]
    Inactive,
}

impl ToString for ProgramStatus {
    fn to_string(&self) -> String {
        match self {
            Self::Active => "active".to_string(),
            Self::Inactive => "inactive".to_string(),
        }
    }
}

impl std::str::FromStr for ProgramStatus {
    type Err = LedgerError;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "active" => Ok(ProgramStatus::Active),
            "inactive" => Ok(ProgramStatus::Inactive),
            _ => Err(LedgerError::new(&format!(
                "Program status {} does not exist",
                src
            ))),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Payoutfrequency"]
#[serde(rename_all = "lowercase")]
pub enum PayoutFrequency {
    #[db_rename = "weekly"]
    Weekly,
    #[db_rename = "monthly"]
    Monthly,
}

impl ToString for PayoutFrequency {
    fn to_string(&self) -> String {
        match self {
            Self::Weekly => "weekly".to_string(),
            Self::Monthly => "monthly".to_string(),
        }
    }
}

impl std::str::FromStr for PayoutFrequency {
    type Err = LedgerError;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "weekly" => Ok(PayoutFrequency::Weekly),
            "monthly" => Ok(PayoutFrequency::Monthly),
            _ => Err(LedgerError::new(&format!(
                "Payout frequency {} does not exist",
                src
            ))),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Offervisibility"]
#[serde(rename_all = "snake_case")]
pub enum OfferVisibility {
    #[db_rename = "public"]
    Public,
    #[db_rename = "invite_only"]
    InviteOnly,
    #[db_rename = "private"]
    Private,
}

impl ToString for OfferVisibility {
    fn to_string(&self) -> String {
        match self {
            Self::Public => "public".to_string(),
            Self::InviteOnly => "invite_only".to_string(),
            Self::Private => "private".to_string(),
        }
    }
}

impl std::str::FromStr for OfferVisibility {
    type Err = LedgerError;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "public" => Ok(OfferVisibility::Public),
            "invite_only" => Ok(OfferVisibility::InviteOnly),
            "private" => Ok(OfferVisibility::Private),
            _ => Err(LedgerError::new(&format!(
                "Offer visibility {} does not exist",
                src
            ))),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Creativetype"]
#[serde(rename_all = "lowercase")]
pub enum CreativeType {
    #[db_rename = "image"]
    Image,
    #[db_rename = "video"]
    Video,
    #[db_rename = "document"]
    Document,
}

impl ToString for CreativeType {
    fn to_string(&self) -> String {
        match self {
            Self::Image => "image".to_string(),
            Self::Video => "video".to_string(),
            Self::Document => "document".to_string(),
        }
    }
}

impl std::str::FromStr for CreativeType {
    type Err = LedgerError;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "image" => Ok(CreativeType::Image),
            "video" => Ok(CreativeType::Video),
            "document" => Ok(CreativeType::Document),
            _ => Err(LedgerError::new(&format!(
                "Creative type {} does not exist",
                src
            ))),
        }
    }
}

#[derive(Queryable, Identifiable, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[diesel(table_name = programs)]
pub struct Program {
    pub id: i64,
    pub company_id: String,
    pub default_rate: BigDecimal,
    pub payout_frequency: PayoutFrequency,
    pub cookie_window: i32,
    pub status: ProgramStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = programs)]
pub struct ProgramNew<'a> {
    pub company_id: &'a String,
    pub default_rate: &'a BigDecimal,
    pub payout_frequency: &'a PayoutFrequency,
    pub cookie_window: &'a i32,
    pub status: &'a ProgramStatus,
}

#[derive(Queryable, Identifiable, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[diesel(table_name = offers)]
pub struct Offer {
    pub id: i64,
    pub program_id: i64,
    pub experience_id: Option<String>,
    pub name: String,
    pub description: String,
    pub terms: Option<String>,
    pub visibility: OfferVisibility,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub rate_override: Option<BigDecimal>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = offers)]
pub struct OfferNew<'a> {
    pub program_id: &'a i64,
    pub experience_id: Option<&'a String>,
    pub name: &'a String,
    pub description: &'a String,
    pub terms: Option<&'a String>,
    pub visibility: &'a OfferVisibility,
    pub start_at: Option<&'a DateTime<Utc>>,
    pub end_at: Option<&'a DateTime<Utc>>,
    pub rate_override: Option<&'a BigDecimal>,
    pub is_published: &'a bool,
}

/// Partial update for an offer, absent fields are left untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = offers)]
pub struct OfferUpdate {
    pub experience_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub terms: Option<String>,
    pub visibility: Option<OfferVisibility>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub rate_override: Option<BigDecimal>,
    pub is_published: Option<bool>,
}

impl OfferUpdate {
    /// An all-None changeset must not reach the database, diesel refuses
    /// to build an update without any changed column.
    pub fn has_changes(&self) -> bool {
        self.experience_id.is_some()
            || self.name.is_some()
            || self.description.is_some()
            || self.terms.is_some()
            || self.visibility.is_some()
            || self.start_at.is_some()
            || self.end_at.is_some()
            || self.rate_override.is_some()
            || self.is_published.is_some()
    }
}

#[derive(Queryable, Identifiable, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[diesel(table_name = creatives)]
pub struct Creative {
    pub id: i64,
    pub offer_id: i64,
    #[serde(rename = "type")]
    pub ctype: CreativeType,
    pub url: String,
    pub title: String,
    pub notes: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = creatives)]
pub struct CreativeNew<'a> {
    pub offer_id: &'a i64,
    pub ctype: &'a CreativeType,
    pub url: &'a String,
    pub title: &'a String,
    pub notes: Option<&'a String>,
    pub metadata: Option<&'a serde_json::Value>,
}
