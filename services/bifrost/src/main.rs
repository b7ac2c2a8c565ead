/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
#![allow(opaque_hidden_inferred_bound)]
extern crate pretty_env_logger;

mod auth;
mod error;
mod handler;

use std::convert::Infallible;
use std::env;
use std::sync::Arc;

use vinr_conduit::{webhook::SIGNATURE_HEADER, PlatformClient};
use vinr_ledger::PgPool;
use vinr_portal::notifications::Notifier;
use warp::{Filter, Rejection};

pub type Result<T> = std::result::Result<T, error::Error>;
pub type WebResult<T> = std::result::Result<T, Rejection>;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "4201";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let host: String = env::var("POD_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("POD_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());

    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "bifrost=info");
    }
    pretty_env_logger::init();

    let pool = vinr_ledger::create_connection_pool()
        .expect("Error: Could not connect to Affiliate Database");
    let platform = Arc::new(
        PlatformClient::from_env().expect("Error: Commerce platform configuration missing"),
    );
    let notifier = Notifier::new(Arc::clone(&platform));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS", "PUT", "DELETE"])
        .allow_credentials(true)
        .allow_headers(vec![
            "Accept",
            "Content-Type",
            "Content-Length",
            "Origin",
            "Referer",
            "User-Agent",
            "authorization",
        ]);

    let api = endpoints(pool, platform, notifier);
    let routes = api
        .with(cors)
        .with(warp::log("bifrost"))
        .recover(error::handle_rejection);
    let server = host.to_string() + ":" + &port;
    let socket: std::net::SocketAddr = server.parse().expect("Unable to parse socket address");

    warp::serve(routes).run(socket).await;
}

fn with_pool(pool: PgPool) -> impl Filter<Extract = (PgPool,), Error = Infallible> + Clone {
    warp::any().map(move || pool.clone())
}

fn with_platform(
    platform: Arc<PlatformClient>,
) -> impl Filter<Extract = (Arc<PlatformClient>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&platform))
}

fn with_notifier(
    notifier: Notifier,
) -> impl Filter<Extract = (Notifier,), Error = Infallible> + Clone {
    warp::any().map(move || notifier.clone())
}

fn endpoints(
    pool: PgPool,
    platform: Arc<PlatformClient>,
    notifier: Notifier,
) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let auth = auth::with_auth(Arc::clone(&platform));

    // Program configuration

    let program_get = warp::path("programs")
        .and(warp::path::end())
        .and(warp::get())
        .and(auth.clone())
        .and(warp::query::<handler::programs::ProgramQuery>())
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::programs::hndl_get_program);

    let program_upsert = warp::path("programs")
        .and(warp::path::end())
        .and(warp::post())
        .and(auth.clone())
        .and(warp::body::content_length_limit(100 * 1024).and(warp::body::json()))
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::programs::hndl_upsert_program);

    // Offer catalog

    let offers_list = warp::path("offers")
        .and(warp::path::end())
        .and(warp::get())
        .and(auth.clone())
        .and(warp::query::<handler::offers::OffersQuery>())
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::offers::hndl_list_offers);

    let offers_create = warp::path("offers")
        .and(warp::path::end())
        .and(warp::post())
        .and(auth.clone())
        .and(warp::body::content_length_limit(100 * 1024).and(warp::body::json()))
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::offers::hndl_create_offer);

    let offer_get = warp::path("offers")
        .and(warp::get())
        .and(auth.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::query::<handler::offers::CompanyQuery>())
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::offers::hndl_get_offer);

    let offer_update = warp::path("offers")
        .and(warp::put())
        .and(auth.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::body::content_length_limit(100 * 1024).and(warp::body::json()))
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and(with_notifier(notifier.clone()))
        .and_then(handler::offers::hndl_update_offer);

    let offer_delete = warp::path("offers")
        .and(warp::delete())
        .and(auth.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::query::<handler::offers::CompanyQuery>())
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::offers::hndl_delete_offer);

    // Creative registry

    let creatives_list = warp::path("creatives")
        .and(warp::path::end())
        .and(warp::get())
        .and(auth.clone())
        .and(warp::query::<handler::creatives::CreativesQuery>())
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::creatives::hndl_list_creatives);

    let creatives_create = warp::path("creatives")
        .and(warp::path::end())
        .and(warp::post())
        .and(auth.clone())
        .and(warp::body::content_length_limit(100 * 1024).and(warp::body::json()))
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and(with_notifier(notifier.clone()))
        .and_then(handler::creatives::hndl_create_creative);

    let creative_delete = warp::path("creatives")
        .and(warp::delete())
        .and(auth.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::query::<handler::creatives::CompanyQuery>())
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::creatives::hndl_delete_creative);

    // Affiliate registry

    let affiliates_apply = warp::path("affiliates")
        .and(warp::path("apply"))
        .and(warp::path::end())
        .and(warp::post())
        .and(auth.clone())
        .and(warp::body::content_length_limit(100 * 1024).and(warp::body::json()))
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::affiliates::hndl_apply);

    let affiliates_me_earnings = warp::path("affiliates")
        .and(warp::path("me"))
        .and(warp::path("earnings"))
        .and(warp::path::end())
        .and(warp::get())
        .and(auth.clone())
        .and(warp::query::<handler::affiliates::MyEarningsQuery>())
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::affiliates::hndl_my_earnings);

    let affiliates_list = warp::path("affiliates")
        .and(warp::path::end())
        .and(warp::get())
        .and(auth.clone())
        .and(warp::query::<handler::affiliates::AffiliatesQuery>())
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::affiliates::hndl_list_affiliates);

    let affiliate_approve = warp::path("affiliates")
        .and(warp::put())
        .and(auth.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path("approve"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(100 * 1024).and(warp::body::json()))
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and(with_notifier(notifier.clone()))
        .and_then(handler::affiliates::hndl_approve_affiliate);

    let affiliate_reject = warp::path("affiliates")
        .and(warp::put())
        .and(auth.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path("reject"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(100 * 1024).and(warp::body::json()))
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and(with_notifier(notifier.clone()))
        .and_then(handler::affiliates::hndl_reject_affiliate);

    // Earnings ledger

    let earnings_get = warp::path("earnings")
        .and(warp::path::end())
        .and(warp::get())
        .and(auth.clone())
        .and(warp::query::<handler::earnings::EarningsQuery>())
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::earnings::hndl_program_earnings);

    let events_track = warp::path("events")
        .and(warp::path::end())
        .and(warp::post())
        .and(auth.clone())
        .and(warp::body::content_length_limit(100 * 1024).and(warp::body::json()))
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and_then(handler::earnings::hndl_track_event);

    // Settlement

    let payouts_process = warp::path("payouts")
        .and(warp::path("process"))
        .and(warp::path::end())
        .and(warp::post())
        .and(auth.clone())
        .and(warp::body::content_length_limit(100 * 1024).and(warp::body::json()))
        .and(with_pool(pool.clone()))
        .and(with_platform(Arc::clone(&platform)))
        .and(with_notifier(notifier.clone()))
        .and_then(handler::payouts::hndl_process_payouts);

    let payouts_list = warp::path("payouts")
        .and(warp::path::end())
        .and(warp::get())
        .and(auth)
        .and(warp::query::<handler::payouts::PayoutsQuery>())
        .and(with_pool(pool))
        .and(with_platform(platform))
        .and_then(handler::payouts::hndl_list_payouts);

    // Platform webhook, signed instead of token-authenticated

    let webhook = warp::path("webhooks")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::header::optional::<String>(SIGNATURE_HEADER))
        .and(warp::body::bytes())
        .and_then(handler::webhook::hndl_webhook);

    program_get
        .or(program_upsert)
        .or(offers_list)
        .or(offers_create)
        .or(offer_get)
        .or(offer_update)
        .or(offer_delete)
        .or(creatives_list)
        .or(creatives_create)
        .or(creative_delete)
        .or(affiliates_apply)
        .or(affiliates_me_earnings)
        .or(affiliates_list)
        .or(affiliate_approve)
        .or(affiliate_reject)
        .or(earnings_get)
        .or(events_track)
        .or(payouts_process)
        .or(payouts_list)
        .or(webhook)
}
