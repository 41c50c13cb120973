use crate::{
    api::{attendance, payroll, requests},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/worksheet")
                            .route(web::post().to(attendance::worksheet)),
                    )
                    .service(
                        web::resource("/save-row").route(web::post().to(attendance::save_row)),
                    )
                    .service(
                        web::resource("/save-batch").route(web::post().to(attendance::save_batch)),
                    )
                    .service(
                        web::resource("/csv-import").route(web::post().to(attendance::csv_import)),
                    )
                    .service(web::resource("/range").route(web::get().to(attendance::range))),
            )
            .service(
                web::scope("/payroll")
                    .service(
                        web::resource("/attendance-overview")
                            .route(web::post().to(payroll::overview)),
                    )
                    .service(
                        web::resource("/performance-overview")
                            .route(web::post().to(payroll::performance)),
                    )
                    .service(
                        web::resource("/salary-summary").route(web::post().to(payroll::summary)),
                    )
                    .service(web::resource("/report").route(web::post().to(payroll::report)))
                    .service(
                        web::resource("/employee-breakdown/{employee_id}")
                            .route(web::get().to(payroll::breakdown)),
                    )
                    .service(web::resource("/live-payroll").route(web::get().to(payroll::live)))
                    .service(web::resource("/export").route(web::post().to(payroll::export))),
            )
            .service(
                web::scope("/requests")
                    .service(
                        web::resource("/leave").route(web::post().to(requests::submit_leave)),
                    )
                    .service(
                        web::resource("/correction")
                            .route(web::post().to(requests::submit_correction)),
                    )
                    .service(web::resource("/pending").route(web::get().to(requests::pending)))
                    .service(
                        web::resource("/leave/{request_id}/approve")
                            .route(web::patch().to(requests::approve_leave)),
                    )
                    .service(
                        web::resource("/leave/{request_id}/reject")
                            .route(web::patch().to(requests::reject_leave)),
                    )
                    .service(
                        web::resource("/correction/{request_id}/approve")
                            .route(web::patch().to(requests::approve_correction)),
                    )
                    .service(
                        web::resource("/correction/{request_id}/reject")
                            .route(web::patch().to(requests::reject_correction)),
                    ),
            ),
    );
}
