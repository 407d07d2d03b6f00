use crate::{
    api::{department, employee, half_day_option, leave_request, position},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfigBuilder, PeerIpKeyExtractor,
};
use actix_web::{middleware::from_fn, web};
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

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let employee_auth_limiter = Arc::new(build_limiter(config.rate_employee_auth_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/admin/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::admin_login)),
            )
            .service(
                web::resource("/employee/auth")
                    .wrap(employee_auth_limiter.clone())
                    .route(web::post().to(handlers::employee_auth)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Public routes under the API prefix, registered as exact-path resources
    // ahead of the protected scope. A resource only matches its full path, so
    // everything else still reaches the scope below.
    cfg.service(
        web::resource(format!("{}/leave-requests/calendar/company", config.api_prefix))
            .route(web::get().to(leave_request::company_calendar)),
    );
    cfg.service(
        web::resource(format!("{}/departments/active", config.api_prefix))
            .route(web::get().to(department::active_departments)),
    );
    cfg.service(
        web::resource(format!("{}/positions/active", config.api_prefix))
            .route(web::get().to(position::active_positions)),
    );
    // Half-day option writes guard themselves through the AuthUser extractor,
    // so the whole catalog lives on one resource pair.
    cfg.service(
        web::resource(format!("{}/half-day-options", config.api_prefix))
            .route(web::get().to(half_day_option::list_options))
            .route(web::post().to(half_day_option::create_option)),
    );
    cfg.service(
        web::resource(format!("{}/half-day-options/{{id}}", config.api_prefix))
            .route(web::put().to(half_day_option::update_option))
            .route(web::delete().to(half_day_option::delete_option)),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/department/{department}
                    .service(
                        web::resource("/department/{department}")
                            .route(web::get().to(employee::employees_by_department)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/leave-requests")
                    // /leave-requests
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::list_leaves))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave-requests/my-requests
                    .service(
                        web::resource("/my-requests")
                            .route(web::get().to(leave_request::my_requests)),
                    )
                    // /leave-requests/admin
                    .service(
                        web::resource("/admin")
                            .route(web::post().to(leave_request::admin_create_leave)),
                    )
                    // /leave-requests/statistics/summary
                    .service(
                        web::resource("/statistics/summary")
                            .route(web::get().to(leave_request::leave_statistics)),
                    )
                    // /leave-requests/{id}/details
                    .service(
                        web::resource("/{id}/details")
                            .route(web::put().to(leave_request::update_leave_details)),
                    )
                    // /leave-requests/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::put().to(leave_request::set_leave_status))
                            .route(web::delete().to(leave_request::delete_leave)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("")
                            .route(web::get().to(department::list_departments))
                            .route(web::post().to(department::create_department)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(department::get_department))
                            .route(web::put().to(department::update_department))
                            .route(web::delete().to(department::delete_department)),
                    ),
            )
            .service(
                web::scope("/positions")
                    .service(
                        web::resource("")
                            .route(web::get().to(position::list_positions))
                            .route(web::post().to(position::create_position)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(position::get_position))
                            .route(web::put().to(position::update_position))
                            .route(web::delete().to(position::delete_position)),
                    ),
            ),
    );
}

// ADMIN LOGIN
//  ├─ access_token (24 h)
//  └─ refresh_token (7 days)
//
// EMPLOYEE AUTH
//  └─ access_token (24 h), no refresh
//
// API REQUEST
//  └─ Authorization: Bearer access_token
