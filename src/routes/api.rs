use actix_web::web;

use crate::handlers;

pub fn scoped_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/companies").route(web::get().to(handlers::catalog::companies)))
        .service(web::resource("/products").route(web::get().to(handlers::catalog::products)))
        .service(
            web::scope("/donations")
                .service(
                    web::resource("/donate").route(web::post().to(handlers::donations::donate)),
                )
                .service(
                    web::resource("/subscribe")
                        .route(web::post().to(handlers::notifications::subscribe)),
                )
                .service(
                    web::resource("/unsubscribe")
                        .route(web::post().to(handlers::notifications::unsubscribe)),
                )
                .service(
                    web::resource("/notification")
                        .route(web::post().to(handlers::notifications::notification)),
                )
                .service(
                    web::resource("/reason").route(web::get().to(handlers::donations::reason)),
                ),
        );
}
