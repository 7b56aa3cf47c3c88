//! App Router

use salvo::Router;

use crate::{
    auth::{
        self,
        middleware::{detect_admin, require_admin},
    },
    blog, carts,
    carts::session::cart_session,
    content, donations, healthcheck, media, orders, products,
};

pub fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("admin/session")
                .post(auth::handlers::create::handler)
                .delete(auth::handlers::delete::handler),
        )
        .push(cart_router())
        .push(order_router())
        .push(donation_router())
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("check-stock").post(products::check_stock::handler))
                .push(Router::with_path("{slug}").get(products::get::handler)),
        )
        .push(
            Router::with_path("blog")
                .get(blog::index::handler)
                .push(Router::with_path("categories").get(blog::categories::handler))
                .push(Router::with_path("{slug}").get(blog::get::handler)),
        )
        .push(
            Router::with_path("content")
                .push(Router::with_path("testimonials").get(content::testimonials::handler))
                .push(Router::with_path("languages").get(content::languages::handler))
                .push(Router::with_path("blocks/{**path}").get(content::blocks::handler)),
        )
        .push(
            Router::with_path("media")
                .get(media::index::handler)
                .push(Router::with_path("folders").get(media::folders::handler))
                .push(Router::with_path("image/{**path}").get(media::image::handler))
                .push(Router::with_path("upload").post(media::upload::handler))
                .push(Router::with_path("upload-url").post(media::upload_url::handler))
                .push(
                    Router::with_path("{id}")
                        .get(media::get::handler)
                        .put(media::update::handler)
                        .delete(media::delete::handler),
                ),
        )
}

fn cart_router() -> Router {
    Router::with_path("cart")
        .hoop(cart_session)
        .get(carts::get::handler)
        .delete(carts::delete::handler)
        .push(Router::with_path("checkout").post(carts::checkout::handler))
        .push(
            Router::with_path("items")
                .post(carts::items::create::handler)
                .push(
                    Router::with_path("{line}")
                        .patch(carts::items::update::handler)
                        .delete(carts::items::delete::handler),
                ),
        )
}

fn order_router() -> Router {
    Router::with_path("orders")
        .push(
            Router::new()
                .hoop(detect_admin)
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{id}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("{id}")
                .hoop(require_admin)
                .patch(orders::update::handler)
                .delete(orders::delete::handler),
        )
}

fn donation_router() -> Router {
    Router::with_path("donations")
        .push(
            Router::new()
                .hoop(detect_admin)
                .get(donations::index::handler)
                .post(donations::create::handler),
        )
        .push(Router::with_path("stats").get(donations::stats::handler))
        .push(
            Router::with_path("{id}")
                .hoop(require_admin)
                .get(donations::get::handler)
                .patch(donations::update::handler)
                .delete(donations::delete::handler),
        )
}
