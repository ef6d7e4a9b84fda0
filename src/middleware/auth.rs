use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::sync::Arc;

use crate::config::Config;
use crate::utils::{verify_token, ApiResponse};

/// Requires a valid Bearer access token; verified claims land in the request
/// extensions.
pub struct AuthMiddleware {
    config: Arc<Config>,
}

impl AuthMiddleware {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service,
            config: self.config.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    config: Arc<Config>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        match token {
            Some(token) => match verify_token(token, &self.config.jwt_secret) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let fut = self.service.call(req);
                    Box::pin(async move {
                        let res = fut.await?;
                        Ok(res.map_into_left_body())
                    })
                }
                Err(_) => {
                    let response = HttpResponse::Unauthorized()
                        .json(ApiResponse::<()>::error("Invalid or expired token"));
                    Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
                }
            },
            None => {
                let response = HttpResponse::Unauthorized()
                    .json(ApiResponse::<()>::error("Authorization header missing"));
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

/// Like `AuthMiddleware`, but anonymous requests pass through with no claims
/// set. Invalid tokens are treated as anonymous rather than rejected, so a
/// stale token never blocks an endpoint that works without one.
pub struct OptionalAuthMiddleware {
    config: Arc<Config>,
}

impl OptionalAuthMiddleware {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for OptionalAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = OptionalAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(OptionalAuthMiddlewareService {
            service,
            config: self.config.clone(),
        })
    }
}

pub struct OptionalAuthMiddlewareService<S> {
    service: S,
    config: Arc<Config>,
}

impl<S, B> Service<ServiceRequest> for OptionalAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(auth_header) = req.headers().get("Authorization") {
            if let Ok(header_str) = auth_header.to_str() {
                if let Some(token) = header_str.strip_prefix("Bearer ") {
                    if let Ok(claims) = verify_token(token, &self.config.jwt_secret) {
                        req.extensions_mut().insert(claims);
                    }
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpMessage, HttpRequest, HttpResponse};
    use uuid::Uuid;

    use super::*;
    use crate::utils::{Claims, JwtManager};

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            port: 8080,
            database_url: "postgresql://localhost/test".to_string(),
            jwt_secret: "test-secret-that-is-long-enough".to_string(),
            jwt_expiry_hours: 24,
            jwt_refresh_expiry_hours: 168,
            cors_allowed_origins: "*".to_string(),
            seed_on_start: false,
            auth_requests_per_minute: 30,
        })
    }

    async fn echo_user(req: HttpRequest) -> HttpResponse {
        let user = req
            .extensions()
            .get::<Claims>()
            .map(|c| c.sub.clone())
            .unwrap_or_else(|| "anonymous".to_string());
        HttpResponse::Ok().body(user)
    }

    #[actix_rt::test]
    async fn required_auth_rejects_missing_and_bad_tokens() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(config.clone()))
                .route("/whoami", web::get().to(echo_user)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request())
            .await;
        assert_eq!(resp.status(), 401);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .insert_header(("Authorization", "Bearer not.a.jwt"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_rt::test]
    async fn required_auth_passes_claims_through() {
        let config = test_config();
        let manager = JwtManager::new(&config.jwt_secret, 24, 168);
        let user_id = Uuid::new_v4();
        let token = manager
            .generate_access_token(user_id, "parent@example.com")
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(config.clone()))
                .route("/whoami", web::get().to(echo_user)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[actix_rt::test]
    async fn optional_auth_lets_anonymous_requests_through() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .wrap(OptionalAuthMiddleware::new(config.clone()))
                .route("/whoami", web::get().to(echo_user)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request())
            .await;
        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        assert_eq!(body, "anonymous".as_bytes());
    }

    #[actix_rt::test]
    async fn optional_auth_ignores_refresh_tokens() {
        let config = test_config();
        let manager = JwtManager::new(&config.jwt_secret, 24, 168);
        let token = manager
            .generate_refresh_token(Uuid::new_v4(), "parent@example.com")
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(OptionalAuthMiddleware::new(config.clone()))
                .route("/whoami", web::get().to(echo_user)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        assert_eq!(body, "anonymous".as_bytes());
    }
}
