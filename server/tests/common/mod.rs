//! HTTP test harness
//!
//! Builds the full router on fresh databases in a `TempDir` and drives it with
//! `tower::ServiceExt::oneshot`, no socket involved.

#![allow(dead_code)]

use axum::{
	Router,
	body::{Body, to_bytes},
	http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use fleetward_core::settings::CoreSettings;
use fleetward_server::config::{AdminBootstrap, ServerConfig};
use fleetward_server::{bootstrap, build_app, routes};

pub const ADMIN_EMAIL: &str = "root@example.com";
pub const ADMIN_PASSWORD: &str = "root_password_123";
pub const PASSWORD: &str = "test_password_123";

pub struct TestServer {
	pub router: Router,
	_tmp: TempDir,
}

pub async fn create_test_server() -> TestServer {
	create_test_server_with(CoreSettings::default()).await
}

pub async fn create_test_server_with(settings: CoreSettings) -> TestServer {
	let tmp = TempDir::new().expect("Failed to create temp directory");
	let config = ServerConfig {
		listen: "127.0.0.1:0".into(),
		db_dir: tmp.path().to_path_buf(),
		settings,
		admin: Some(AdminBootstrap {
			name: "Root".into(),
			email: ADMIN_EMAIL.into(),
			password: ADMIN_PASSWORD.into(),
		}),
	};
	let app = build_app(&config).await.expect("Failed to build app");
	bootstrap::bootstrap(&app, config.admin.as_ref()).await.expect("Bootstrap failed");

	TestServer { router: routes::init(app), _tmp: tmp }
}

impl TestServer {
	/// Sends a request and returns the status with the parsed JSON body (Null if empty)
	pub async fn call(
		&self,
		method: Method,
		uri: &str,
		token: Option<&str>,
		body: Option<Value>,
	) -> (StatusCode, Value) {
		let mut builder = Request::builder().method(method).uri(uri);
		if let Some(token) = token {
			builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
		}
		let req = match body {
			Some(body) => builder
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(body.to_string())),
			None => builder.body(Body::empty()),
		}
		.expect("Failed to build request");

		let res = self.router.clone().oneshot(req).await.expect("Request failed");
		let status = res.status();
		let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("Failed to read body");
		let value = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap_or(Value::Null)
		};
		(status, value)
	}

	pub async fn login(&self, email: &str, password: &str) -> String {
		let (status, body) = self
			.call(
				Method::POST,
				"/api/auth/login",
				None,
				Some(serde_json::json!({ "email": email, "password": password })),
			)
			.await;
		assert_eq!(status, StatusCode::OK, "login failed: {}", body);
		body["data"]["token"].as_str().expect("token").to_string()
	}

	pub async fn admin_token(&self) -> String {
		self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
	}

	/// Creates an account through the admin API and returns (id, token)
	pub async fn account(&self, name: &str, role: &str) -> (String, String) {
		let admin = self.admin_token().await;
		let email = format!("{}@example.com", name.to_lowercase());
		let (status, body) = self
			.call(
				Method::POST,
				"/api/admin/accounts",
				Some(&admin),
				Some(serde_json::json!({
					"name": name,
					"email": email,
					"password": PASSWORD,
					"role": role,
				})),
			)
			.await;
		assert_eq!(status, StatusCode::CREATED, "account creation failed: {}", body);
		let id = body["data"]["id"].as_str().expect("id").to_string();
		(id, self.login(&email, PASSWORD).await)
	}
}

// vim: ts=4
