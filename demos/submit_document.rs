//! Demonstrates a rate-limited document client against a mocked document API.
//!
//! Five documents are submitted concurrently through a client capped at two calls per second,
//! so the last one only goes out once the third window opens.

// std
use std::{sync::Arc, time::Instant};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use crpt_api::{
	client::DocumentClient,
	config::ApiConfig,
	document::Document,
	limiter::{RateLimit, TimeUnit},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let challenge_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/cert/key");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"uuid\":\"demo-uuid\",\"data\":\"ZGVtby1jaGFsbGVuZ2U=\"}");
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/cert");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"demo-token\"}");
		})
		.await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/lk/documents/create")
				.header("authorization", "Bearer demo-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"value\":\"demo-doc\"}");
		})
		.await;
	let config = ApiConfig::builder(Url::parse(&server.base_url())?)
		.rate_limit(RateLimit::per(TimeUnit::Second, 2)?)
		.build()?;
	let client = Arc::new(DocumentClient::new(config)?);
	let started = Instant::now();
	let tasks = (0..5)
		.map(|n| {
			let client = client.clone();

			tokio::spawn(async move {
				let document = Document::new(format!("pallet {n}"));
				let id = client.create_document(&document, "ZGVtby1zaWduYXR1cmU=", "milk").await?;

				color_eyre::eyre::Ok((n, id, started.elapsed()))
			})
		})
		.collect::<Vec<_>>();

	for task in tasks {
		let (n, id, elapsed) = task.await??;

		println!("Document {n} registered as {id} after {elapsed:?}.");
	}

	challenge_mock.assert_async().await;
	token_mock.assert_async().await;
	create_mock.assert_calls_async(5).await;

	Ok(())
}
