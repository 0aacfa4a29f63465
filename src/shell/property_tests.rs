//! Property-Based Tests for the intercept path
//!
//! Each case builds its own single-threaded runtime, since proptest bodies
//! are synchronous.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use proptest::prelude::*;
use url::Url;

use crate::cache::{CacheStorage, MemoryCacheStorage};
use crate::shell::test_support::*;
use crate::shell::{AssetRequest, Deployment, OfflineShell, ResponseSource, ShellOptions};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn path_strategy() -> impl Strategy<Value = String> {
    "/[a-z]{1,10}\\.(css|js|png|html)".prop_map(|s| s)
}

fn non_get_strategy() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::POST),
        Just(Method::PUT),
        Just(Method::DELETE),
        Just(Method::PATCH),
        Just(Method::HEAD),
        Just(Method::OPTIONS),
    ]
}

fn non_ok_status_strategy() -> impl Strategy<Value = StatusCode> {
    (201u16..600).prop_map(|code| StatusCode::from_u16(code).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // A non-GET request never consults or mutates the store.
    #[test]
    fn prop_non_get_never_touches_store(method in non_get_strategy(), path in path_strategy()) {
        runtime().block_on(async {
            let storage = Arc::new(CountingStorage::default());
            let fetcher = Arc::new(FakeFetcher::new(ORIGIN));
            fetcher.serve("/", "root");
            let shell = OfflineShell::new(
                storage.clone(),
                fetcher.clone(),
                ShellOptions::new(Url::parse(ORIGIN).unwrap()),
            );
            let installed = shell.install(&Deployment::new("v1", ["/"])).await.unwrap();
            shell.activate(installed).await.unwrap();

            let before = storage.calls();
            let request = AssetRequest::new(method, shell.resolve(&path).unwrap());
            let response = shell.intercept(request).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;

            prop_assert_eq!(response.source, ResponseSource::Passthrough);
            prop_assert_eq!(storage.calls(), before);
            Ok(())
        })?;
    }

    // Any final status other than 200 is passed through and never stored.
    #[test]
    fn prop_non_ok_never_stored(status in non_ok_status_strategy(), path in path_strategy()) {
        runtime().block_on(async {
            let (shell, storage, fetcher) = shell_with_site(&[("/", "root")]);
            let installed = shell.install(&Deployment::new("v1", ["/"])).await.unwrap();
            shell.activate(installed).await.unwrap();
            fetcher.serve_status(&path, status, "body");

            let response = shell.intercept(get(&shell, &path)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;

            prop_assert_eq!(response.status, status);
            prop_assert!(storage.get("v1", &key(&shell, &path)).is_none());
            Ok(())
        })?;
    }

    // Every cached path is served byte-identical without a network call.
    #[test]
    fn prop_cached_paths_skip_network(
        pages in prop::collection::hash_map(path_strategy(), "[ -~]{0,64}", 1..8),
    ) {
        runtime().block_on(async {
            let storage = Arc::new(MemoryCacheStorage::new());
            let fetcher = Arc::new(FakeFetcher::new(ORIGIN));
            for (path, body) in &pages {
                fetcher.serve(path, body);
            }
            let shell = OfflineShell::new(
                storage.clone(),
                fetcher.clone(),
                ShellOptions::new(Url::parse(ORIGIN).unwrap()),
            );
            let deployment = Deployment::new("v1", pages.keys().cloned());
            let installed = shell.install(&deployment).await.unwrap();
            shell.activate(installed).await.unwrap();
            fetcher.reset_calls();

            for (path, body) in &pages {
                let response = shell.intercept(get(&shell, path)).await.unwrap();
                prop_assert_eq!(response.source, ResponseSource::Cache);
                prop_assert_eq!(response.body.as_ref(), body.as_bytes());
            }
            prop_assert_eq!(fetcher.calls(), 0);
            prop_assert_eq!(storage.keys(), vec!["v1".to_string()]);
            Ok(())
        })?;
    }
}
